//! Anonymous visitor token issuance.
//!
//! Visitors never log in. Each one gets an anonymous credential pair from the
//! OAuth endpoint using the site's public client ID; the pair is what the
//! commerce API uses to scope the visitor's cart.

use async_trait::async_trait;
use tracing::instrument;

use mother_vegetables_core::{RefreshToken, VisitorTokens};

use super::types::{TokenRequest, TokenResponse};
use super::{CommerceError, WixClient};

/// Issues and renews anonymous visitor credentials.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Request a fresh anonymous credential pair.
    ///
    /// Exactly one remote call is made; failures are not retried.
    async fn generate_visitor_tokens(&self) -> Result<VisitorTokens, CommerceError>;

    /// Exchange a refresh token for a new credential pair.
    async fn renew_visitor_tokens(
        &self,
        refresh_token: &RefreshToken,
    ) -> Result<VisitorTokens, CommerceError>;
}

#[async_trait]
impl IdentityProvider for WixClient {
    #[instrument(skip(self))]
    async fn generate_visitor_tokens(&self) -> Result<VisitorTokens, CommerceError> {
        self.request_tokens("anonymous", None).await
    }

    #[instrument(skip(self, refresh_token))]
    async fn renew_visitor_tokens(
        &self,
        refresh_token: &RefreshToken,
    ) -> Result<VisitorTokens, CommerceError> {
        self.request_tokens("refresh_token", Some(&refresh_token.value))
            .await
    }
}

impl WixClient {
    async fn request_tokens(
        &self,
        grant_type: &'static str,
        refresh_token: Option<&str>,
    ) -> Result<VisitorTokens, CommerceError> {
        let client_id = self
            .client_id()
            .ok_or(CommerceError::NotConfigured("WIX_CLIENT_ID"))?;

        let body = TokenRequest {
            client_id,
            grant_type,
            refresh_token,
        };
        let request = self.http().post(self.url("oauth2/token")).json(&body);

        let response: TokenResponse = self.send(request, "oauth2/token").await?;

        if response.access_token.is_empty() {
            return Err(CommerceError::UnexpectedResponse(
                "token response has an empty access token".to_string(),
            ));
        }

        Ok(VisitorTokens::issued(
            response.access_token,
            response.refresh_token,
            response.expires_in,
            chrono::Utc::now().timestamp(),
        ))
    }
}
