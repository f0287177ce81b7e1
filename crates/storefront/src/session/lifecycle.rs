//! Visitor session lifecycle.
//!
//! One component, two call sites:
//!
//! - the edge middleware calls [`SessionLifecycle::ensure_session`] and only
//!   checks that *some* session cookie exists;
//! - page handlers call [`SessionLifecycle::client_credentials`], which parses
//!   the cookie and renews or reissues credentials when they are unusable.

use tracing::{info, instrument, warn};

use mother_vegetables_core::VisitorTokens;

use super::store::SessionStore;
use crate::wix::{CommerceError, IdentityProvider};

/// What the edge found when it checked for a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// A cookie was already present and is used as-is.
    Existing,
    /// No cookie was present; fresh visitor tokens were issued and stored.
    Issued,
}

/// Issues, renews, and stores visitor credentials.
#[derive(Debug, Clone)]
pub struct SessionLifecycle<I> {
    identity: I,
}

impl<I: IdentityProvider> SessionLifecycle<I> {
    pub const fn new(identity: I) -> Self {
        Self { identity }
    }

    /// Make sure the request carries a session.
    ///
    /// A present cookie is never validated here. When absent, exactly one
    /// issuance attempt is made and the new pair is written to `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if issuance fails or the tokens cannot be serialized.
    #[instrument(skip_all)]
    pub async fn ensure_session(
        &self,
        store: &mut SessionStore,
    ) -> Result<SessionStatus, CommerceError> {
        if store.get().is_some() {
            return Ok(SessionStatus::Existing);
        }

        self.issue(store).await?;
        Ok(SessionStatus::Issued)
    }

    /// Credentials to build a commerce client with.
    ///
    /// Unparseable cookies are treated as absent. Expired access tokens are
    /// renewed with the refresh token; if that fails, a new visitor is issued.
    ///
    /// # Errors
    ///
    /// Returns an error only if fresh issuance fails.
    #[instrument(skip_all)]
    pub async fn client_credentials(
        &self,
        store: &mut SessionStore,
    ) -> Result<VisitorTokens, CommerceError> {
        match store.credentials() {
            Some(tokens) if !tokens.is_expired() => Ok(tokens),
            Some(tokens) if tokens.can_refresh() => {
                match self.identity.renew_visitor_tokens(&tokens.refresh_token).await {
                    Ok(renewed) => {
                        store.store(&renewed)?;
                        info!("Renewed visitor tokens");
                        Ok(renewed)
                    }
                    Err(e) => {
                        warn!(error = %e, "Token renewal failed, issuing new visitor tokens");
                        self.issue(store).await
                    }
                }
            }
            Some(_) => self.issue(store).await,
            None => {
                if store.get().is_some() {
                    warn!("Session cookie is not a credential pair, issuing new visitor tokens");
                }
                self.issue(store).await
            }
        }
    }

    async fn issue(&self, store: &mut SessionStore) -> Result<VisitorTokens, CommerceError> {
        let tokens = self.identity.generate_visitor_tokens().await?;
        store.store(&tokens)?;
        info!("Issued visitor tokens");
        Ok(tokens)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use axum::http::{HeaderMap, HeaderValue, header};
    use mother_vegetables_core::RefreshToken;

    use super::*;
    use crate::session::SESSION_COOKIE_NAME;

    #[derive(Default, Clone)]
    struct FakeIdentity {
        issued: Arc<AtomicUsize>,
        renewed: Arc<AtomicUsize>,
        fail_issue: bool,
        fail_renew: bool,
    }

    #[async_trait]
    impl IdentityProvider for FakeIdentity {
        async fn generate_visitor_tokens(&self) -> Result<VisitorTokens, CommerceError> {
            let n = self.issued.fetch_add(1, Ordering::SeqCst);
            if self.fail_issue {
                return Err(CommerceError::NotConfigured("WIX_CLIENT_ID"));
            }
            Ok(VisitorTokens::issued(
                format!("issued-{n}"),
                "refresh",
                3600,
                chrono::Utc::now().timestamp(),
            ))
        }

        async fn renew_visitor_tokens(
            &self,
            refresh_token: &RefreshToken,
        ) -> Result<VisitorTokens, CommerceError> {
            self.renewed.fetch_add(1, Ordering::SeqCst);
            if self.fail_renew {
                return Err(CommerceError::Api {
                    status: 400,
                    message: "invalid refresh token".to_string(),
                });
            }
            Ok(VisitorTokens::issued(
                "renewed",
                refresh_token.value.clone(),
                3600,
                chrono::Utc::now().timestamp(),
            ))
        }
    }

    fn store_with(raw: &str) -> SessionStore {
        let cookie = cookie::Cookie::new(SESSION_COOKIE_NAME, raw);
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_str(&cookie.encoded().to_string()).unwrap(),
        );
        SessionStore::from_headers(&headers)
    }

    fn fresh_cookie() -> String {
        VisitorTokens::issued("valid", "refresh", 3600, chrono::Utc::now().timestamp())
            .to_cookie_value()
            .unwrap()
    }

    #[tokio::test]
    async fn test_edge_issues_once_when_absent() {
        let identity = FakeIdentity::default();
        let lifecycle = SessionLifecycle::new(identity.clone());
        let mut store = SessionStore::default();

        let status = lifecycle.ensure_session(&mut store).await.unwrap();

        assert_eq!(status, SessionStatus::Issued);
        assert_eq!(identity.issued.load(Ordering::SeqCst), 1);
        let stored = store.pending().unwrap();
        assert_eq!(
            VisitorTokens::from_cookie_value(stored).unwrap().access_token.value,
            "issued-0"
        );
    }

    #[tokio::test]
    async fn test_edge_ignores_malformed_cookie() {
        let identity = FakeIdentity::default();
        let lifecycle = SessionLifecycle::new(identity.clone());
        let mut store = store_with("definitely not json");

        let status = lifecycle.ensure_session(&mut store).await.unwrap();

        assert_eq!(status, SessionStatus::Existing);
        assert_eq!(identity.issued.load(Ordering::SeqCst), 0);
        assert!(store.pending().is_none());
    }

    #[tokio::test]
    async fn test_edge_failure_is_single_attempt() {
        let identity = FakeIdentity {
            fail_issue: true,
            ..FakeIdentity::default()
        };
        let lifecycle = SessionLifecycle::new(identity.clone());
        let mut store = SessionStore::default();

        assert!(lifecycle.ensure_session(&mut store).await.is_err());
        assert_eq!(identity.issued.load(Ordering::SeqCst), 1);
        assert!(store.pending().is_none());
    }

    #[tokio::test]
    async fn test_page_uses_valid_cookie() {
        let identity = FakeIdentity::default();
        let lifecycle = SessionLifecycle::new(identity.clone());
        let mut store = store_with(&fresh_cookie());

        let tokens = lifecycle.client_credentials(&mut store).await.unwrap();

        assert_eq!(tokens.access_token.value, "valid");
        assert_eq!(identity.issued.load(Ordering::SeqCst), 0);
        assert!(store.pending().is_none());
    }

    #[tokio::test]
    async fn test_page_reissues_for_corrupted_cookie() {
        let identity = FakeIdentity::default();
        let lifecycle = SessionLifecycle::new(identity.clone());
        let mut store = store_with("{\"accessToken\":");

        let tokens = lifecycle.client_credentials(&mut store).await.unwrap();

        assert_eq!(tokens.access_token.value, "issued-0");
        assert!(store.pending().is_some());
    }

    #[tokio::test]
    async fn test_page_renews_expired_tokens() {
        let identity = FakeIdentity::default();
        let lifecycle = SessionLifecycle::new(identity.clone());
        let expired = VisitorTokens::issued("old", "refresh", 0, 0)
            .to_cookie_value()
            .unwrap();
        let mut store = store_with(&expired);

        let tokens = lifecycle.client_credentials(&mut store).await.unwrap();

        assert_eq!(tokens.access_token.value, "renewed");
        assert_eq!(identity.renewed.load(Ordering::SeqCst), 1);
        assert_eq!(identity.issued.load(Ordering::SeqCst), 0);
        assert_eq!(store.credentials(), Some(tokens));
    }

    #[tokio::test]
    async fn test_page_falls_back_to_issuance_when_renewal_fails() {
        let identity = FakeIdentity {
            fail_renew: true,
            ..FakeIdentity::default()
        };
        let lifecycle = SessionLifecycle::new(identity.clone());
        let expired = VisitorTokens::issued("old", "refresh", 0, 0)
            .to_cookie_value()
            .unwrap();
        let mut store = store_with(&expired);

        let tokens = lifecycle.client_credentials(&mut store).await.unwrap();

        assert_eq!(tokens.access_token.value, "issued-0");
        assert_eq!(identity.renewed.load(Ordering::SeqCst), 1);
        assert_eq!(identity.issued.load(Ordering::SeqCst), 1);
    }
}
