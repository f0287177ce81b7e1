//! Visitor session middleware and extractor.
//!
//! The middleware runs at the edge of every storefront page and API call and
//! guarantees a `session` cookie exists. The [`Visitor`] extractor is the
//! page-level half: it turns the cookie into usable credentials and a
//! per-request commerce client.

use axum::{
    extract::{FromRequestParts, OriginalUri, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::{error, warn};

use crate::error::AppError;
use crate::session::{SessionStatus, SessionStore};
use crate::state::AppState;
use crate::wix::CommerceClient;

/// Shown on the error page when visitor tokens cannot be issued.
pub const INVALID_CLIENT_ID_MESSAGE: &str = "Make sure you are using a valid CLIENT_ID";

/// Error page location for a failed issuance.
#[must_use]
pub fn issuance_error_location() -> String {
    format!(
        "/internal/error?message={}",
        urlencoding::encode(INVALID_CLIENT_ID_MESSAGE)
    )
}

/// Middleware that ensures every request carries a visitor session.
///
/// Only the presence of the cookie is checked. When it is missing, visitor
/// tokens are issued once and the cookie is set both on the in-flight request
/// (so the handler sees it) and on the response. If issuance fails the
/// visitor is redirected to the error page.
pub async fn visitor_session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let mut store = SessionStore::from_headers(request.headers());

    match state.sessions().ensure_session(&mut store).await {
        Ok(SessionStatus::Existing) => next.run(request).await,
        Ok(SessionStatus::Issued) => {
            store.write_request(request.headers_mut());
            let mut response = next.run(request).await;
            if let Err(e) = store.write_response(response.headers_mut(), state.cookie_settings()) {
                error!(error = %e, "Failed to encode session cookie");
            }
            response
        }
        Err(e) => {
            warn!(error = %e, "Visitor token issuance failed");
            Redirect::temporary(&issuance_error_location()).into_response()
        }
    }
}

/// The current visitor, ready to talk to the commerce backend.
///
/// Credentials renewed or reissued while extracting are not persisted until
/// the handler wraps its response with [`Visitor::respond`].
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(visitor: Visitor) -> Result<Response> {
///     let cart = visitor.commerce().get_current_cart().await?;
///     Ok(visitor.respond(Json(cart)))
/// }
/// ```
pub struct Visitor {
    commerce: CommerceClient,
    store: SessionStore,
    state: AppState,
}

impl Visitor {
    #[must_use]
    pub const fn commerce(&self) -> &CommerceClient {
        &self.commerce
    }

    /// Finish a response, attaching the session cookie if it changed.
    pub fn respond(&self, response: impl IntoResponse) -> Response {
        let mut response = response.into_response();
        if let Err(e) = self
            .store
            .write_response(response.headers_mut(), self.state.cookie_settings())
        {
            error!(error = %e, "Failed to encode session cookie");
        }
        response
    }
}

/// Rejection when visitor credentials cannot be obtained.
///
/// Pages redirect to the error page, like the edge does. JSON endpoints under
/// `/api` answer with the error status instead so scripts can handle it.
#[derive(Debug)]
pub struct VisitorRejection {
    error: AppError,
    json: bool,
}

impl IntoResponse for VisitorRejection {
    fn into_response(self) -> Response {
        if self.json {
            return self.error.into_response();
        }
        warn!(error = %self.error, "Visitor token issuance failed");
        Redirect::temporary(&issuance_error_location()).into_response()
    }
}

impl FromRequestParts<AppState> for Visitor {
    type Rejection = VisitorRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let mut store = SessionStore::from_headers(&parts.headers);

        let tokens = match state.sessions().client_credentials(&mut store).await {
            Ok(tokens) => tokens,
            Err(e) => {
                let path = parts
                    .extensions
                    .get::<OriginalUri>()
                    .map_or_else(|| parts.uri.path(), |uri| uri.0.path());
                return Err(VisitorRejection {
                    error: AppError::IdentityIssuance(e),
                    json: is_api_path(path),
                });
            }
        };

        Ok(Self {
            commerce: state.wix().commerce(&tokens),
            store,
            state: state.clone(),
        })
    }
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_paths_keep_json_errors() {
        assert!(is_api_path("/api/cart"));
        assert!(is_api_path("/api"));
        assert!(!is_api_path("/"));
        assert!(!is_api_path("/checkout"));
        assert!(!is_api_path("/apiary"));
    }
}
