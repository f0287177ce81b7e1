//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.
//!
//! Remote failures are wrapped in a variant naming the operation that failed,
//! so handlers can decide per kind whether to degrade or surface it.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::wix::CommerceError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Visitor tokens could not be issued.
    #[error("Identity issuance failed: {0}")]
    IdentityIssuance(#[source] CommerceError),

    /// Product catalog could not be loaded.
    #[error("Catalog fetch failed: {0}")]
    CatalogFetch(#[source] CommerceError),

    /// Current cart could not be loaded; its state is unknown.
    #[error("Cart fetch failed: {0}")]
    CartFetch(#[source] CommerceError),

    /// A cart mutation was rejected or did not complete.
    #[error("Cart operation failed: {0}")]
    CartOperation(#[source] CommerceError),

    /// Checkout or its redirect session could not be created.
    #[error("Checkout creation failed: {0}")]
    CheckoutCreation(#[source] CommerceError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether the error came from the commerce backend.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::IdentityIssuance(_)
                | Self::CatalogFetch(_)
                | Self::CartFetch(_)
                | Self::CartOperation(_)
                | Self::CheckoutCreation(_)
        )
    }

    const fn status(&self) -> StatusCode {
        match self {
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::IdentityIssuance(CommerceError::NotConfigured(_)) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            _ => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Capture server errors to Sentry
        if status.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Internal(_) => "Internal server error".to_string(),
            Self::IdentityIssuance(_) => "Could not start a visitor session".to_string(),
            Self::CatalogFetch(_) => "Products are unavailable".to_string(),
            Self::CartFetch(_) => "Cart is unavailable".to_string(),
            Self::CartOperation(_) => "Cart could not be updated".to_string(),
            Self::CheckoutCreation(_) => "Checkout is unavailable".to_string(),
            Self::NotFound(_) | Self::BadRequest(_) => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added product", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
