//! Wix Headless API clients.
//!
//! # Architecture
//!
//! - [`WixClient`] is the process-wide handle: one `reqwest` connection pool,
//!   the API base URL, the OAuth client ID, and the catalog cache. It holds no
//!   visitor credentials.
//! - [`CommerceClient`] is built from it once per request with the visitor's
//!   tokens and is passed explicitly to the cart and checkout services.
//!   Credentials never outlive the request they arrived with.
//! - The remote API is the source of truth for carts; nothing is synced
//!   locally. The product catalog is cached in memory via `moka` (5 minute
//!   TTL) because it is identical for every visitor.
//!
//! # APIs
//!
//! - OAuth: anonymous visitor tokens and their renewal
//! - Stores: product catalog query
//! - eCommerce: current cart read/mutate and checkout creation
//! - Redirects: hosted checkout redirect sessions
//!
//! # Example
//!
//! ```rust,ignore
//! use mother_vegetables_storefront::wix::{CommerceApi, WixClient};
//!
//! let wix = WixClient::new(&config.wix)?;
//! let tokens = wix.generate_visitor_tokens().await?;
//!
//! let commerce = wix.commerce(&tokens);
//! let products = commerce.query_products().await?;
//! let cart = commerce.get_current_cart().await?;
//! ```

mod client;
pub mod conversions;
mod identity;
pub mod types;

pub use client::{ChannelType, CommerceApi, CommerceClient};
pub use identity::IdentityProvider;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::de::DeserializeOwned;
use thiserror::Error;

use mother_vegetables_core::Product;

use crate::config::WixConfig;

/// Catalog cache lifetime.
const CATALOG_TTL: Duration = Duration::from_secs(300);

/// Errors that can occur when interacting with the Wix APIs.
#[derive(Debug, Error)]
pub enum CommerceError {
    /// HTTP request failed (connection, timeout, TLS).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A required setting is missing, so the call was never attempted.
    #[error("Not configured: {0}")]
    NotConfigured(&'static str),

    /// The API answered successfully but without the expected payload.
    #[error("Unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl CommerceError {
    /// Whether the remote reported the resource as missing.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_) | Self::Api { status: 404, .. })
    }
}

// =============================================================================
// WixClient
// =============================================================================

/// Shared handle to the Wix Headless REST API.
///
/// Cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct WixClient {
    inner: Arc<WixClientInner>,
}

struct WixClientInner {
    http: reqwest::Client,
    api_base_url: String,
    client_id: Option<String>,
    catalog: Cache<&'static str, Arc<Vec<Product>>>,
}

impl WixClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: &WixConfig) -> Result<Self, CommerceError> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("mother-vegetables-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let catalog = Cache::builder()
            .max_capacity(16)
            .time_to_live(CATALOG_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(WixClientInner {
                http,
                api_base_url: config.api_base_url.clone(),
                client_id: config.client_id.clone(),
                catalog,
            }),
        })
    }

    /// Build the per-request commerce façade for a visitor.
    #[must_use]
    pub fn commerce(&self, tokens: &mother_vegetables_core::VisitorTokens) -> CommerceClient {
        CommerceClient::new(self.clone(), tokens.access_token.value.clone())
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.inner.api_base_url, path.trim_start_matches('/'))
    }

    fn http(&self) -> &reqwest::Client {
        &self.inner.http
    }

    fn client_id(&self) -> Option<&str> {
        self.inner.client_id.as_deref()
    }

    fn catalog(&self) -> &Cache<&'static str, Arc<Vec<Product>>> {
        &self.inner.catalog
    }

    /// Send a request and decode the JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        resource: &str,
    ) -> Result<T, CommerceError> {
        let text = self.send_raw(request, resource).await?;
        let body = if text.trim().is_empty() { "{}" } else { text.as_str() };

        serde_json::from_str(body).map_err(|e| {
            tracing::error!(
                error = %e,
                resource,
                body = %text.chars().take(500).collect::<String>(),
                "Failed to parse Wix response"
            );
            CommerceError::Parse(e)
        })
    }

    /// Send a request and return the raw body of a successful response.
    async fn send_raw(
        &self,
        request: reqwest::RequestBuilder,
        resource: &str,
    ) -> Result<String, CommerceError> {
        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CommerceError::NotFound(resource.to_string()));
        }

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                resource,
                body = %text.chars().take(500).collect::<String>(),
                "Wix API returned non-success status"
            );
            return Err(CommerceError::Api {
                status: status.as_u16(),
                message: conversions::error_message(&text),
            });
        }

        Ok(text)
    }
}
