//! Integration tests for the Mother Vegetables storefront.
//!
//! Tests drive the full storefront router in-process (no listening socket)
//! against a `wiremock` stand-in for the Wix Headless APIs.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p mother-vegetables-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `visitor_session` - Edge token issuance and the `session` cookie
//! - `route_gate` - Installed-app gating
//! - `cart` - Add, merge, and clear through the JSON API and home page
//! - `checkout` - Hosted checkout redirect and plan fallback
//! - `pages` - Error, not-found, and health pages

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use cookie::Cookie;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mother_vegetables_core::{VisitorTokens, WIX_STORES_APP_ID};
use mother_vegetables_storefront::{config::StorefrontConfig, routes, state::AppState};

pub const CLIENT_ID: &str = "test-client-id";
pub const SITE_ID: &str = "test-site-id";
pub const BASE_URL: &str = "http://localhost:3000";

/// A storefront wired to a fake Wix API.
pub struct TestContext {
    pub wix: MockServer,
    pub state: AppState,
    pub app: Router,
}

impl TestContext {
    /// Storefront with no sub-applications installed.
    pub async fn new() -> Self {
        Self::with_installed_apps("").await
    }

    /// Storefront with the given `STOREFRONT_INSTALLED_APPS` value.
    pub async fn with_installed_apps(apps: &str) -> Self {
        let wix = MockServer::start().await;
        let config = test_config(&wix, &[("STOREFRONT_INSTALLED_APPS", apps)]);
        Self::from_config(wix, config)
    }

    /// Storefront without a Wix client ID.
    pub async fn without_client_id() -> Self {
        let wix = MockServer::start().await;
        let config = test_config(&wix, &[("WIX_CLIENT_ID", "")]);
        Self::from_config(wix, config)
    }

    fn from_config(wix: MockServer, config: StorefrontConfig) -> Self {
        let state = AppState::new(config).unwrap();
        let app = routes::app(state.clone());
        Self { wix, state, app }
    }

    /// Send a request through the full router.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.app.clone().oneshot(request).await.unwrap()
    }

    /// Mount the OAuth token endpoint, expecting exactly `times` calls.
    pub async fn expect_token_issuance(&self, times: u64) -> VisitorTokens {
        Mock::given(method("POST"))
            .and(path("/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "issued-access",
                "refresh_token": "issued-refresh",
                "expires_in": 14400,
                "token_type": "Bearer"
            })))
            .expect(times)
            .mount(&self.wix)
            .await;

        VisitorTokens::issued("issued-access", "issued-refresh", 14400, 0)
    }

    /// Mount a product catalog.
    pub async fn mount_products(&self, products: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/stores-reader/v1/products/query"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "products": products })),
            )
            .mount(&self.wix)
            .await;
    }

    /// Mount the current cart.
    pub async fn mount_current_cart(&self, cart: serde_json::Value) {
        Mock::given(method("GET"))
            .and(path("/ecom/v1/carts/current"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "cart": cart })))
            .mount(&self.wix)
            .await;
    }
}

/// Configuration pointing every Wix base URL at the mock server.
pub fn test_config(wix: &MockServer, overrides: &[(&str, &str)]) -> StorefrontConfig {
    let mut vars: HashMap<String, String> = [
        ("STOREFRONT_BASE_URL", BASE_URL.to_string()),
        ("WIX_CLIENT_ID", CLIENT_ID.to_string()),
        ("WIX_SITE_ID", SITE_ID.to_string()),
        ("WIX_API_BASE_URL", wix.uri()),
        ("WIX_MANAGE_BASE_URL", "https://manage.wix.com".to_string()),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect();

    for (key, value) in overrides {
        vars.insert((*key).to_string(), (*value).to_string());
    }

    StorefrontConfig::from_vars(|key| vars.get(key).cloned()).unwrap()
}

/// Credentials that are valid for the next hour.
pub fn valid_tokens() -> VisitorTokens {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_secs();
    VisitorTokens::issued(
        "visitor-access",
        "visitor-refresh",
        3600,
        i64::try_from(now).unwrap(),
    )
}

/// `Cookie` header value carrying a raw session value.
pub fn session_cookie(raw: &str) -> String {
    Cookie::new("session", raw).encoded().to_string()
}

/// `Cookie` header value carrying a credential pair.
pub fn session_cookie_for(tokens: &VisitorTokens) -> String {
    session_cookie(&tokens.to_cookie_value().unwrap())
}

/// Decoded value of the `session` cookie set by a response, if any.
pub fn set_session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| Cookie::parse_encoded(value.to_string()).ok())
        .find(|c| c.name() == "session")
        .map(|c| c.value().to_string())
}

/// `Location` header of a redirect response.
pub fn location(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

/// Collect a response body as text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

/// A product with one "Shade" option group.
pub fn shade_product(id: &str, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "slug": id,
        "priceData": {"formatted": {"price": "¥3,980"}},
        "productOptions": [{
            "name": "Shade",
            "choices": [
                {"value": "#f1d3b3", "description": "Natural"},
                {"value": "#f7e3cf", "description": "Light"}
            ]
        }]
    })
}

/// A cart line for a Stores product.
pub fn cart_line(id: &str, product_id: &str, shade: &str, quantity: u32) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "quantity": quantity,
        "catalogReference": {
            "catalogItemId": product_id,
            "appId": WIX_STORES_APP_ID,
            "options": {"options": {"Shade": shade}}
        },
        "productName": {"original": product_id}
    })
}
