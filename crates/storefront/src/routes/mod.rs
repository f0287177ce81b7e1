//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page (products, cart, checkout button)
//! GET  /health                 - Health check
//!
//! # JSON API
//! GET  /api/products           - Product catalog
//! GET  /api/cart               - Current cart
//! POST /api/cart/add           - Add one unit of a product ({"productId": ..})
//! POST /api/cart/clear         - Delete the current cart
//!
//! # Checkout
//! POST /checkout               - Redirect to hosted checkout, or plan fallback page
//!
//! # Internal pages
//! GET  /internal/error         - Error page (?message=)
//! GET  /404                    - Not found page (?app=)
//! ```
//!
//! Everything except the internal pages and the health check runs behind
//! the visitor session middleware.

pub mod api;
pub mod checkout;
pub mod home;
pub mod pages;
mod views;

use std::time::Duration;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{request_id_middleware, route_gate_middleware, visitor_session_middleware};
use crate::state::AppState;

/// Create the JSON API router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(api::products))
        .route("/cart", get(api::cart))
        .route("/cart/add", post(api::add_to_cart))
        .route("/cart/clear", post(api::clear_cart))
}

/// Create the routes that require a visitor session.
pub fn visitor_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/checkout", post(checkout::checkout))
        .nest("/api", api_routes())
        .route_layer(middleware::from_fn_with_state(
            state,
            visitor_session_middleware,
        ))
}

/// Create the internal pages router.
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/internal/error", get(pages::error))
        .route("/404", get(pages::not_found))
        .route("/health", get(health))
}

/// Create the full application with its middleware stack.
///
/// Sentry layers are added by the binary, outside of this.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(visitor_routes(state.clone()))
        .merge(page_routes())
        .fallback(pages::fallback)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            route_gate_middleware,
        ))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>, latency: Duration, span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the commerce backend.
async fn health() -> &'static str {
    "ok"
}
