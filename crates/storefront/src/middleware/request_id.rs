//! Request correlation IDs.
//!
//! Each request gets an ID, taken from an upstream proxy's `x-request-id`
//! header when present and generated (UUID v4) otherwise. It is tagged on the
//! tracing span and Sentry scope, stored as a [`RequestId`] extension for
//! handlers, and echoed back in the response headers.

use axum::{
    extract::{FromRequestParts, Request},
    http::{HeaderValue, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::Span;
use uuid::Uuid;

/// The HTTP header name for request IDs.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Longest upstream ID accepted as-is.
const MAX_UPSTREAM_LEN: usize = 128;

/// Correlation ID of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(pub String);

impl RequestId {
    fn from_request(request: &Request) -> Self {
        let upstream = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|h| h.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty() && id.len() <= MAX_UPSTREAM_LEN);

        Self(upstream.map_or_else(|| Uuid::new_v4().to_string(), String::from))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for RequestId {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(parts
            .extensions
            .get::<Self>()
            .cloned()
            .unwrap_or_else(|| Self(String::new())))
    }
}

/// Middleware that assigns every request a [`RequestId`].
pub async fn request_id_middleware(mut request: Request, next: Next) -> Response {
    let request_id = RequestId::from_request(&request);

    Span::current().record("request_id", request_id.0.as_str());
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id.0);
    });

    let header = HeaderValue::from_str(&request_id.0).ok();
    request.extensions_mut().insert(request_id);

    let mut response = next.run(request).await;
    if let Some(value) = header {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }

    response
}
