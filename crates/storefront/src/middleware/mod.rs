//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (correlation ID on span, Sentry scope, and response)
//! 4. Route gate (redirect app-specific paths when the app is missing)
//! 5. Visitor session (issue visitor tokens when no `session` cookie exists)
//!
//! The visitor session layer wraps storefront pages and APIs only; the error
//! and not-found pages must stay reachable when issuance fails.

pub mod request_id;
pub mod route_gate;
pub mod visitor;

pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
pub use route_gate::route_gate_middleware;
pub use visitor::{
    Visitor, VisitorRejection, issuance_error_location, visitor_session_middleware,
};
