//! Visitor sessions.
//!
//! The session is nothing more than the visitor's credential pair in a
//! client-side cookie; there is no server-side session table.

mod lifecycle;
mod store;

pub use lifecycle::{SessionLifecycle, SessionStatus};
pub use store::{SESSION_COOKIE_NAME, SessionCookieSettings, SessionStore};
