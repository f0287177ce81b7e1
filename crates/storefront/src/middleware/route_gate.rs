//! Route gating by installed sub-application.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use tracing::debug;

use crate::apps::required_app;
use crate::state::AppState;

/// Middleware that hides app-specific paths when the app is not installed.
///
/// Requests to a gated path whose app is missing are redirected to
/// `/404?app=<name>`; everything else passes through untouched.
pub async fn route_gate_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let missing = required_app(request.uri().path())
        .filter(|app| !state.installed_apps().is_installed(*app));

    if let Some(app) = missing {
        debug!(path = %request.uri().path(), app = %app, "App not installed");
        let location = format!("/404?app={}", urlencoding::encode(app.display_name()));
        return Redirect::temporary(&location).into_response();
    }

    next.run(request).await
}
