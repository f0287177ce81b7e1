//! Internal error and not-found pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::Query,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::middleware::RequestId;

/// Query for `GET /internal/error`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorQuery {
    pub message: Option<String>,
}

/// Query for `GET /404`.
#[derive(Debug, Default, Deserialize)]
pub struct NotFoundQuery {
    pub app: Option<String>,
}

/// Error page template.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub message: String,
    pub request_id: String,
}

/// Not found page template.
#[derive(Template, WebTemplate)]
#[template(path = "not_found.html")]
pub struct NotFoundTemplate {
    /// App the visitor tried to reach, when the page was gated.
    pub app: String,
}

/// Display the error page.
#[instrument(skip(request_id))]
pub async fn error(Query(query): Query<ErrorQuery>, request_id: RequestId) -> ErrorTemplate {
    ErrorTemplate {
        message: query
            .message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| "Something went wrong".to_string()),
        request_id: request_id.0,
    }
}

/// Display the not found page.
#[instrument]
pub async fn not_found(Query(query): Query<NotFoundQuery>) -> Response {
    let template = NotFoundTemplate {
        app: query.app.unwrap_or_default(),
    };
    (StatusCode::NOT_FOUND, template).into_response()
}

/// Fallback for unmatched routes.
#[instrument]
pub async fn fallback(uri: Uri) -> Response {
    let template = NotFoundTemplate { app: String::new() };
    (StatusCode::NOT_FOUND, template).into_response()
}
