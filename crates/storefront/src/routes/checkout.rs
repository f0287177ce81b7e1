//! Checkout route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::{HeaderMap, header},
    response::{Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;
use url::Url;

use crate::middleware::Visitor;
use crate::services::{CheckoutInitiator, CheckoutOutcome};
use crate::state::AppState;

/// Checkout form data.
#[derive(Debug, Default, Deserialize)]
pub struct CheckoutForm {
    /// Page to come back to after checkout.
    pub return_url: Option<String>,
}

/// Shown when checkout cannot be created for this site.
#[derive(Template, WebTemplate)]
#[template(path = "checkout_fallback.html")]
pub struct CheckoutFallbackTemplate {
    pub upgrade_url: String,
}

/// Start checkout for the current cart.
///
/// Redirects to the hosted checkout on success. On failure, renders a page
/// that opens the premium plan page in a new tab.
#[instrument(skip_all)]
pub async fn checkout(
    State(state): State<AppState>,
    visitor: Visitor,
    headers: HeaderMap,
    Form(form): Form<CheckoutForm>,
) -> Response {
    let return_url = return_url(&state, form.return_url.as_deref(), &headers);

    let outcome = CheckoutInitiator::new(visitor.commerce(), state.checkout_fallback_url())
        .start(&return_url)
        .await;

    match outcome {
        CheckoutOutcome::Redirect(url) => visitor.respond(Redirect::to(&url)),
        CheckoutOutcome::Fallback(upgrade_url) => {
            visitor.respond(CheckoutFallbackTemplate { upgrade_url })
        }
    }
}

/// Where the hosted checkout should send the visitor back to.
///
/// Prefers the submitted URL, then the `Referer`, then the site's base URL.
/// Only absolute http(s) URLs are accepted.
fn return_url(state: &AppState, submitted: Option<&str>, headers: &HeaderMap) -> String {
    let referer = headers
        .get(header::REFERER)
        .and_then(|value| value.to_str().ok());

    submitted
        .into_iter()
        .chain(referer)
        .find_map(|candidate| {
            Url::parse(candidate)
                .ok()
                .filter(|url| matches!(url.scheme(), "http" | "https"))
        })
        .map_or_else(|| state.config().base_url.clone(), String::from)
}
