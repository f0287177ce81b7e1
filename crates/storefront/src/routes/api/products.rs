//! Product catalog endpoint.

use axum::{Json, response::Response};
use tracing::instrument;

use crate::error::AppError;
use crate::middleware::Visitor;
use crate::wix::CommerceApi;

/// List the default page of products.
#[instrument(skip(visitor))]
pub async fn products(visitor: Visitor) -> Response {
    let result = visitor
        .commerce()
        .query_products()
        .await
        .map(Json)
        .map_err(AppError::CatalogFetch);

    visitor.respond(result)
}
