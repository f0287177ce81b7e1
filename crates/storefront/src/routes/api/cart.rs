//! Cart endpoints.

use axum::{Json, response::Response};
use serde::Deserialize;
use tracing::instrument;

use mother_vegetables_core::{Cart, ProductId};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::Visitor;
use crate::services::CartReconciler;
use crate::wix::CommerceApi;

/// Body of `POST /api/cart/add`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
}

/// Current cart.
///
/// A cart that cannot be loaded is a 502, never an empty cart.
#[instrument(skip(visitor))]
pub async fn cart(visitor: Visitor) -> Response {
    let result = visitor
        .commerce()
        .get_current_cart()
        .await
        .map(Json)
        .map_err(AppError::CartFetch);

    visitor.respond(result)
}

/// Add one unit of a product, merging with an equivalent line.
#[instrument(skip(visitor, body), fields(product_id = %body.product_id))]
pub async fn add_to_cart(visitor: Visitor, Json(body): Json<AddToCartRequest>) -> Response {
    let result = add(&visitor, &body.product_id).await.map(Json);
    visitor.respond(result)
}

async fn add(visitor: &Visitor, product_id: &ProductId) -> Result<Cart> {
    let commerce = visitor.commerce();

    let products = commerce
        .query_products()
        .await
        .map_err(AppError::CatalogFetch)?;
    let product = products
        .iter()
        .find(|p| &p.id == product_id)
        .ok_or_else(|| AppError::NotFound(format!("product {product_id}")))?;

    let mut reconciler = CartReconciler::load(commerce).await?;
    reconciler.add_product(product).await?;

    add_breadcrumb("cart", "Added product", Some(&[("product_id", product_id.as_str())]));
    Ok(reconciler.into_cart())
}

/// Delete the current cart.
#[instrument(skip(visitor))]
pub async fn clear_cart(visitor: Visitor) -> Response {
    let mut reconciler = CartReconciler::new(visitor.commerce(), Cart::empty());
    let result = reconciler.clear().await.map(|()| {
        add_breadcrumb("cart", "Cleared cart", None);
        Json(reconciler.into_cart())
    });

    visitor.respond(result)
}
