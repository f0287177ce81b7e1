//! Conversions between Wix wire types and domain types.

use tracing::warn;

use mother_vegetables_core::{
    AppId, Cart, CartId, CatalogReference, LineItem, LineItemId, OptionChoice, OptionSelection,
    Product, ProductId, ProductOption,
};

use super::types::{
    ApiErrorBody, WireCart, WireCatalogOptions, WireCatalogReference, WireLineItem, WireProduct,
};

// =============================================================================
// Products
// =============================================================================

pub fn convert_product(product: WireProduct) -> Product {
    Product {
        id: ProductId::new(product.id),
        name: product.name,
        slug: product.slug,
        formatted_price: product
            .price_data
            .and_then(|p| p.formatted)
            .and_then(|f| f.price),
        image_url: product
            .media
            .and_then(|m| m.main_media)
            .and_then(|m| m.image)
            .and_then(|i| i.url),
        options: product
            .product_options
            .into_iter()
            .map(|option| ProductOption {
                name: option.name,
                choices: option
                    .choices
                    .into_iter()
                    .map(|c| OptionChoice {
                        description: c.description,
                        value: c.value,
                    })
                    .collect(),
            })
            .collect(),
    }
}

// =============================================================================
// Cart
// =============================================================================

pub fn convert_cart(cart: WireCart) -> Cart {
    Cart {
        id: cart.id.map(CartId::new),
        line_items: cart
            .line_items
            .into_iter()
            .filter_map(convert_line_item)
            .collect(),
        subtotal: cart.subtotal.and_then(|s| s.formatted_amount),
    }
}

fn convert_line_item(line: WireLineItem) -> Option<LineItem> {
    let Some(id) = line.id else {
        warn!("Dropping cart line without an id");
        return None;
    };
    let Some(reference) = line.catalog_reference else {
        warn!(line_item_id = %id, "Dropping cart line without a catalog reference");
        return None;
    };

    Some(LineItem {
        id: LineItemId::new(id),
        quantity: line.quantity,
        catalog_reference: CatalogReference {
            app_id: AppId::new(reference.app_id),
            catalog_item_id: ProductId::new(reference.catalog_item_id),
            options: convert_options(reference.options),
        },
        product_name: line
            .product_name
            .and_then(|n| n.translated.or(n.original)),
        price: line.price.and_then(|p| p.formatted_amount),
    })
}

/// Flatten `options.options` into a name → choice map.
///
/// Choices are usually strings; anything else is kept in its JSON form so two
/// lines with different non-string choices never compare equal.
fn convert_options(options: Option<WireCatalogOptions>) -> OptionSelection {
    options
        .map(|o| o.options)
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| match value {
            serde_json::Value::String(s) => (name, s),
            other => (name, other.to_string()),
        })
        .collect()
}

pub fn to_wire_reference(reference: &CatalogReference) -> WireCatalogReference {
    WireCatalogReference {
        catalog_item_id: reference.catalog_item_id.to_string(),
        app_id: reference.app_id.to_string(),
        options: Some(WireCatalogOptions {
            options: reference
                .options
                .iter()
                .map(|(name, choice)| {
                    (
                        name.to_string(),
                        serde_json::Value::String(choice.to_string()),
                    )
                })
                .collect(),
        }),
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Best-effort human-readable message from an error response body.
pub fn error_message(body: &str) -> String {
    let parsed: Option<ApiErrorBody> = serde_json::from_str(body).ok();
    let message = parsed.and_then(|b| {
        let app_error = b
            .details
            .and_then(|d| d.application_error)
            .and_then(|a| a.description.or(a.code));
        b.message.filter(|m| !m.is_empty()).or(app_error)
    });

    message.unwrap_or_else(|| body.chars().take(200).collect())
}
