//! Display data for templates.

use mother_vegetables_core::{Cart, LineItem, OptionSelection, Product};

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub price: String,
    pub image_url: String,
    /// Default option summary (e.g., "Shade: Natural").
    pub options: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            price: product.formatted_price.clone().unwrap_or_default(),
            image_url: product.image_url.clone().unwrap_or_default(),
            options: summarize(&product.default_options()),
        }
    }
}

/// Cart line display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub title: String,
    pub options: String,
    pub quantity: u32,
    pub price: String,
}

impl From<&LineItem> for CartItemView {
    fn from(line: &LineItem) -> Self {
        Self {
            title: line
                .product_name
                .clone()
                .unwrap_or_else(|| line.catalog_reference.catalog_item_id.to_string()),
            options: summarize(&line.catalog_reference.options),
            quantity: line.quantity,
            price: line.price.clone().unwrap_or_default(),
        }
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.line_items.iter().map(CartItemView::from).collect(),
            subtotal: cart.subtotal.clone().unwrap_or_default(),
            item_count: cart.total_quantity(),
        }
    }
}

fn summarize(options: &OptionSelection) -> String {
    options
        .iter()
        .map(|(name, choice)| format!("{name}: {choice}"))
        .collect::<Vec<_>>()
        .join(", ")
}
