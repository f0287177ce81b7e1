//! The visitor's current cart.

use serde::{Deserialize, Serialize};

use super::id::{AppId, CartId, LineItemId, ProductId};
use super::product::OptionSelection;

/// Catalog app ID of the Stores app; every line added from the product list
/// references this catalog.
pub const WIX_STORES_APP_ID: &str = "1380b703-ce81-ff05-f115-39571d94dfcd";

/// Reference from a cart line back to the catalog item it was created from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogReference {
    pub app_id: AppId,
    pub catalog_item_id: ProductId,
    pub options: OptionSelection,
}

impl CatalogReference {
    /// Reference to a Stores product with the given options.
    #[must_use]
    pub fn stores_product(catalog_item_id: ProductId, options: OptionSelection) -> Self {
        Self {
            app_id: AppId::new(WIX_STORES_APP_ID),
            catalog_item_id,
            options,
        }
    }

    /// Whether this reference points at the same item with the same options.
    #[must_use]
    pub fn matches(&self, catalog_item_id: &ProductId, options: &OptionSelection) -> bool {
        &self.catalog_item_id == catalog_item_id && &self.options == options
    }
}

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Server-assigned line ID.
    pub id: LineItemId,
    pub quantity: u32,
    pub catalog_reference: CatalogReference,
    /// Display name as returned by the backend.
    pub product_name: Option<String>,
    /// Formatted unit price as returned by the backend.
    pub price: Option<String>,
}

/// The current cart.
///
/// An empty cart with no ID stands for "no cart exists server-side yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    pub id: Option<CartId>,
    pub line_items: Vec<LineItem>,
    /// Formatted subtotal as returned by the backend.
    pub subtotal: Option<String>,
}

impl Cart {
    /// Cart with no lines.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    /// Sum of line quantities.
    #[must_use]
    pub fn total_quantity(&self) -> u32 {
        self.line_items
            .iter()
            .fold(0_u32, |sum, line| sum.saturating_add(line.quantity))
    }

    /// Find the line for a catalog item with exactly these options.
    ///
    /// Lines for the same item with a different option set do not match, so
    /// each option combination keeps its own line.
    #[must_use]
    pub fn find_line(
        &self,
        catalog_item_id: &ProductId,
        options: &OptionSelection,
    ) -> Option<&LineItem> {
        self.line_items
            .iter()
            .find(|line| line.catalog_reference.matches(catalog_item_id, options))
    }
}
