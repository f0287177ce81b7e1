//! Catalog products and option selections.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::id::ProductId;

/// A single choice within an option group (e.g., "Natural" for "Shade").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionChoice {
    /// Human-readable label; this is what cart lines record.
    pub description: String,
    /// Raw value (a color code for swatches, otherwise usually the label).
    pub value: String,
}

/// An option group on a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    /// Option name (e.g., "Shade").
    pub name: String,
    /// Choices in display order.
    pub choices: Vec<OptionChoice>,
}

/// Chosen options for a cart line, keyed by option name.
///
/// Backed by an ordered map so two selections compare equal whenever they
/// contain the same name/choice pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSelection(BTreeMap<String, String>);

impl OptionSelection {
    /// Create an empty selection.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Set the chosen value for an option.
    pub fn insert(&mut self, name: impl Into<String>, choice: impl Into<String>) {
        self.0.insert(name.into(), choice.into());
    }

    /// Get the chosen value for an option.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Whether no options are chosen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over name/choice pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for OptionSelection {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A catalog product.
///
/// Only the identifier and option groups matter to cart logic; the remaining
/// fields are carried through for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub slug: Option<String>,
    /// Price already formatted by the backend (e.g., "¥3,980").
    pub formatted_price: Option<String>,
    pub image_url: Option<String>,
    pub options: Vec<ProductOption>,
}

impl Product {
    /// Selection picking the first listed choice of every option group.
    ///
    /// Option groups without any choices are skipped.
    #[must_use]
    pub fn default_options(&self) -> OptionSelection {
        self.options
            .iter()
            .filter_map(|option| {
                option
                    .choices
                    .first()
                    .map(|choice| (option.name.clone(), choice.description.clone()))
            })
            .collect()
    }
}
