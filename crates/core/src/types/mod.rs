//! Core types for the storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod app;
pub mod cart;
pub mod id;
pub mod product;
pub mod tokens;

pub use app::{AppKind, AppKindError};
pub use cart::{Cart, CatalogReference, LineItem, WIX_STORES_APP_ID};
pub use id::*;
pub use product::{OptionChoice, OptionSelection, Product, ProductOption};
pub use tokens::{AccessToken, RefreshToken, TokenRole, VisitorTokens};
