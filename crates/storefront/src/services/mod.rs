//! Business logic services for storefront.
//!
//! # Services
//!
//! - `cart` - Cart reconciliation (add/merge/clear against the current cart)
//! - `checkout` - Checkout creation and hosted redirect, with plan fallback
//!
//! Both operate on a borrowed [`CommerceApi`](crate::wix::CommerceApi) built
//! for the current visitor; neither holds credentials of its own.

pub mod cart;
pub mod checkout;

#[cfg(test)]
pub(crate) mod fake;

pub use cart::CartReconciler;
pub use checkout::{CheckoutInitiator, CheckoutOutcome, premium_plan_url};
