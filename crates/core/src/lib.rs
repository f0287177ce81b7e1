//! Mother Vegetables Core - Shared domain types.
//!
//! This crate provides the types shared by the storefront binary and its
//! integration tests:
//! - visitor credentials kept in the `session` cookie
//! - catalog products and their option groups
//! - the current cart and its line items
//! - the sub-applications a site may have installed
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. Wire formats of the remote commerce API are mapped onto these
//! types by the storefront crate.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, tokens, products, carts, and sub-applications

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
