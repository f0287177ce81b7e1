//! Mother Vegetables storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod apps;
pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod session;
pub mod state;
pub mod wix;
