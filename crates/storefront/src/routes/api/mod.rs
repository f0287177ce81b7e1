//! JSON API used by the home page's scripts.

mod cart;
mod products;

pub use cart::{AddToCartRequest, add_to_cart, cart, clear_cart};
pub use products::products;
