//! Cart reconciliation.
//!
//! Keeps a local copy of the visitor's cart and turns "add this product" into
//! the right remote mutation: a quantity bump when an equivalent line exists,
//! otherwise a new line. The local copy is only ever replaced with what the
//! remote returned, and only when the call succeeded.

use std::num::NonZeroU32;

use tracing::{debug, instrument};

use mother_vegetables_core::{Cart, CatalogReference, Product};

use crate::error::{AppError, Result};
use crate::wix::CommerceApi;

/// Cart state for one interaction, bound to a visitor's commerce handle.
pub struct CartReconciler<'a, C: CommerceApi + ?Sized> {
    commerce: &'a C,
    cart: Cart,
}

impl<'a, C: CommerceApi + ?Sized> CartReconciler<'a, C> {
    /// Start from an already known cart.
    pub const fn new(commerce: &'a C, cart: Cart) -> Self {
        Self { commerce, cart }
    }

    /// Start from the remote current cart.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CartFetch`] if the cart cannot be read. A visitor
    /// without a cart gets an empty one, not an error.
    pub async fn load(commerce: &'a C) -> Result<Self> {
        let cart = commerce
            .get_current_cart()
            .await
            .map_err(AppError::CartFetch)?;
        Ok(Self::new(commerce, cart))
    }

    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    #[must_use]
    pub fn into_cart(self) -> Cart {
        self.cart
    }

    /// Add one unit of `product` with its default options.
    ///
    /// A line for the same catalog item with the same options is bumped by
    /// one; anything else becomes a new line with quantity 1.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CartOperation`] if the remote call fails; the
    /// local cart is left as it was.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub async fn add_product(&mut self, product: &Product) -> Result<&Cart> {
        let options = product.default_options();

        let updated = match self.cart.find_line(&product.id, &options) {
            Some(line) => {
                let quantity = NonZeroU32::MIN.saturating_add(line.quantity);
                debug!(line_item_id = %line.id, quantity = quantity.get(), "Incrementing existing line");
                self.commerce
                    .update_line_item_quantity(&line.id, quantity)
                    .await
            }
            None => {
                debug!("Adding new line");
                let reference = CatalogReference::stores_product(product.id.clone(), options);
                self.commerce
                    .add_to_current_cart(reference, NonZeroU32::MIN)
                    .await
            }
        }
        .map_err(AppError::CartOperation)?;

        self.cart = updated;
        Ok(&self.cart)
    }

    /// Delete the remote cart.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CartOperation`] if the remote call fails; the
    /// local cart is left as it was.
    #[instrument(skip(self))]
    pub async fn clear(&mut self) -> Result<()> {
        self.commerce
            .delete_current_cart()
            .await
            .map_err(AppError::CartOperation)?;
        self.cart = Cart::empty();
        Ok(())
    }
}
