//! In-memory `CommerceApi` for service tests.

#![allow(clippy::unwrap_used)]

use std::num::NonZeroU32;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use mother_vegetables_core::{
    Cart, CartId, CatalogReference, CheckoutId, LineItem, LineItemId, Product,
};

use crate::wix::{ChannelType, CommerceApi, CommerceError};

#[derive(Default)]
pub struct FakeCommerce {
    pub cart: Mutex<Cart>,
    pub products: Vec<Product>,
    pub fail_mutations: bool,
    pub fail_checkout: bool,
    pub adds: AtomicUsize,
    pub updates: AtomicUsize,
    pub deletes: AtomicUsize,
    pub checkouts: AtomicUsize,
    pub redirects: AtomicUsize,
    pub next_line: AtomicUsize,
}

impl FakeCommerce {
    pub fn with_cart(cart: Cart) -> Self {
        Self {
            cart: Mutex::new(cart),
            ..Self::default()
        }
    }

    pub fn remote_cart(&self) -> Cart {
        self.cart.lock().unwrap().clone()
    }

    fn rejected() -> CommerceError {
        CommerceError::Api {
            status: 500,
            message: "rejected".to_string(),
        }
    }
}

#[async_trait]
impl CommerceApi for FakeCommerce {
    async fn query_products(&self) -> Result<Vec<Product>, CommerceError> {
        Ok(self.products.clone())
    }

    async fn get_current_cart(&self) -> Result<Cart, CommerceError> {
        Ok(self.remote_cart())
    }

    async fn add_to_current_cart(
        &self,
        reference: CatalogReference,
        quantity: NonZeroU32,
    ) -> Result<Cart, CommerceError> {
        self.adds.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations {
            return Err(Self::rejected());
        }
        let n = self.next_line.fetch_add(1, Ordering::SeqCst);
        let mut cart = self.cart.lock().unwrap();
        cart.id.get_or_insert_with(|| CartId::new("cart-1"));
        cart.line_items.push(LineItem {
            id: LineItemId::new(format!("new-line-{n}")),
            quantity: quantity.get(),
            catalog_reference: reference,
            product_name: None,
            price: None,
        });
        Ok(cart.clone())
    }

    async fn update_line_item_quantity(
        &self,
        line_item_id: &LineItemId,
        quantity: NonZeroU32,
    ) -> Result<Cart, CommerceError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations {
            return Err(Self::rejected());
        }
        let mut cart = self.cart.lock().unwrap();
        let line = cart
            .line_items
            .iter_mut()
            .find(|l| &l.id == line_item_id)
            .ok_or_else(|| CommerceError::NotFound("line item".to_string()))?;
        line.quantity = quantity.get();
        Ok(cart.clone())
    }

    async fn delete_current_cart(&self) -> Result<(), CommerceError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations {
            return Err(Self::rejected());
        }
        *self.cart.lock().unwrap() = Cart::empty();
        Ok(())
    }

    async fn create_checkout_from_cart(
        &self,
        _channel_type: ChannelType,
    ) -> Result<CheckoutId, CommerceError> {
        self.checkouts.fetch_add(1, Ordering::SeqCst);
        if self.fail_checkout {
            return Err(CommerceError::Api {
                status: 428,
                message: "SITE_MUST_ACCEPT_PAYMENTS".to_string(),
            });
        }
        Ok(CheckoutId::new("co-1"))
    }

    async fn create_redirect_session(
        &self,
        checkout_id: &CheckoutId,
        return_url: &str,
    ) -> Result<String, CommerceError> {
        self.redirects.fetch_add(1, Ordering::SeqCst);
        Ok(format!(
            "https://checkout.example/{checkout_id}?return={}",
            urlencoding::encode(return_url)
        ))
    }
}
