//! Per-request commerce façade.

use std::num::NonZeroU32;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, instrument};

use mother_vegetables_core::{Cart, CatalogReference, CheckoutId, LineItemId, Product};

use super::conversions::{convert_cart, convert_product, to_wire_reference};
use super::types::{
    AddToCartRequest, CartResponse, CreateCheckoutRequest, CreateCheckoutResponse, EcomCheckout,
    LineItemQuantityUpdate, NewLineItem, ProductQueryRequest, ProductQueryResponse,
    RedirectCallbacks, RedirectSessionRequest, RedirectSessionResponse, UpdateQuantityRequest,
};
use super::{CommerceError, WixClient};

const CATALOG_KEY: &str = "products:default";
const CURRENT_CART: &str = "ecom/v1/carts/current";

/// Sales channel a checkout is created for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelType {
    Web,
}

impl ChannelType {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Web => "WEB",
        }
    }
}

/// Operations the storefront needs from the commerce backend.
///
/// Every call is a single remote attempt. Implementations convert transport
/// failures into [`CommerceError`]; callers map those onto their own error
/// kinds.
#[async_trait]
pub trait CommerceApi: Send + Sync {
    /// Default page of the product catalog.
    async fn query_products(&self) -> Result<Vec<Product>, CommerceError>;

    /// The visitor's current cart; an empty cart when none exists yet.
    async fn get_current_cart(&self) -> Result<Cart, CommerceError>;

    /// Append a new line and return the updated cart.
    async fn add_to_current_cart(
        &self,
        reference: CatalogReference,
        quantity: NonZeroU32,
    ) -> Result<Cart, CommerceError>;

    /// Set the absolute quantity of an existing line.
    async fn update_line_item_quantity(
        &self,
        line_item_id: &LineItemId,
        quantity: NonZeroU32,
    ) -> Result<Cart, CommerceError>;

    /// Delete the whole cart.
    async fn delete_current_cart(&self) -> Result<(), CommerceError>;

    /// Create a checkout from the current cart.
    async fn create_checkout_from_cart(
        &self,
        channel_type: ChannelType,
    ) -> Result<CheckoutId, CommerceError>;

    /// Create a hosted checkout session; returns the URL to navigate to.
    async fn create_redirect_session(
        &self,
        checkout_id: &CheckoutId,
        return_url: &str,
    ) -> Result<String, CommerceError>;
}

/// Commerce API handle authenticated as one visitor.
///
/// Built by [`WixClient::commerce`] once per request and never shared
/// between visitors.
#[derive(Clone)]
pub struct CommerceClient {
    wix: WixClient,
    access_token: Arc<str>,
}

impl CommerceClient {
    pub(super) fn new(wix: WixClient, access_token: String) -> Self {
        Self {
            wix,
            access_token: Arc::from(access_token),
        }
    }

    fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.authorize(self.wix.http().post(self.wix.url(path)))
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.header(reqwest::header::AUTHORIZATION, &*self.access_token)
    }

    fn cart_from(response: CartResponse, action: &str) -> Result<Cart, CommerceError> {
        response
            .cart
            .map(convert_cart)
            .ok_or_else(|| CommerceError::UnexpectedResponse(format!("{action}: no cart in response")))
    }
}

#[async_trait]
impl CommerceApi for CommerceClient {
    #[instrument(skip(self))]
    async fn query_products(&self) -> Result<Vec<Product>, CommerceError> {
        if let Some(products) = self.wix.catalog().get(CATALOG_KEY).await {
            debug!("Cache hit for products");
            return Ok(products.as_ref().clone());
        }

        let request = self
            .post("stores-reader/v1/products/query")
            .json(&ProductQueryRequest::default());
        let response: ProductQueryResponse = self.wix.send(request, "products").await?;

        let products: Vec<Product> = response.products.into_iter().map(convert_product).collect();

        self.wix
            .catalog()
            .insert(CATALOG_KEY, Arc::new(products.clone()))
            .await;

        Ok(products)
    }

    #[instrument(skip(self))]
    async fn get_current_cart(&self) -> Result<Cart, CommerceError> {
        let request = self.authorize(self.wix.http().get(self.wix.url(CURRENT_CART)));

        match self.wix.send::<CartResponse>(request, "current cart").await {
            Ok(response) => Ok(response.cart.map(convert_cart).unwrap_or_default()),
            Err(e) if e.is_not_found() => {
                debug!("No current cart, treating as empty");
                Ok(Cart::empty())
            }
            Err(e) => Err(e),
        }
    }

    #[instrument(skip(self, reference), fields(catalog_item_id = %reference.catalog_item_id))]
    async fn add_to_current_cart(
        &self,
        reference: CatalogReference,
        quantity: NonZeroU32,
    ) -> Result<Cart, CommerceError> {
        let body = AddToCartRequest {
            line_items: vec![NewLineItem {
                catalog_reference: to_wire_reference(&reference),
                quantity: quantity.get(),
            }],
        };
        let request = self
            .post(&format!("{CURRENT_CART}/add-to-cart"))
            .json(&body);

        let response: CartResponse = self.wix.send(request, "current cart").await?;
        Self::cart_from(response, "add to cart")
    }

    #[instrument(skip(self), fields(line_item_id = %line_item_id))]
    async fn update_line_item_quantity(
        &self,
        line_item_id: &LineItemId,
        quantity: NonZeroU32,
    ) -> Result<Cart, CommerceError> {
        let body = UpdateQuantityRequest {
            line_items: vec![LineItemQuantityUpdate {
                id: line_item_id.to_string(),
                quantity: quantity.get(),
            }],
        };
        let request = self
            .post(&format!("{CURRENT_CART}/update-line-items-quantity"))
            .json(&body);

        let response: CartResponse = self.wix.send(request, "current cart").await?;
        Self::cart_from(response, "update quantity")
    }

    #[instrument(skip(self))]
    async fn delete_current_cart(&self) -> Result<(), CommerceError> {
        let request = self.authorize(self.wix.http().delete(self.wix.url(CURRENT_CART)));
        self.wix.send_raw(request, "current cart").await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn create_checkout_from_cart(
        &self,
        channel_type: ChannelType,
    ) -> Result<CheckoutId, CommerceError> {
        let body = CreateCheckoutRequest {
            channel_type: channel_type.as_str(),
        };
        let request = self
            .post(&format!("{CURRENT_CART}/create-checkout"))
            .json(&body);

        let response: CreateCheckoutResponse = self.wix.send(request, "current cart").await?;
        response
            .checkout_id
            .filter(|id| !id.is_empty())
            .map(CheckoutId::new)
            .ok_or_else(|| CommerceError::UnexpectedResponse("no checkoutId in response".to_string()))
    }

    #[instrument(skip(self), fields(checkout_id = %checkout_id))]
    async fn create_redirect_session(
        &self,
        checkout_id: &CheckoutId,
        return_url: &str,
    ) -> Result<String, CommerceError> {
        let body = RedirectSessionRequest {
            ecom_checkout: EcomCheckout {
                checkout_id: checkout_id.as_str(),
            },
            callbacks: RedirectCallbacks {
                post_flow_url: return_url,
            },
        };
        let request = self
            .post("redirect-session/v1/redirect-session")
            .json(&body);

        let response: RedirectSessionResponse = self.wix.send(request, "redirect session").await?;
        response
            .redirect_session
            .and_then(|s| s.full_url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                CommerceError::UnexpectedResponse("no fullUrl in redirect session".to_string())
            })
    }
}
