//! Wire types for the Wix Headless REST API.
//!
//! These mirror the JSON bodies exchanged with the remote API and are kept
//! separate from the domain types in `mother_vegetables_core`; see
//! `conversions` for the mapping. Every response field the storefront does
//! not strictly need is optional so schema additions never break parsing.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// =============================================================================
// OAuth
// =============================================================================

/// Body of `POST /oauth2/token`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest<'a> {
    pub client_id: &'a str,
    pub grant_type: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<&'a str>,
}

/// Response of `POST /oauth2/token`.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    #[allow(dead_code)]
    pub token_type: Option<String>,
}

// =============================================================================
// Stores catalog
// =============================================================================

/// Body of `POST /stores-reader/v1/products/query`.
#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQueryRequest {
    pub query: serde_json::Map<String, serde_json::Value>,
}

/// Response of `POST /stores-reader/v1/products/query`.
#[derive(Debug, Deserialize)]
pub struct ProductQueryResponse {
    #[serde(default)]
    pub products: Vec<WireProduct>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProduct {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub slug: Option<String>,
    pub price_data: Option<WirePriceData>,
    pub media: Option<WireMedia>,
    #[serde(default)]
    pub product_options: Vec<WireProductOption>,
}

#[derive(Debug, Deserialize)]
pub struct WirePriceData {
    pub formatted: Option<WireFormattedPrice>,
}

#[derive(Debug, Deserialize)]
pub struct WireFormattedPrice {
    pub price: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMedia {
    pub main_media: Option<WireMediaItem>,
}

#[derive(Debug, Deserialize)]
pub struct WireMediaItem {
    pub image: Option<WireImage>,
}

#[derive(Debug, Deserialize)]
pub struct WireImage {
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireProductOption {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
pub struct WireChoice {
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub description: String,
}

// =============================================================================
// eCommerce current cart
// =============================================================================

/// Response carrying a cart (get, add, update).
#[derive(Debug, Deserialize)]
pub struct CartResponse {
    pub cart: Option<WireCart>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCart {
    pub id: Option<String>,
    #[serde(default)]
    pub line_items: Vec<WireLineItem>,
    pub subtotal: Option<WireMultiCurrencyPrice>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireLineItem {
    pub id: Option<String>,
    #[serde(default)]
    pub quantity: u32,
    pub catalog_reference: Option<WireCatalogReference>,
    pub product_name: Option<WireProductName>,
    pub price: Option<WireMultiCurrencyPrice>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCatalogReference {
    pub catalog_item_id: String,
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<WireCatalogOptions>,
}

/// Stores nests the chosen options one level down: `options.options`.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct WireCatalogOptions {
    #[serde(default)]
    pub options: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct WireProductName {
    pub original: Option<String>,
    pub translated: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMultiCurrencyPrice {
    pub formatted_amount: Option<String>,
    pub formatted_converted_amount: Option<String>,
}

/// Body of `POST /ecom/v1/carts/current/add-to-cart`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub line_items: Vec<NewLineItem>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewLineItem {
    pub catalog_reference: WireCatalogReference,
    pub quantity: u32,
}

/// Body of `POST /ecom/v1/carts/current/update-line-items-quantity`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub line_items: Vec<LineItemQuantityUpdate>,
}

#[derive(Debug, Serialize)]
pub struct LineItemQuantityUpdate {
    pub id: String,
    pub quantity: u32,
}

// =============================================================================
// Checkout & redirects
// =============================================================================

/// Body of `POST /ecom/v1/carts/current/create-checkout`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutRequest {
    pub channel_type: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCheckoutResponse {
    pub checkout_id: Option<String>,
}

/// Body of `POST /redirect-session/v1/redirect-session`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectSessionRequest<'a> {
    pub ecom_checkout: EcomCheckout<'a>,
    pub callbacks: RedirectCallbacks<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EcomCheckout<'a> {
    pub checkout_id: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectCallbacks<'a> {
    pub post_flow_url: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedirectSessionResponse {
    pub redirect_session: Option<WireRedirectSession>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireRedirectSession {
    pub id: Option<String>,
    pub full_url: Option<String>,
}

// =============================================================================
// Errors
// =============================================================================

/// Error body returned by the API on non-success statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
    pub details: Option<ApiErrorDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorDetails {
    pub application_error: Option<ApplicationError>,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationError {
    pub code: Option<String>,
    pub description: Option<String>,
}
