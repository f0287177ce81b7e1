//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::response::Response;
use tracing::{instrument, warn};

use super::views::{CartView, ProductView};
use crate::error::AppError;
use crate::middleware::Visitor;
use crate::wix::CommerceApi;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub products: Vec<ProductView>,
    pub products_unavailable: bool,
    /// `None` when the cart could not be loaded.
    pub cart: Option<CartView>,
}

/// Display the home page.
///
/// Products and cart load concurrently. Either failing degrades its section
/// of the page instead of failing the request.
#[instrument(skip(visitor))]
pub async fn home(visitor: Visitor) -> Response {
    let commerce = visitor.commerce();
    let (products, cart) = tokio::join!(commerce.query_products(), commerce.get_current_cart());

    let (products, products_unavailable) = match products {
        Ok(products) => (products.iter().map(ProductView::from).collect(), false),
        Err(e) => {
            warn!(error = %AppError::CatalogFetch(e), "Rendering without products");
            (Vec::new(), true)
        }
    };

    let cart = match cart {
        Ok(cart) => Some(CartView::from(&cart)),
        Err(e) => {
            warn!(error = %AppError::CartFetch(e), "Rendering with cart unavailable");
            None
        }
    };

    visitor.respond(HomeTemplate {
        products,
        products_unavailable,
        cart,
    })
}
