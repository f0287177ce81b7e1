//! Checkout initiation.
//!
//! Creates a checkout from the current cart, then a hosted redirect session
//! for it. Either step failing (typically because the site's plan does not
//! accept payments yet) sends the visitor to the premium plan page instead.

use tracing::{instrument, warn};

use crate::error::{AppError, add_breadcrumb};
use crate::wix::{ChannelType, CommerceApi};

/// Where to send the visitor after a checkout attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutOutcome {
    /// Navigate the current page to the hosted checkout.
    Redirect(String),
    /// Checkout is unavailable; open this URL in a new browsing context.
    Fallback(String),
}

/// Premium plan upgrade page for a site.
#[must_use]
pub fn premium_plan_url(manage_base_url: &str, site_id: Option<&str>) -> String {
    format!(
        "{}/premium-purchase-plan/dynamo?siteGuid={}",
        manage_base_url.trim_end_matches('/'),
        urlencoding::encode(site_id.unwrap_or_default())
    )
}

/// Starts checkout for one visitor.
pub struct CheckoutInitiator<'a, C: CommerceApi + ?Sized> {
    commerce: &'a C,
    fallback_url: String,
}

impl<'a, C: CommerceApi + ?Sized> CheckoutInitiator<'a, C> {
    pub const fn new(commerce: &'a C, fallback_url: String) -> Self {
        Self {
            commerce,
            fallback_url,
        }
    }

    /// Run checkout creation once.
    ///
    /// `return_url` is where the hosted checkout sends the visitor when done.
    /// Failures are never retried; they produce [`CheckoutOutcome::Fallback`].
    #[instrument(skip(self))]
    pub async fn start(self, return_url: &str) -> CheckoutOutcome {
        match self.redirect_url(return_url).await {
            Ok(url) => {
                add_breadcrumb("checkout", "Redirecting to hosted checkout", None);
                CheckoutOutcome::Redirect(url)
            }
            Err(e) => {
                warn!(error = %e, "Checkout unavailable, offering premium plan page");
                add_breadcrumb("checkout", "Checkout fallback", None);
                CheckoutOutcome::Fallback(self.fallback_url)
            }
        }
    }

    async fn redirect_url(&self, return_url: &str) -> Result<String, AppError> {
        let checkout_id = self
            .commerce
            .create_checkout_from_cart(ChannelType::Web)
            .await
            .map_err(AppError::CheckoutCreation)?;

        self.commerce
            .create_redirect_session(&checkout_id, return_url)
            .await
            .map_err(AppError::CheckoutCreation)
    }
}
