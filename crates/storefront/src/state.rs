//! Application state shared across handlers.

use std::sync::Arc;

use crate::apps::{InstalledApps, StaticInstalledApps};
use crate::config::StorefrontConfig;
use crate::services::premium_plan_url;
use crate::session::{SessionCookieSettings, SessionLifecycle};
use crate::wix::{CommerceError, WixClient};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`. It holds no visitor
/// credentials; those travel with each request in the session cookie.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    wix: WixClient,
    sessions: SessionLifecycle<WixClient>,
    installed_apps: Box<dyn InstalledApps>,
}

impl AppState {
    /// Create a new application state with the configured installed apps.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, CommerceError> {
        let installed = StaticInstalledApps::new(config.installed_apps.clone());
        Self::with_installed_apps(config, installed)
    }

    /// Create a new application state with a custom installed-apps source.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn with_installed_apps(
        config: StorefrontConfig,
        installed_apps: impl InstalledApps + 'static,
    ) -> Result<Self, CommerceError> {
        let wix = WixClient::new(&config.wix)?;
        let sessions = SessionLifecycle::new(wix.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                wix,
                sessions,
                installed_apps: Box::new(installed_apps),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the shared Wix API client.
    #[must_use]
    pub fn wix(&self) -> &WixClient {
        &self.inner.wix
    }

    /// Get the visitor session lifecycle.
    #[must_use]
    pub fn sessions(&self) -> &SessionLifecycle<WixClient> {
        &self.inner.sessions
    }

    /// Get the installed sub-applications source.
    #[must_use]
    pub fn installed_apps(&self) -> &dyn InstalledApps {
        self.inner.installed_apps.as_ref()
    }

    /// Attributes for the session cookie.
    #[must_use]
    pub fn cookie_settings(&self) -> SessionCookieSettings {
        SessionCookieSettings::from_config(&self.inner.config)
    }

    /// Premium plan page shown when checkout is unavailable.
    #[must_use]
    pub fn checkout_fallback_url(&self) -> String {
        let wix = &self.inner.config.wix;
        premium_plan_url(&wix.manage_base_url, wix.site_id.as_deref())
    }
}
