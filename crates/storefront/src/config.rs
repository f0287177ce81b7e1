//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! None are strictly required. A missing client ID or site ID does not stop
//! the process from starting: visitor token issuance fails at request time
//! instead, and the visitor is sent to the error page.
//!
//! ## Server
//! - `STOREFRONT_HOST` - Bind address (default: 127.0.0.1)
//! - `STOREFRONT_PORT` - Listen port (default: 3000)
//! - `STOREFRONT_BASE_URL` - Public URL for the storefront (default: <http://localhost:3000>)
//! - `STOREFRONT_SESSION_MAX_AGE_DAYS` - Lifetime of the `session` cookie (default: 30)
//! - `STOREFRONT_INSTALLED_APPS` - Comma-separated installed sub-applications
//!   (`store`, `bookings`, `events`, `subscriptions`; default: none)
//!
//! ## Wix Headless
//! - `WIX_CLIENT_ID` (or `NEXT_PUBLIC_WIX_CLIENT_ID`) - OAuth app client ID
//! - `WIX_SITE_ID` (or `NEXT_PUBLIC_WIX_SITE_ID`) - Site ID used for the plan upgrade link
//! - `WIX_API_BASE_URL` - API base (default: <https://www.wixapis.com>)
//! - `WIX_MANAGE_BASE_URL` - Dashboard base (default: <https://manage.wix.com>)
//! - `WIX_HTTP_TIMEOUT_SECS` - Per-request transport timeout (default: 10)
//!
//! ## Error tracking
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name
//! - `SENTRY_SAMPLE_RATE` - Error event sample rate (default: 1.0)
//! - `SENTRY_TRACES_SAMPLE_RATE` - Transaction sample rate (default: 0.0)

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use mother_vegetables_core::AppKind;
use thiserror::Error;
use url::Url;

const DEFAULT_API_BASE_URL: &str = "https://www.wixapis.com";
const DEFAULT_MANAGE_BASE_URL: &str = "https://manage.wix.com";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Lifetime of the `session` cookie in days
    pub session_max_age_days: u32,
    /// Sub-applications installed on the site
    pub installed_apps: Vec<AppKind>,
    /// Wix Headless configuration
    pub wix: WixConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
    /// Sentry error sample rate
    pub sentry_sample_rate: f32,
    /// Sentry transaction sample rate
    pub sentry_traces_sample_rate: f32,
}

/// Wix Headless configuration.
#[derive(Debug, Clone)]
pub struct WixConfig {
    /// OAuth app client ID used to issue visitor tokens
    pub client_id: Option<String>,
    /// Site ID, used to build the plan upgrade link
    pub site_id: Option<String>,
    /// REST API base URL (no trailing slash)
    pub api_base_url: String,
    /// Dashboard base URL (no trailing slash)
    pub manage_base_url: String,
    /// Transport timeout for a single request
    pub http_timeout: Duration,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but malformed.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let vars = Vars(lookup);

        let host = vars
            .or_default("STOREFRONT_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| invalid("STOREFRONT_HOST", &e))?;
        let port = vars
            .or_default("STOREFRONT_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| invalid("STOREFRONT_PORT", &e))?;
        let base_url = vars.or_default("STOREFRONT_BASE_URL", "http://localhost:3000");
        Url::parse(&base_url).map_err(|e| invalid("STOREFRONT_BASE_URL", &e))?;
        let session_max_age_days = vars
            .or_default("STOREFRONT_SESSION_MAX_AGE_DAYS", "30")
            .parse::<u32>()
            .map_err(|e| invalid("STOREFRONT_SESSION_MAX_AGE_DAYS", &e))?;
        let installed_apps = parse_installed_apps(
            vars.optional("STOREFRONT_INSTALLED_APPS").as_deref(),
        )?;

        let wix = WixConfig::from_vars(&vars)?;

        let sentry_sample_rate = vars
            .or_default("SENTRY_SAMPLE_RATE", "1.0")
            .parse::<f32>()
            .map_err(|e| invalid("SENTRY_SAMPLE_RATE", &e))?;
        let sentry_traces_sample_rate = vars
            .or_default("SENTRY_TRACES_SAMPLE_RATE", "0.0")
            .parse::<f32>()
            .map_err(|e| invalid("SENTRY_TRACES_SAMPLE_RATE", &e))?;

        Ok(Self {
            host,
            port,
            base_url: base_url.trim_end_matches('/').to_string(),
            session_max_age_days,
            installed_apps,
            wix,
            sentry_dsn: vars.optional("SENTRY_DSN"),
            sentry_environment: vars.optional("SENTRY_ENVIRONMENT"),
            sentry_sample_rate,
            sentry_traces_sample_rate,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether cookies should carry the `Secure` attribute.
    #[must_use]
    pub fn is_secure(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl WixConfig {
    fn from_vars<F>(vars: &Vars<F>) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base_url = vars.or_default("WIX_API_BASE_URL", DEFAULT_API_BASE_URL);
        Url::parse(&api_base_url).map_err(|e| invalid("WIX_API_BASE_URL", &e))?;
        let manage_base_url = vars.or_default("WIX_MANAGE_BASE_URL", DEFAULT_MANAGE_BASE_URL);
        Url::parse(&manage_base_url).map_err(|e| invalid("WIX_MANAGE_BASE_URL", &e))?;
        let timeout_secs = vars
            .or_default("WIX_HTTP_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| invalid("WIX_HTTP_TIMEOUT_SECS", &e))?;

        Ok(Self {
            client_id: vars
                .optional("WIX_CLIENT_ID")
                .or_else(|| vars.optional("NEXT_PUBLIC_WIX_CLIENT_ID")),
            site_id: vars
                .optional("WIX_SITE_ID")
                .or_else(|| vars.optional("NEXT_PUBLIC_WIX_SITE_ID")),
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            manage_base_url: manage_base_url.trim_end_matches('/').to_string(),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Variable lookup with the defaulting rules shared by every setting.
struct Vars<F>(F);

impl<F> Vars<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Get an optional variable; blank values count as unset.
    fn optional(&self, key: &str) -> Option<String> {
        (self.0)(key)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    /// Get a variable with a default value.
    fn or_default(&self, key: &str, default: &str) -> String {
        self.optional(key).unwrap_or_else(|| default.to_string())
    }
}

fn invalid(key: &str, err: &impl ToString) -> ConfigError {
    ConfigError::InvalidEnvVar(key.to_string(), err.to_string())
}

/// Parse the comma-separated installed sub-application list.
fn parse_installed_apps(raw: Option<&str>) -> Result<Vec<AppKind>, ConfigError> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };

    let mut apps = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let app = part
            .parse::<AppKind>()
            .map_err(|e| invalid("STOREFRONT_INSTALLED_APPS", &e))?;
        if !apps.contains(&app) {
            apps.push(app);
        }
    }
    Ok(apps)
}
