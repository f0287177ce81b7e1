//! Anonymous visitor credentials.
//!
//! A [`VisitorTokens`] value is the credential pair issued by the commerce
//! backend's OAuth endpoint for a visitor without an account. It is persisted
//! verbatim as JSON in the `session` cookie, using the same camelCase shape
//! the browser SDK writes, so a cookie set by either side can be read by the
//! other:
//!
//! ```json
//! {"accessToken":{"value":"...","expiresAt":1700000000},
//!  "refreshToken":{"value":"...","role":"visitor"}}
//! ```

use core::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Role a refresh token was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TokenRole {
    #[default]
    Visitor,
    Member,
    None,
}

/// Short-lived token sent with every commerce API request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub value: String,
    /// Unix timestamp (seconds) after which the token is rejected.
    pub expires_at: i64,
}

/// Long-lived token used to renew the access token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshToken {
    pub value: String,
    #[serde(default)]
    pub role: TokenRole,
}

/// Credential pair for an anonymous visitor.
///
/// `Debug` is implemented manually so token values never reach logs.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorTokens {
    pub access_token: AccessToken,
    pub refresh_token: RefreshToken,
}

impl VisitorTokens {
    /// Seconds of slack applied when deciding whether the access token is
    /// still usable.
    pub const EXPIRY_SKEW_SECS: i64 = 60;

    /// Build a credential pair from the raw fields of a token response.
    ///
    /// `obtained_at` is the Unix timestamp the response was received at.
    #[must_use]
    pub fn issued(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: i64,
        obtained_at: i64,
    ) -> Self {
        Self {
            access_token: AccessToken {
                value: access_token.into(),
                expires_at: obtained_at.saturating_add(expires_in),
            },
            refresh_token: RefreshToken {
                value: refresh_token.into(),
                role: TokenRole::Visitor,
            },
        }
    }

    /// Parse a stored cookie value.
    ///
    /// Never fails: a missing, empty, or malformed value yields `None` and is
    /// treated by callers exactly like "no session".
    #[must_use]
    pub fn from_cookie_value(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        serde_json::from_str(raw).ok()
    }

    /// Serialize to the JSON stored in the cookie.
    ///
    /// # Errors
    ///
    /// Returns an error only if serialization itself fails.
    pub fn to_cookie_value(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Whether the access token has expired at the given Unix timestamp.
    #[must_use]
    pub const fn is_expired_at(&self, now: i64) -> bool {
        now >= self.access_token.expires_at.saturating_sub(Self::EXPIRY_SKEW_SECS)
    }

    /// Whether the access token has expired now.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }

    /// Whether a refresh token is available for renewal.
    #[must_use]
    pub fn can_refresh(&self) -> bool {
        !self.refresh_token.value.is_empty()
    }
}

impl fmt::Debug for VisitorTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisitorTokens")
            .field("access_token", &"[REDACTED]")
            .field("expires_at", &self.access_token.expires_at)
            .field("refresh_token", &"[REDACTED]")
            .field("role", &self.refresh_token.role)
            .finish()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("value", &"[REDACTED]")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

impl fmt::Debug for RefreshToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefreshToken")
            .field("value", &"[REDACTED]")
            .field("role", &self.role)
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample() -> VisitorTokens {
        VisitorTokens::issued("OauthNG.JWS.access", "JWS.refresh", 14_400, 1_700_000_000)
    }

    #[test]
    fn test_cookie_value_round_trip() {
        let tokens = sample();
        let raw = tokens.to_cookie_value().unwrap();
        assert_eq!(VisitorTokens::from_cookie_value(&raw), Some(tokens));
    }

    #[test]
    fn test_cookie_value_uses_sdk_shape() {
        let raw = sample().to_cookie_value().unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["accessToken"]["value"], "OauthNG.JWS.access");
        assert_eq!(json["accessToken"]["expiresAt"], 1_700_014_400);
        assert_eq!(json["refreshToken"]["role"], "visitor");
    }

    #[test]
    fn test_reads_cookie_written_by_browser_sdk() {
        let raw = r#"{"accessToken":{"value":"a","expiresAt":1},"refreshToken":{"value":"r","role":"visitor"}}"#;
        let tokens = VisitorTokens::from_cookie_value(raw).unwrap();
        assert_eq!(tokens.access_token.value, "a");
        assert_eq!(tokens.refresh_token.role, TokenRole::Visitor);
    }

    #[test]
    fn test_corrupted_value_is_no_session() {
        assert!(VisitorTokens::from_cookie_value("").is_none());
        assert!(VisitorTokens::from_cookie_value("   ").is_none());
        assert!(VisitorTokens::from_cookie_value("{not json").is_none());
        assert!(VisitorTokens::from_cookie_value(r#"{"accessToken":1}"#).is_none());
        assert!(VisitorTokens::from_cookie_value("undefined").is_none());
    }

    #[test]
    fn test_expiry_applies_skew() {
        let tokens = sample();
        let expires_at = tokens.access_token.expires_at;
        assert!(!tokens.is_expired_at(expires_at - 61));
        assert!(tokens.is_expired_at(expires_at - 60));
        assert!(tokens.is_expired_at(expires_at + 1));
    }

    #[test]
    fn test_expiry_at_timestamp_extremes() {
        let mut tokens = sample();

        tokens.access_token.expires_at = i64::MIN;
        assert!(tokens.is_expired_at(0));
        assert!(tokens.is_expired_at(i64::MIN));
        assert!(tokens.is_expired());

        tokens.access_token.expires_at = i64::MAX;
        assert!(!tokens.is_expired_at(0));
        assert!(!tokens.is_expired());
    }

    #[test]
    fn test_reads_extreme_expiry_from_cookie() {
        let raw = r#"{"accessToken":{"value":"a","expiresAt":-9223372036854775808},"refreshToken":{"value":"r","role":"visitor"}}"#;
        let tokens = VisitorTokens::from_cookie_value(raw).unwrap();
        assert!(tokens.is_expired());
    }

    #[test]
    fn test_debug_redacts_token_values() {
        let debug = format!("{:?}", sample());
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("OauthNG.JWS.access"));
        assert!(!debug.contains("JWS.refresh"));
    }
}
