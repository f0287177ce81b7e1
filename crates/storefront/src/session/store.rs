//! The `session` cookie.
//!
//! A single slot holding the visitor's credential pair as JSON. The cookie is
//! readable by browser code, so it is percent-encoded but not `HttpOnly`.

use axum::http::{HeaderMap, HeaderValue, header};
use cookie::{Cookie, SameSite};

use mother_vegetables_core::VisitorTokens;

use crate::config::StorefrontConfig;

/// Cookie name shared with browser-side code.
pub const SESSION_COOKIE_NAME: &str = "session";

/// Attributes written on every `Set-Cookie` for the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionCookieSettings {
    pub secure: bool,
    pub max_age_days: u32,
}

impl SessionCookieSettings {
    #[must_use]
    pub fn from_config(config: &StorefrontConfig) -> Self {
        Self {
            secure: config.is_secure(),
            max_age_days: config.session_max_age_days,
        }
    }

    /// Build the `Set-Cookie` header value carrying `raw`.
    ///
    /// # Errors
    ///
    /// Returns an error if the encoded cookie is not a valid header value.
    pub fn set_cookie(&self, raw: &str) -> Result<HeaderValue, header::InvalidHeaderValue> {
        let cookie = Cookie::build((SESSION_COOKIE_NAME, raw))
            .path("/")
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(cookie::time::Duration::days(i64::from(self.max_age_days)))
            .build();

        HeaderValue::from_str(&cookie.encoded().to_string())
    }
}

/// View of the session slot for one request.
///
/// Holds the value that arrived with the request and any value written during
/// it. Writes are not sent anywhere until [`SessionStore::write_response`]
/// (and, at the edge, [`SessionStore::write_request`]) is called.
#[derive(Debug, Clone, Default)]
pub struct SessionStore {
    incoming: Option<String>,
    pending: Option<String>,
}

impl SessionStore {
    /// Read the `session` cookie from request headers.
    ///
    /// Unparseable `Cookie` headers and empty `session` entries are skipped;
    /// the first non-empty `session` entry wins.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let incoming = headers
            .get_all(header::COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .flat_map(Cookie::split_parse_encoded)
            .filter_map(Result::ok)
            .find(|c| c.name() == SESSION_COOKIE_NAME && !c.value().is_empty())
            .map(|c| c.value().to_string());

        Self {
            incoming,
            pending: None,
        }
    }

    /// Current raw value, if any.
    #[must_use]
    pub fn get(&self) -> Option<&str> {
        self.pending.as_deref().or(self.incoming.as_deref())
    }

    /// Replace the stored value.
    pub fn set(&mut self, raw: impl Into<String>) {
        self.pending = Some(raw.into());
    }

    /// The stored credential pair.
    ///
    /// Missing or corrupted values are `None`, never an error.
    #[must_use]
    pub fn credentials(&self) -> Option<VisitorTokens> {
        self.get().and_then(VisitorTokens::from_cookie_value)
    }

    /// Serialize and store a credential pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the pair cannot be serialized.
    pub fn store(&mut self, tokens: &VisitorTokens) -> Result<(), serde_json::Error> {
        self.set(tokens.to_cookie_value()?);
        Ok(())
    }

    /// Value written during this request and not yet sent.
    #[must_use]
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }

    /// Expose a pending value to downstream handlers of the same request.
    pub fn write_request(&self, headers: &mut HeaderMap) {
        let Some(raw) = self.pending() else {
            return;
        };
        let cookie = Cookie::new(SESSION_COOKIE_NAME, raw);
        if let Ok(value) = HeaderValue::from_str(&cookie.encoded().to_string()) {
            headers.append(header::COOKIE, value);
        }
    }

    /// Persist a pending value on the response.
    ///
    /// # Errors
    ///
    /// Returns an error if the cookie cannot be encoded as a header.
    pub fn write_response(
        &self,
        headers: &mut HeaderMap,
        settings: SessionCookieSettings,
    ) -> Result<(), header::InvalidHeaderValue> {
        if let Some(raw) = self.pending() {
            headers.append(header::SET_COOKIE, settings.set_cookie(raw)?);
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn settings() -> SessionCookieSettings {
        SessionCookieSettings {
            secure: false,
            max_age_days: 30,
        }
    }

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_missing_cookie_is_none() {
        let store = SessionStore::from_headers(&HeaderMap::new());
        assert!(store.get().is_none());
        assert!(store.credentials().is_none());
    }

    #[test]
    fn test_empty_cookie_is_none() {
        let store = SessionStore::from_headers(&headers_with_cookie("session=; theme=dark"));
        assert!(store.get().is_none());
    }

    #[test]
    fn test_reads_session_among_other_cookies() {
        let store = SessionStore::from_headers(&headers_with_cookie("theme=dark; session=abc"));
        assert_eq!(store.get(), Some("abc"));
    }

    #[test]
    fn test_corrupted_value_is_present_but_has_no_credentials() {
        let store = SessionStore::from_headers(&headers_with_cookie("session=%7Bnot-json"));
        assert_eq!(store.get(), Some("{not-json"));
        assert!(store.credentials().is_none());
    }

    #[test]
    fn test_round_trip_through_cookie_headers() {
        let tokens = VisitorTokens::issued("access-1", "refresh-1", 3600, 1_700_000_000);

        let mut store = SessionStore::default();
        store.store(&tokens).unwrap();

        let mut response = HeaderMap::new();
        store.write_response(&mut response, settings()).unwrap();
        let set_cookie = response.get(header::SET_COOKIE).unwrap().to_str().unwrap();
        let parsed = Cookie::parse_encoded(set_cookie).unwrap();

        let mut next_request = HeaderMap::new();
        next_request.insert(
            header::COOKIE,
            HeaderValue::from_str(&format!("{}={}", SESSION_COOKIE_NAME, urlencoding::encode(parsed.value())))
                .unwrap(),
        );

        let read_back = SessionStore::from_headers(&next_request);
        assert_eq!(read_back.credentials(), Some(tokens));
    }

    #[test]
    fn test_set_cookie_attributes() {
        let value = SessionCookieSettings {
            secure: true,
            max_age_days: 1,
        }
        .set_cookie("{\"a\":1}")
        .unwrap();
        let cookie = Cookie::parse_encoded(value.to_str().unwrap().to_string()).unwrap();

        assert_eq!(cookie.name(), SESSION_COOKIE_NAME);
        assert_eq!(cookie.value(), "{\"a\":1}");
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.http_only(), None);
        assert_eq!(cookie.max_age(), Some(cookie::time::Duration::days(1)));
    }

    #[test]
    fn test_write_request_makes_value_visible_downstream() {
        let mut store = SessionStore::default();
        store.set("{\"issued\":true}");

        let mut request = headers_with_cookie("theme=dark");
        store.write_request(&mut request);

        let downstream = SessionStore::from_headers(&request);
        assert_eq!(downstream.get(), Some("{\"issued\":true}"));
    }

    #[test]
    fn test_written_value_wins_over_empty_incoming_cookie() {
        let mut store = SessionStore::from_headers(&headers_with_cookie("session="));
        assert!(store.get().is_none());
        store.set("{\"issued\":true}");

        let mut request = headers_with_cookie("session=");
        store.write_request(&mut request);

        let downstream = SessionStore::from_headers(&request);
        assert_eq!(downstream.get(), Some("{\"issued\":true}"));
    }

    #[test]
    fn test_nothing_written_without_pending_value() {
        let store = SessionStore::from_headers(&headers_with_cookie("session=abc"));
        let mut response = HeaderMap::new();
        store.write_response(&mut response, settings()).unwrap();
        assert!(response.get(header::SET_COOKIE).is_none());
    }
}
