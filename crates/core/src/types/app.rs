//! Sub-applications a site can have installed.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error parsing an [`AppKind`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown sub-application: {0}")]
pub struct AppKindError(pub String);

/// A sub-application that gates part of the site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppKind {
    Store,
    Bookings,
    Events,
    Subscriptions,
}

impl AppKind {
    /// All known sub-applications.
    pub const ALL: [Self; 4] = [
        Self::Store,
        Self::Bookings,
        Self::Events,
        Self::Subscriptions,
    ];

    /// Name shown to visitors (and passed to the not-found page).
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Store => "Store",
            Self::Bookings => "Bookings",
            Self::Events => "Events",
            Self::Subscriptions => "Subscriptions",
        }
    }

    /// Identifier used in configuration.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Store => "store",
            Self::Bookings => "bookings",
            Self::Events => "events",
            Self::Subscriptions => "subscriptions",
        }
    }
}

impl fmt::Display for AppKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppKind {
    type Err = AppKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "store" | "stores" => Ok(Self::Store),
            "bookings" | "booking" => Ok(Self::Bookings),
            "events" => Ok(Self::Events),
            "subscriptions" | "pricing_plans" => Ok(Self::Subscriptions),
            _ => Err(AppKindError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_round_trips_through_display() {
        for kind in AppKind::ALL {
            assert_eq!(kind.to_string().parse::<AppKind>(), Ok(kind));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(" Store ".parse::<AppKind>(), Ok(AppKind::Store));
        assert_eq!("BOOKINGS".parse::<AppKind>(), Ok(AppKind::Bookings));
    }

    #[test]
    fn test_parse_unknown() {
        let err = "forum".parse::<AppKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown sub-application: forum");
    }
}
