//! Newtype IDs for type-safe entity references.
//!
//! The commerce backend identifies everything with opaque strings (GUIDs for
//! products, line items, carts, and checkouts). Use the `define_id!` macro to
//! create wrappers that prevent accidentally mixing IDs from different entity
//! types.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, `Display`, and `AsRef<str>` implementations
///
/// # Example
///
/// ```rust
/// # use mother_vegetables_core::define_id;
/// define_id!(WidgetId);
/// define_id!(GadgetId);
///
/// let widget = WidgetId::new("abc");
/// let gadget = GadgetId::new("abc");
///
/// assert_eq!(widget.as_str(), gadget.as_str());
/// // These are different types, so this won't compile:
/// // let _: WidgetId = gadget;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Convert into the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

// Catalog item IDs on cart lines are product IDs for the Stores catalog.
define_id!(ProductId);
define_id!(LineItemId);
define_id!(CartId);
define_id!(CheckoutId);
define_id!(AppId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_transparently() {
        let id = ProductId::new("df19c1f7-07d8-a265-42f8-e8dfa824cc6e");
        let json = serde_json::to_string(&id).ok();
        assert_eq!(
            json.as_deref(),
            Some("\"df19c1f7-07d8-a265-42f8-e8dfa824cc6e\"")
        );
    }

    #[test]
    fn test_id_display_matches_inner() {
        let id = LineItemId::from("line-1");
        assert_eq!(id.to_string(), "line-1");
        assert_eq!(String::from(id), "line-1");
    }
}
