//! Newtype IDs for type-safe entity references.
//!
//! Document-store entities are keyed by opaque string document IDs (catalog
//! books use caller-chosen keys, orders use store-generated keys). The
//! `define_id!` macro creates string newtypes so a `BookId` can never be
//! passed where an `OrderId` is expected.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use marigold_core::define_id;
/// define_id!(BookId);
/// define_id!(OrderId);
///
/// let book = BookId::new("1");
/// let order = OrderId::new("demo-001");
///
/// // These are different types, so this won't compile:
/// // let _: BookId = order;
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
            ::serde::Deserialize,
            Default,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string-like value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Whether the ID is the empty string.
            ///
            /// Denormalized records that predate an entity keep an empty
            /// key; aggregations fall back to a secondary key in that case.
            #[must_use]
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
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

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(BookId);
define_id!(OrderId);
define_id!(UserId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = BookId::new("gen_42");
        assert_eq!(id.as_str(), "gen_42");
        assert_eq!(id.to_string(), "gen_42");
        assert_eq!(id.into_inner(), "gen_42");
    }

    #[test]
    fn test_id_from_conversions() {
        let a: BookId = "1".into();
        let b = BookId::from("1".to_owned());
        assert_eq!(a, b);
    }

    #[test]
    fn test_id_serde_transparent() {
        let id = OrderId::new("demo-001");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"demo-001\"");

        let parsed: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_id_is_empty() {
        assert!(BookId::default().is_empty());
        assert!(!BookId::new("1").is_empty());
    }
}
