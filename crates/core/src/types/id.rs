//! Newtype IDs for type-safe entity references.
//!
//! The commerce platform issues opaque string identifiers (UUIDs for
//! entities, merchant-chosen keys for products). The `define_string_id!`
//! macro creates wrappers that prevent accidentally mixing them.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `Display`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>` and `From<&str>` implementations
///
/// # Example
///
/// ```rust
/// # use wildberry_core::define_string_id;
/// define_string_id!(WarehouseId);
/// define_string_id!(ShelfId);
///
/// let warehouse = WarehouseId::new("wh-1");
/// let shelf = ShelfId::new("wh-1");
///
/// // These are different types, so this won't compile:
/// // let _: WarehouseId = shelf;
/// ```
#[macro_export]
macro_rules! define_string_id {
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
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from anything string-like.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
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

// Standard entity IDs
define_string_id!(CategoryId);
define_string_id!(ProductKey);
define_string_id!(CustomerId);
define_string_id!(AddressId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_roundtrip() {
        let id = CategoryId::new("7f2a");
        assert_eq!(id.as_str(), "7f2a");
        assert_eq!(id.to_string(), "7f2a");
        assert_eq!(CategoryId::from("7f2a"), id);
    }

    #[test]
    fn test_serde_transparent() {
        let id = ProductKey::new("wave-tee");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"wave-tee\"");
        let back: ProductKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
