//! Newtype IDs for type-safe entity references.
//!
//! Store-assigned identifiers are opaque strings: a MongoDB `ObjectId` in hex
//! form in production, a UUID for the in-memory store. Use the `define_id!`
//! macro to create wrappers that prevent mixing IDs from different entities.

/// Macro to define a type-safe opaque ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use bazaar_core::define_id;
/// define_id!(CustomerId);
/// define_id!(InvoiceId);
///
/// let customer_id = CustomerId::new("64f1c2");
/// let invoice_id = InvoiceId::new("64f1c2");
///
/// // These are different types, so this won't compile:
/// // let _: CustomerId = invoice_id;
/// assert_eq!(customer_id.as_str(), invoice_id.as_str());
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
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from its string form.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
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

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(UserId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_is_raw_value() {
        let id = UserId::new("65a1f0c2e4b0a1b2c3d4e5f6");
        assert_eq!(id.to_string(), "65a1f0c2e4b0a1b2c3d4e5f6");
    }

    #[test]
    fn test_serde_transparent() {
        let id = UserId::from("abc123");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"abc123\"");

        let parsed: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_into_string() {
        let id = UserId::new(String::from("xyz"));
        let s: String = id.clone().into();
        assert_eq!(s, "xyz");
        assert_eq!(id.into_inner(), "xyz");
    }
}
