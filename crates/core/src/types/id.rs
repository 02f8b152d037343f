//! Newtype IDs for type-safe entity references.
//!
//! Vendure IDs are opaque strings (numeric by default, UUIDs with some id
//! strategies), so every wrapper holds a `String`. Use the `define_id!` macro
//! to keep a variant ID from being passed where an option ID is expected.

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - `new()`, `as_str()`, `Display`, `From<String>` and `From<&str>`
///
/// # Example
///
/// ```rust
/// # use ever_and_always_core::define_id;
/// define_id!(ReviewId);
/// define_id!(AuthorId);
///
/// let review = ReviewId::new("42");
/// assert_eq!(review.as_str(), "42");
///
/// // These are different types, so this won't compile:
/// // let _: AuthorId = review;
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
            /// Create a new ID from anything string-like.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the underlying string.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
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
    };
}

define_id!(ProductId);
define_id!(VariantId);
define_id!(CollectionId);
define_id!(FacetValueId);
define_id!(OptionGroupId);
define_id!(OptionId);
define_id!(OrderLineId);
define_id!(CustomerId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_display_their_value() {
        let id = VariantId::new("17");
        assert_eq!(id.to_string(), "17");
        assert_eq!(id, VariantId::from("17"));
    }

    #[test]
    fn test_ids_hash_by_value() {
        let mut set = std::collections::HashSet::new();
        set.insert(OptionId::new("a"));
        set.insert(OptionId::from(String::from("a")));
        assert_eq!(set.len(), 1);
    }
}
