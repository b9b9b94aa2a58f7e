//! Newtype IDs for catalog rows.
//!
//! The hosted store assigns every identifier, so these only wrap the string
//! it hands back. Keeping them distinct stops a `ProductId` from being passed
//! where a `VariantId` is expected.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($name:ident) => {
        /// An identifier assigned by the remote store.
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                deserialize_id(deserializer).map(Self)
            }
        }

        impl $name {
            /// Wrap a store identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

/// Store ids arrive as text (uuid) or as integers (identity columns).
#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(s) => s,
        RawId::Number(n) => n.to_string(),
    })
}

define_id!(ProductId);
define_id!(VariantId);
define_id!(CategoryId);
define_id!(UserId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_str() {
        let id: ProductId = "prod-456".into();
        assert_eq!(id.as_str(), "prod-456");
        assert_eq!(format!("{}", id), "prod-456");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = VariantId::new("v-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"v-1\"");

        let back: VariantId = serde_json::from_str("\"v-2\"").unwrap();
        assert_eq!(back, VariantId::new("v-2"));
    }

    #[test]
    fn test_integer_ids_are_accepted() {
        let id: CategoryId = serde_json::from_str("42").unwrap();
        assert_eq!(id.as_str(), "42");
    }
}
