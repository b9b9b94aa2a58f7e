//! Category rows.

use crate::catalog::{empty_as_none, null_as_empty};
use crate::ids::CategoryId;
use serde::{Deserialize, Serialize};

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    /// Store-assigned identifier.
    pub id: CategoryId,
    /// Category name, unique by convention and used by the importer for lookup.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Free-form description.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
}

impl Category {
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
        }
    }

    /// Check whether this category has the given name (exact match).
    pub fn is_named(&self, name: &str) -> bool {
        self.name == name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_with_null_description() {
        let cat: Category =
            serde_json::from_str(r#"{"id": "c1", "name": "Shoes", "description": null}"#).unwrap();
        assert_eq!(cat.name, "Shoes");
        assert_eq!(cat.description, None);
        assert!(cat.is_named("Shoes"));
        assert!(!cat.is_named("shoes"));
    }
}
