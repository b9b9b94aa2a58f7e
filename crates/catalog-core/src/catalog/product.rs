//! Product rows.

use crate::catalog::{empty_as_none, null_as_empty};
use crate::ids::{CategoryId, ProductId};
use crate::price::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Image shown when neither a variant nor the product carries one.
pub const PLACEHOLDER_IMAGE: &str = "https://images.unsplash.com/photo-1542291026-7eec264c27ff";

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Store-assigned identifier.
    pub id: ProductId,
    /// Product name. The importer treats it as the identity of a product.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Full description.
    #[serde(default, deserialize_with = "empty_as_none")]
    pub description: Option<String>,
    /// Owning category, if any.
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    /// Image reference (URL).
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image_url: Option<String>,
    /// Base price.
    #[serde(default)]
    pub price: Option<Price>,
    /// Row creation time, when the store reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Create a product snapshot with only a name.
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            category_id: None,
            image_url: None,
            price: None,
            created_at: None,
        }
    }

    /// Image to display, falling back to the storefront placeholder.
    pub fn display_image(&self) -> &str {
        self.image_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE)
    }

    /// Case-insensitive substring match on name or description.
    pub fn matches_text(&self, needle_lower: &str) -> bool {
        self.name.to_lowercase().contains(needle_lower)
            || self
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(needle_lower))
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_store_row() {
        let json = r#"{
            "id": "p1",
            "name": "Runner",
            "description": "",
            "category_id": "c1",
            "image_url": null,
            "price": 10,
            "created_at": "2024-03-01T12:00:00+00:00"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.name, "Runner");
        assert_eq!(product.description, None);
        assert_eq!(product.category_id, Some(CategoryId::new("c1")));
        assert_eq!(product.price, Some(Price::from_cents(1000)));
        assert!(product.created_at.is_some());
        assert_eq!(product.display_image(), PLACEHOLDER_IMAGE);
    }

    #[test]
    fn test_matches_text() {
        let mut product = Product::new("p1", "Trail Runner");
        product.description = Some("Waterproof upper".to_string());

        assert!(product.matches_text("trail"));
        assert!(product.matches_text("waterproof"));
        assert!(!product.matches_text("sandal"));
    }
}
