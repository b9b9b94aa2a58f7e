//! Variant rows.

use crate::catalog::{empty_as_none, null_as_empty};
use crate::ids::{ProductId, VariantId};
use crate::price::Price;
use serde::{Deserialize, Serialize};

/// A variant of a product (a colour, a size, a print).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Variant {
    /// Store-assigned identifier.
    pub id: VariantId,
    /// Parent product. Absent only in partial projections.
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// Variant name; a missing name reads as "".
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
    /// Image reference (URL).
    #[serde(default, deserialize_with = "empty_as_none")]
    pub image_url: Option<String>,
    /// Price or price adjustment.
    #[serde(default)]
    pub price: Option<Price>,
    /// Units in stock.
    #[serde(default)]
    pub stock: Option<i64>,
    /// Explicit display rank, zero-based.
    #[serde(default)]
    pub position: Option<i32>,
}

impl Variant {
    /// Create a variant snapshot with a name and optional image.
    pub fn new(id: impl Into<VariantId>, name: impl Into<String>, image_url: Option<&str>) -> Self {
        Self {
            id: id.into(),
            product_id: None,
            name: name.into(),
            image_url: image_url.map(str::to_string),
            price: None,
            stock: None,
            position: None,
        }
    }

    /// Attach the parent product.
    pub fn for_product(mut self, product_id: impl Into<ProductId>) -> Self {
        self.product_id = Some(product_id.into());
        self
    }

    /// Set the display rank.
    pub fn with_position(mut self, position: i32) -> Self {
        self.position = Some(position);
        self
    }

    /// Check whether stock is known and positive.
    pub fn is_in_stock(&self) -> bool {
        self.stock.map(|s| s > 0).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_name_reads_as_empty() {
        let v: Variant = serde_json::from_str(r#"{"id": "v1", "name": null}"#).unwrap();
        assert_eq!(v.name, "");
        assert_eq!(v.image_url, None);

        let v: Variant = serde_json::from_str(r#"{"id": "v2"}"#).unwrap();
        assert_eq!(v.name, "");
    }

    #[test]
    fn test_full_row() {
        let v: Variant = serde_json::from_str(
            r#"{"id": 7, "product_id": "p1", "name": "Red", "image_url": "a.png",
                "price": "2.50", "stock": 3, "position": 1}"#,
        )
        .unwrap();
        assert_eq!(v.id.as_str(), "7");
        assert_eq!(v.price, Some(Price::from_cents(250)));
        assert!(v.is_in_stock());
        assert_eq!(v.position, Some(1));
    }
}
