//! Form drafts for the admin screens.
//!
//! A draft is what an operator typed before it is sent to the store. Blank
//! optional text is normalised to `None` so it writes as null, and
//! `validate` enforces the required fields before any request goes out.

use crate::catalog::{Category, Product, Variant};
use crate::error::CatalogError;
use crate::ids::{CategoryId, ProductId};
use crate::price::Price;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn to_row<T: Serialize>(draft: &T) -> Result<Map<String, Value>, CatalogError> {
    match serde_json::to_value(draft)? {
        Value::Object(map) => Ok(map),
        other => Err(CatalogError::Serialization(format!(
            "expected an object, got {other}"
        ))),
    }
}

/// Product form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: Option<String>,
    pub category_id: Option<CategoryId>,
    pub image_url: Option<String>,
    /// Left out of the written row when unset so edits keep the stored price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Prefill the edit form from a stored product.
    pub fn from_product(product: &Product) -> Self {
        Self {
            name: product.name.clone(),
            description: product.description.clone(),
            category_id: product.category_id.clone(),
            image_url: product.image_url.clone(),
            price: product.price,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category(mut self, category_id: impl Into<CategoryId>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    /// Trim text fields and fold blanks into `None`.
    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: blank_to_none(self.description),
            category_id: self
                .category_id
                .filter(|id| !id.as_str().trim().is_empty()),
            image_url: blank_to_none(self.image_url),
            price: self.price,
        }
    }

    /// Name and category are required; a price may not be negative.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::MissingField("name"));
        }
        if self
            .category_id
            .as_ref()
            .map_or(true, |id| id.as_str().trim().is_empty())
        {
            return Err(CatalogError::MissingField("category"));
        }
        if let Some(price) = self.price {
            if price.cents < 0 {
                return Err(CatalogError::InvalidField {
                    field: "price",
                    reason: format!("{price} is negative"),
                });
            }
        }
        Ok(())
    }

    /// Column map sent to the store.
    pub fn to_row(&self) -> Result<Map<String, Value>, CatalogError> {
        to_row(self)
    }
}

/// Category form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryDraft {
    pub name: String,
    pub description: Option<String>,
}

impl CategoryDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    pub fn from_category(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            description: category.description.clone(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn normalized(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            description: blank_to_none(self.description),
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.name.trim().is_empty() {
            return Err(CatalogError::MissingField("name"));
        }
        Ok(())
    }

    pub fn to_row(&self) -> Result<Map<String, Value>, CatalogError> {
        to_row(self)
    }
}

/// Variant form.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VariantDraft {
    pub product_id: Option<ProductId>,
    pub name: String,
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Price>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
}

impl VariantDraft {
    pub fn new(product_id: impl Into<ProductId>, name: impl Into<String>) -> Self {
        Self {
            product_id: Some(product_id.into()),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn from_variant(variant: &Variant) -> Self {
        Self {
            product_id: variant.product_id.clone(),
            name: variant.name.clone(),
            image_url: variant.image_url.clone(),
            price: variant.price,
            stock: variant.stock,
        }
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }

    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    pub fn with_stock(mut self, stock: i64) -> Self {
        self.stock = Some(stock);
        self
    }

    pub fn normalized(self) -> Self {
        Self {
            product_id: self.product_id,
            name: self.name.trim().to_string(),
            image_url: blank_to_none(self.image_url),
            price: self.price,
            stock: self.stock,
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        if self
            .product_id
            .as_ref()
            .map_or(true, |id| id.as_str().trim().is_empty())
        {
            return Err(CatalogError::MissingField("product"));
        }
        if self.name.trim().is_empty() {
            return Err(CatalogError::MissingField("name"));
        }
        if let Some(stock) = self.stock {
            if stock < 0 {
                return Err(CatalogError::InvalidField {
                    field: "stock",
                    reason: format!("{stock} is negative"),
                });
            }
        }
        Ok(())
    }

    pub fn to_row(&self) -> Result<Map<String, Value>, CatalogError> {
        to_row(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_requires_name_and_category() {
        let draft = ProductDraft::new("  ");
        assert_eq!(draft.validate(), Err(CatalogError::MissingField("name")));

        let draft = ProductDraft::new("Runner");
        assert_eq!(draft.validate(), Err(CatalogError::MissingField("category")));

        let draft = ProductDraft::new("Runner").with_category("c1");
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_negative_price_rejected() {
        let draft = ProductDraft::new("Runner")
            .with_category("c1")
            .with_price(Price::from_cents(-1));
        let err = draft.validate().unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_normalized_folds_blanks() {
        let draft = ProductDraft::new(" Runner ")
            .with_category("c1")
            .with_description("   ")
            .with_image("")
            .normalized();
        assert_eq!(draft.name, "Runner");
        assert_eq!(draft.description, None);
        assert_eq!(draft.image_url, None);
    }

    #[test]
    fn test_product_row_shape() {
        let row = ProductDraft::new("Runner")
            .with_category("c1")
            .to_row()
            .unwrap();
        assert_eq!(row.get("name"), Some(&Value::from("Runner")));
        assert_eq!(row.get("category_id"), Some(&Value::from("c1")));
        assert_eq!(row.get("description"), Some(&Value::Null));
        assert!(!row.contains_key("price"));
    }

    #[test]
    fn test_prefill_from_product() {
        let mut product = Product::new("p1", "Runner");
        product.category_id = Some(CategoryId::new("c1"));
        product.price = Some(Price::from_cents(1000));
        let draft = ProductDraft::from_product(&product);
        assert_eq!(draft.name, "Runner");
        assert_eq!(draft.price, Some(Price::from_cents(1000)));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn test_category_draft() {
        assert!(CategoryDraft::new("").validate().is_err());
        let row = CategoryDraft::new("Shoes").to_row().unwrap();
        assert_eq!(row.len(), 2);
    }

    #[test]
    fn test_variant_draft() {
        let mut draft = VariantDraft::new("p1", "Red");
        assert!(draft.validate().is_ok());

        draft.product_id = None;
        assert_eq!(draft.validate(), Err(CatalogError::MissingField("product")));

        let draft = VariantDraft::new("p1", "Red").with_stock(-2);
        assert!(matches!(
            draft.validate(),
            Err(CatalogError::InvalidField { field: "stock", .. })
        ));
    }
}
