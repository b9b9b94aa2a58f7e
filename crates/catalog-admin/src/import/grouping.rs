//! Grouping spreadsheet rows into products.

use super::RawRow;
use catalog_core::Price;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

/// Values used when a row leaves a field empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportDefaults {
    /// Category name for rows without one.
    pub category: String,
    /// Price for rows without one (or with an unreadable one).
    pub price: Price,
}

impl Default for ImportDefaults {
    fn default() -> Self {
        Self {
            category: "edit".to_string(),
            price: Price::from_cents(1000),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportVariant {
    pub name: String,
    pub image_url: Option<String>,
}

/// One product as described by its group of rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportProduct {
    /// Group key: the row's `product_id`, else its `name`.
    pub key: String,
    pub name: String,
    pub category: String,
    pub image_url: Option<String>,
    pub price: Price,
    pub variants: Vec<ImportVariant>,
}

/// Group rows by product key, in first-seen order.
///
/// The first row of a group defines the product; later rows only add
/// variants. A row contributes a variant only when it names one. Rows with
/// neither `product_id` nor `name` are skipped.
pub fn group_rows(rows: &[RawRow], defaults: &ImportDefaults) -> Vec<ImportProduct> {
    let mut products: Vec<ImportProduct> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (line, row) in rows.iter().enumerate() {
        let Some(key) = row.product_id.as_ref().or(row.name.as_ref()) else {
            warn!(row = line + 1, "skipping row without product_id or name");
            continue;
        };

        let slot = *index.entry(key.clone()).or_insert_with(|| {
            products.push(ImportProduct {
                key: key.clone(),
                name: row.name.clone().unwrap_or_else(|| key.clone()),
                category: row
                    .category
                    .clone()
                    .unwrap_or_else(|| defaults.category.clone()),
                image_url: row.image_url.clone(),
                price: row
                    .price
                    .as_deref()
                    .and_then(Price::parse)
                    .unwrap_or(defaults.price),
                variants: Vec::new(),
            });
            products.len() - 1
        });

        if let Some(variant_name) = &row.variant_name {
            products[slot].variants.push(ImportVariant {
                name: variant_name.clone(),
                image_url: row.variant_image_url.clone(),
            });
        }
    }

    products
}
