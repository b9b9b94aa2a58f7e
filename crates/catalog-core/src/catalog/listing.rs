//! The joined product row used by the catalog listing.

use crate::catalog::{Product, Variant};
use serde::{Deserialize, Serialize};

/// Embedded category projection (`category:categories(name)`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryRef {
    pub name: String,
}

/// A product joined with its category name and its variants.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductListing {
    #[serde(flatten)]
    pub product: Product,
    /// Joined category, absent when the product has none.
    #[serde(default)]
    pub category: Option<CategoryRef>,
    /// Variants as returned by the store, possibly with duplicates.
    #[serde(default)]
    pub variants: Vec<Variant>,
}

impl ProductListing {
    /// Number of variant chips shown on a listing card before "+N more".
    pub const PREVIEW_VARIANTS: usize = 2;

    /// Name of the joined category.
    pub fn category_name(&self) -> Option<&str> {
        self.category.as_ref().map(|c| c.name.as_str())
    }

    /// Variants shown on a listing card.
    pub fn preview_variants(&self) -> &[Variant] {
        let end = self.variants.len().min(Self::PREVIEW_VARIANTS);
        &self.variants[..end]
    }

    /// Count of variants folded into "+N more".
    pub fn more_variants(&self) -> usize {
        self.variants.len().saturating_sub(Self::PREVIEW_VARIANTS)
    }
}
