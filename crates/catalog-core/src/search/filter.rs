//! Listing filters.

use crate::catalog::ProductListing;
use serde::{Deserialize, Serialize};

/// Which categories the listing shows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum CategoryScope {
    /// Every product, including uncategorised ones.
    #[default]
    All,
    /// Products whose joined category has exactly this name.
    Named(String),
}

impl CategoryScope {
    /// Parse a selector value; "all" (any case) or blank selects everything.
    pub fn parse(value: &str) -> Self {
        let value = value.trim();
        if value.is_empty() || value.eq_ignore_ascii_case("all") {
            CategoryScope::All
        } else {
            CategoryScope::Named(value.to_string())
        }
    }

    fn matches(&self, listing: &ProductListing) -> bool {
        match self {
            CategoryScope::All => true,
            CategoryScope::Named(name) => listing.category_name() == Some(name.as_str()),
        }
    }
}

/// Category and free-text filter for the catalog listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogFilter {
    pub category: CategoryScope,
    /// Case-insensitive substring searched in name and description.
    pub search: Option<String>,
}

impl CatalogFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: CategoryScope) -> Self {
        self.category = category;
        self
    }

    /// Set the search term; a blank term clears it.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search = if term.trim().is_empty() { None } else { Some(term) };
        self
    }

    pub fn matches(&self, listing: &ProductListing) -> bool {
        if !self.category.matches(listing) {
            return false;
        }
        match &self.search {
            Some(term) => listing.product.matches_text(&term.to_lowercase()),
            None => true,
        }
    }

    /// Keep matching listings in their original order.
    pub fn apply<'a>(&self, listings: &'a [ProductListing]) -> Vec<&'a ProductListing> {
        listings.iter().filter(|l| self.matches(l)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CategoryRef, Product};

    fn listing(name: &str, description: Option<&str>, category: Option<&str>) -> ProductListing {
        let mut product = Product::new(name, name);
        product.description = description.map(str::to_string);
        ProductListing {
            product,
            category: category.map(|c| CategoryRef { name: c.to_string() }),
            variants: Vec::new(),
        }
    }

    fn sample() -> Vec<ProductListing> {
        vec![
            listing("Trail Runner", Some("Grippy sole"), Some("Shoes")),
            listing("Linen Shirt", None, Some("Shirts")),
            listing("Mystery Box", Some("Contains shoes"), None),
        ]
    }

    #[test]
    fn test_all_passes_everything() {
        let all = sample();
        assert_eq!(CatalogFilter::new().apply(&all).len(), 3);
    }

    #[test]
    fn test_category_exact() {
        let all = sample();
        let filter = CatalogFilter::new().with_category(CategoryScope::parse("Shoes"));
        let hits = filter.apply(&all);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].product.name, "Trail Runner");

        let filter = CatalogFilter::new().with_category(CategoryScope::parse("shoes"));
        assert!(filter.apply(&all).is_empty());
    }

    #[test]
    fn test_search_name_or_description() {
        let all = sample();
        let filter = CatalogFilter::new().with_search("SHOES");
        let hits: Vec<&str> = filter.apply(&all).iter().map(|l| l.product.name.as_str()).collect();
        assert_eq!(hits, vec!["Mystery Box"]);
    }

    #[test]
    fn test_combined() {
        let all = sample();
        let filter = CatalogFilter::new()
            .with_category(CategoryScope::Named("Shirts".to_string()))
            .with_search("linen");
        assert_eq!(filter.apply(&all).len(), 1);
    }

    #[test]
    fn test_scope_parse() {
        assert_eq!(CategoryScope::parse("all"), CategoryScope::All);
        assert_eq!(CategoryScope::parse("  "), CategoryScope::All);
        assert_eq!(CategoryScope::parse("Hats"), CategoryScope::Named("Hats".to_string()));
    }
}
