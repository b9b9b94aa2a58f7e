//! Catalog domain types and logic.
//!
//! This crate holds everything about the storefront catalog that does not
//! need the remote store:
//!
//! - **Catalog**: Products, categories, variants and the joined listing row
//! - **Variants**: De-duplication by (name, image), name/rank ordering,
//!   presentation-agnostic selection
//! - **Search**: Category/text filtering and pagination of the listing
//! - **Forms**: Drafts for the admin screens with required-field validation
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_core::prelude::*;
//!
//! let listing: ProductListing = /* fetched from the store */;
//! let variants = sort_variants_by_name(deduplicate_variants(listing.variants));
//!
//! let mut selection = VariantSelection::new(variants);
//! selection.select(&VariantId::new("v-1"));
//! ```

pub mod error;
pub mod forms;
pub mod ids;
pub mod price;

pub mod catalog;
pub mod search;
pub mod variants;

pub use error::CatalogError;
pub use ids::*;
pub use price::Price;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CatalogError;
    pub use crate::ids::*;
    pub use crate::price::Price;

    // Catalog
    pub use crate::catalog::{Category, CategoryRef, Product, ProductListing, Variant};

    // Forms
    pub use crate::forms::{CategoryDraft, ProductDraft, VariantDraft};

    // Variants
    pub use crate::variants::{
        assign_ranks, changed_ranks, complete_order, deduplicate_variants, partition_duplicates,
        sort_variants_by_name, sort_variants_by_rank, Keyed, RankUpdate, VariantKey,
        VariantSelection,
    };

    // Search
    pub use crate::search::{CatalogFilter, CategoryScope, PageSize, Pagination};
}
