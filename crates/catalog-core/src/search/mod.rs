//! Search module.
//!
//! Filtering and pagination for the catalog listing. Both run over the
//! already-fetched listing; nothing here talks to the store.

mod filter;
mod pagination;

pub use filter::{CatalogFilter, CategoryScope};
pub use pagination::{PageSize, Pagination};
