//! Catalog entities as read from the remote store.
//!
//! The store is authoritative for every row; these types are in-memory
//! snapshots used for display, filtering and write-back of ranks.

mod category;
mod listing;
mod product;
mod variant;

pub use category::Category;
pub use listing::{CategoryRef, ProductListing};
pub use product::Product;
pub use variant::Variant;

use serde::{Deserialize, Deserializer};

/// Read a text column that may be null or missing as an empty string.
pub(crate) fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Read an optional text column, folding empty strings into `None`.
pub(crate) fn empty_as_none<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<String>, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.filter(|s| !s.is_empty()))
}
