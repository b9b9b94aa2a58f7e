//! Catalog error types.

use thiserror::Error;

/// Errors raised by catalog domain operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// A required form field was left empty.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A field holds a value the catalog cannot accept.
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// A reorder referenced a variant that is not in the list.
    #[error("Variant not in list: {0}")]
    UnknownVariant(String),

    /// Reorder capability was not enabled for this selection.
    #[error("Reordering is not enabled for this variant list")]
    ReorderDisabled,

    /// Index outside the variant list.
    #[error("Position {index} is out of range for {len} variants")]
    OutOfRange { index: usize, len: usize },

    /// A row could not be decoded into a catalog type.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CatalogError {
    /// Check if this is a user-input validation failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CatalogError::MissingField(_) | CatalogError::InvalidField { .. }
        )
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(e: serde_json::Error) -> Self {
        CatalogError::Serialization(e.to_string())
    }
}
