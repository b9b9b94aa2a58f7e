//! Back-office error types.

use crate::import::ImportFailure;
use catalog_core::variants::RankUpdate;
use catalog_core::CatalogError;
use catalog_store::{AuthError, StoreError};
use std::fmt;
use thiserror::Error;

/// Result type for back-office operations.
pub type AdminResult<T> = Result<T, AdminError>;

/// A rank write that did not go through.
#[derive(Debug, Clone)]
pub struct ReorderFailure {
    pub update: RankUpdate,
    pub error: StoreError,
}

impl fmt::Display for ReorderFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "variant {} -> {}: {}",
            self.update.id, self.update.position, self.error
        )
    }
}

/// Errors surfaced by back-office operations.
#[derive(Error, Debug)]
pub enum AdminError {
    /// The store call failed.
    #[error("Store error: {0}")]
    Store(StoreError),

    /// A single-row fetch matched nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operator input was rejected before any request went out.
    #[error("Validation error: {0}")]
    Validation(#[from] CatalogError),

    /// No signed-in user for an operation that needs one.
    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// Sign-in or session check failed.
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Some rank writes failed; the others were applied and stay applied.
    #[error(
        "Reorder partially applied: {} of {} rank writes failed",
        .failures.len(),
        .failures.len() + .applied.len()
    )]
    ReorderPartial {
        applied: Vec<RankUpdate>,
        failures: Vec<ReorderFailure>,
    },

    /// Bulk import halted.
    #[error(transparent)]
    Import(#[from] Box<ImportFailure>),
}

impl AdminError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, AdminError::NotFound(_))
    }

    /// Whether some writes of the failed operation were kept.
    pub fn is_partially_applied(&self) -> bool {
        match self {
            AdminError::ReorderPartial { applied, .. } => !applied.is_empty(),
            AdminError::Import(failure) => failure.partially_applied,
            _ => false,
        }
    }
}

impl From<StoreError> for AdminError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound(what) => AdminError::NotFound(what),
            other => AdminError::Store(other),
        }
    }
}

impl From<ImportFailure> for AdminError {
    fn from(failure: ImportFailure) -> Self {
        AdminError::Import(Box::new(failure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::VariantId;

    #[test]
    fn test_store_not_found_maps_to_not_found() {
        let err: AdminError = StoreError::NotFound("products/1".into()).into();
        assert!(err.is_not_found());

        let err: AdminError = StoreError::Rejected("nope".into()).into();
        assert!(matches!(err, AdminError::Store(_)));
    }

    #[test]
    fn test_reorder_partial_message() {
        let err = AdminError::ReorderPartial {
            applied: vec![RankUpdate {
                id: VariantId::new("c"),
                position: 0,
            }],
            failures: vec![ReorderFailure {
                update: RankUpdate {
                    id: VariantId::new("a"),
                    position: 1,
                },
                error: StoreError::Rejected("down".into()),
            }],
        };
        assert_eq!(
            err.to_string(),
            "Reorder partially applied: 1 of 2 rank writes failed"
        );
        assert!(err.is_partially_applied());
    }
}
