//! Import error types.

use catalog_store::StoreError;
use thiserror::Error;

/// Why an import stopped.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to read spreadsheet: {0}")]
    Parse(String),

    /// The sheet had a header row but nothing under it.
    #[error("No data found in the file.")]
    NoData,

    /// The category lookup itself failed.
    #[error("Failed to find category {category}: {source}")]
    CategoryLookup { category: String, source: StoreError },

    /// No category has this name. Categories are never created by an import.
    #[error("Category \"{0}\" not found.")]
    CategoryMissing(String),

    #[error("Failed to check existing product {name}: {source}")]
    ProductCheck { name: String, source: StoreError },

    #[error("Failed to import product {name}: {source}")]
    ProductInsert { name: String, source: StoreError },

    #[error("Failed to import variants for product {name}: {source}")]
    VariantInsert { name: String, source: StoreError },
}

impl ImportError {
    /// Check if the failure came from the store rather than the input.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            ImportError::CategoryLookup { .. }
                | ImportError::ProductCheck { .. }
                | ImportError::ProductInsert { .. }
                | ImportError::VariantInsert { .. }
        )
    }
}

impl From<csv::Error> for ImportError {
    fn from(e: csv::Error) -> Self {
        ImportError::Parse(e.to_string())
    }
}

impl From<calamine::Error> for ImportError {
    fn from(e: calamine::Error) -> Self {
        ImportError::Parse(e.to_string())
    }
}

impl From<std::io::Error> for ImportError {
    fn from(e: std::io::Error) -> Self {
        ImportError::Parse(e.to_string())
    }
}

/// A halted import: the error, where progress froze, and what was kept.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct ImportFailure {
    #[source]
    pub error: ImportError,
    /// Last reported percentage before the halt.
    pub progress: u8,
    /// Products fully processed before the halt.
    pub products_committed: usize,
    /// Whether any write reached the store before the halt.
    pub partially_applied: bool,
}

impl ImportFailure {
    /// A failure before anything was written.
    pub fn before_start(error: ImportError) -> Self {
        Self {
            error,
            progress: 0,
            products_committed: 0,
            partially_applied: false,
        }
    }
}
