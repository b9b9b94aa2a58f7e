//! Bulk catalog import from a spreadsheet.
//!
//! Rows are read from the first worksheet (or a CSV file), grouped into
//! products by `product_id` or `name`, then written product by product:
//! category resolved by exact name, product reused by name or inserted, all
//! of its variants inserted in one call. The first failure stops the import
//! and leaves earlier products in place.

mod error;
mod grouping;
mod pipeline;
mod sheet;

pub use error::{ImportError, ImportFailure};
pub use grouping::{group_rows, ImportDefaults, ImportProduct, ImportVariant};
pub use pipeline::{
    dry_run_store, import_catalog, import_file, ImportProgress, ImportReport, ImportedProduct,
};
pub use sheet::{read_csv, read_sheet, RawRow};
