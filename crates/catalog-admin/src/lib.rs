//! Back-office services for the storefront catalog.
//!
//! Everything here runs against a [`CatalogStore`](catalog_store::CatalogStore)
//! passed in by the caller:
//!
//! - **Context**: session and color scheme held explicitly by the caller
//! - **Listing**: the joined product listing, filtered and paginated
//! - **Products / Categories / Variants**: the CRUD screens
//! - **Reorder**: concurrent rank write-back with partial-failure reporting
//! - **Import**: spreadsheet rows grouped into products and upserted by name
//! - **Maintenance**: purge of duplicate variant rows
//!
//! Calls are not transactional. A failure stops the operation where it is
//! and leaves earlier writes in place.

pub mod categories;
pub mod context;
pub mod error;
pub mod import;
pub mod listing;
pub mod maintenance;
pub mod products;
pub mod variants;

pub use context::{AppContext, ColorScheme, SessionState};
pub use error::{AdminError, AdminResult, ReorderFailure};
pub use import::{ImportDefaults, ImportError, ImportFailure, ImportProgress, ImportReport};
pub use listing::BrowsePage;
pub use maintenance::PurgeReport;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::context::{AppContext, ColorScheme, SessionState};
    pub use crate::error::{AdminError, AdminResult, ReorderFailure};
    pub use crate::import::{
        import_catalog, import_file, ImportDefaults, ImportFailure, ImportProgress, ImportReport,
    };
    pub use crate::listing::{browse, category_names, fetch_listings, BrowsePage};
    pub use crate::maintenance::{find_duplicate_variants, purge_duplicate_variants, PurgeReport};
    pub use crate::variants::{arrange_variants, reorder_changed, reorder_variants};
}
