//! Remote data store boundary for the catalog.
//!
//! Every product, category and variant lives in a hosted store. This crate
//! describes what the rest of the workspace may ask of it:
//!
//! - **Model**: collections, rows, equality filters and embedded relations
//! - **Store**: the [`CatalogStore`] trait with fetch, fetch-one (with a
//!   distinguished not-found), insert, update and delete
//! - **Backends**: [`RestStore`] speaks the PostgREST dialect over HTTP;
//!   [`MemoryStore`] keeps tables in process for tests and dry runs
//! - **Auth**: email/password sign-in through an [`AuthProvider`]
//!
//! # Example
//!
//! ```rust,ignore
//! use catalog_store::prelude::*;
//!
//! let store = RestStore::new(StoreConfig::new(url, anon_key))?;
//! let query = Query::new()
//!     .filter(Filter::eq("name", "Trail Runner"))
//!     .limit(1);
//! let rows = store.fetch(Collection::Products, &query).await?;
//! ```

mod auth;
mod config;
mod error;
mod memory;
mod model;
mod rest;
mod store;

pub use auth::{AuthProvider, AuthUser, RestAuth, StaticAuth};
pub use config::StoreConfig;
pub use error::{AuthError, StoreError};
pub use memory::{FailureRule, MemoryStore, Operation};
pub use model::{
    decode_row, decode_rows, Collection, Embed, Filter, Order, Query, Relation, Row,
};
pub use rest::RestStore;
pub use store::{CatalogStore, StoreResult};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        AuthProvider, AuthUser, CatalogStore, Collection, Embed, Filter, MemoryStore, Query,
        RestStore, Row, StoreConfig, StoreError,
    };
}
