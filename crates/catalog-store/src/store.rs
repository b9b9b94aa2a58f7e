//! The catalog store trait.

use crate::model::{Collection, Filter, Query, Row};
use crate::StoreError;
use async_trait::async_trait;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Operations the catalog needs from the remote store.
///
/// Every call is independent; there are no transactions. Implementations
/// must be shareable across tasks so reorders can run writes concurrently.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Rows matching the query.
    async fn fetch(&self, collection: Collection, query: &Query) -> StoreResult<Vec<Row>>;

    /// One row by id, or [`StoreError::NotFound`].
    async fn fetch_one(&self, collection: Collection, id: &str) -> StoreResult<Row>;

    /// Insert rows and return them as stored, ids included.
    async fn insert(&self, collection: Collection, rows: Vec<Row>) -> StoreResult<Vec<Row>>;

    /// Set the given columns on the row with this id.
    async fn update(&self, collection: Collection, id: &str, changes: Row) -> StoreResult<()>;

    /// Delete every row matching all filters, returning how many went.
    async fn delete(&self, collection: Collection, filters: &[Filter]) -> StoreResult<u64>;

    /// Use a signed-in user's token for later requests; `None` reverts to
    /// anonymous access.
    async fn authorize(&self, _access_token: Option<String>) {}

    /// First row matching the filters, if any.
    async fn find_first(
        &self,
        collection: Collection,
        filters: Vec<Filter>,
    ) -> StoreResult<Option<Row>> {
        let query = Query {
            filters,
            limit: Some(1),
            ..Query::default()
        };
        Ok(self.fetch(collection, &query).await?.into_iter().next())
    }

    /// Delete one row by id. Deleting nothing is [`StoreError::NotFound`].
    async fn delete_by_id(&self, collection: Collection, id: &str) -> StoreResult<()> {
        match self.delete(collection, &[Filter::id(id)]).await? {
            0 => Err(StoreError::NotFound(format!("{collection}/{id}"))),
            _ => Ok(()),
        }
    }
}
