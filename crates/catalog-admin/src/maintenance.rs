//! Maintenance: removing duplicate variant rows.
//!
//! Two variants of the same product with the same name and image are
//! duplicates. The first one returned by the store is kept.

use crate::error::AdminResult;
use catalog_core::prelude::*;
use catalog_store::{decode_rows, CatalogStore, Collection, Query};
use serde::Serialize;
use tracing::{error, info};

/// Outcome of a purge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PurgeReport {
    /// Variant rows examined.
    pub scanned: usize,
    /// Rows identified as duplicates.
    pub duplicates: usize,
    pub removed: Vec<VariantId>,
    /// Deletes that failed, with the store's message.
    pub failed: Vec<(VariantId, String)>,
}

impl PurgeReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Duplicate variant rows across every product, in store order.
pub async fn find_duplicate_variants(store: &dyn CatalogStore) -> AdminResult<(usize, Vec<Variant>)> {
    let rows = store
        .fetch(Collection::Variants, &Query::new())
        .await
        .map_err(|e| {
            error!(error = %e, "failed to fetch variants");
            e
        })?;
    let variants: Vec<Variant> = decode_rows(rows)?;
    let scanned = variants.len();
    let (_, duplicates) = partition_duplicates(variants, |v| v.product_id.clone());
    Ok((scanned, duplicates))
}

/// Delete every duplicate variant row.
///
/// Each duplicate is deleted by id. A failed delete is logged and recorded
/// and the purge moves on to the next one.
pub async fn purge_duplicate_variants(store: &dyn CatalogStore) -> AdminResult<PurgeReport> {
    let (scanned, duplicates) = find_duplicate_variants(store).await?;
    let mut report = PurgeReport {
        scanned,
        duplicates: duplicates.len(),
        ..PurgeReport::default()
    };

    for variant in duplicates {
        match store
            .delete_by_id(Collection::Variants, variant.id.as_str())
            .await
        {
            Ok(()) => {
                info!(id = %variant.id, name = %variant.name, "deleted duplicate variant");
                report.removed.push(variant.id);
            }
            Err(e) => {
                error!(id = %variant.id, error = %e, "failed to delete duplicate variant");
                report.failed.push((variant.id, e.to_string()));
            }
        }
    }

    info!(
        scanned = report.scanned,
        removed = report.removed.len(),
        failed = report.failed.len(),
        "duplicate purge finished"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_store::{FailureRule, Filter, MemoryStore, Operation, Row};
    use serde_json::{json, Value};

    fn row(value: Value) -> Row {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn store() -> MemoryStore {
        MemoryStore::new().with_rows(
            Collection::Variants,
            vec![
                row(json!({"id": "1", "product_id": "p1", "name": "Red", "image_url": "a"})),
                row(json!({"id": "2", "product_id": "p1", "name": "Red", "image_url": "a"})),
                row(json!({"id": "3", "product_id": "p2", "name": "Red", "image_url": "a"})),
                row(json!({"id": "4", "product_id": "p1", "name": "Red", "image_url": "a"})),
                row(json!({"id": "5", "product_id": "p1", "name": "Red", "image_url": null})),
            ],
        )
    }

    #[tokio::test]
    async fn test_duplicates_are_scoped_per_product() {
        let (scanned, dups) = find_duplicate_variants(&store()).await.unwrap();
        assert_eq!(scanned, 5);
        let ids: Vec<&str> = dups.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "4"]);
    }

    #[tokio::test]
    async fn test_purge_continues_past_failures() {
        let store = store().with_failure(
            FailureRule::on(Operation::Delete, Collection::Variants).when(Filter::id("2")),
        );
        let report = purge_duplicate_variants(&store).await.unwrap();
        assert_eq!(report.duplicates, 2);
        assert_eq!(report.removed, vec![VariantId::new("4")]);
        assert_eq!(report.failed.len(), 1);
        assert!(!report.is_clean());
        assert_eq!(store.rows(Collection::Variants).await.len(), 4);
    }
}
