//! Variant screens and rank write-back.

use crate::error::{AdminError, AdminResult, ReorderFailure};
use catalog_core::prelude::*;
use catalog_store::{decode_row, decode_rows, CatalogStore, Collection, Filter, Query, Row};
use futures::future::join_all;
use serde_json::Value;
use tracing::{error, info, warn};

pub async fn get(store: &dyn CatalogStore, id: &VariantId) -> AdminResult<Variant> {
    let row = store.fetch_one(Collection::Variants, id.as_str()).await?;
    Ok(decode_row(row)?)
}

/// Variants of one product as a storefront shows them.
///
/// Duplicates by (name, image) are dropped. The rest are sorted by rank when
/// any variant has one, otherwise by name.
pub async fn for_product(store: &dyn CatalogStore, product_id: &ProductId) -> AdminResult<Vec<Variant>> {
    let query = Query::new().filter(Filter::eq("product_id", product_id.as_str()));
    let rows = store
        .fetch(Collection::Variants, &query)
        .await
        .map_err(|e| {
            error!(product = %product_id, error = %e, "failed to fetch variants");
            e
        })?;
    let variants: Vec<Variant> = decode_rows(rows)?;
    let variants = deduplicate_variants(variants);
    if variants.iter().any(|v| v.position.is_some()) {
        Ok(sort_variants_by_rank(variants))
    } else {
        Ok(sort_variants_by_name(variants))
    }
}

/// Variants of one product wrapped for selection.
pub async fn selection_for(
    store: &dyn CatalogStore,
    product_id: &ProductId,
) -> AdminResult<VariantSelection> {
    Ok(VariantSelection::new(for_product(store, product_id).await?))
}

pub async fn create(store: &dyn CatalogStore, draft: VariantDraft) -> AdminResult<Variant> {
    let draft = draft.normalized();
    draft.validate()?;
    let inserted = store
        .insert(Collection::Variants, vec![draft.to_row()?])
        .await
        .map_err(|e| {
            error!(variant = %draft.name, error = %e, "failed to create variant");
            e
        })?;
    let row = inserted
        .into_iter()
        .next()
        .ok_or_else(|| AdminError::NotFound(format!("inserted variant {}", draft.name)))?;
    let variant: Variant = decode_row(row)?;
    info!(variant = %variant.name, id = %variant.id, "variant created");
    Ok(variant)
}

pub async fn update(store: &dyn CatalogStore, id: &VariantId, draft: VariantDraft) -> AdminResult<()> {
    let draft = draft.normalized();
    draft.validate()?;
    store
        .update(Collection::Variants, id.as_str(), draft.to_row()?)
        .await
        .map_err(|e| {
            error!(%id, error = %e, "failed to update variant");
            e
        })?;
    Ok(())
}

pub async fn delete(store: &dyn CatalogStore, id: &VariantId) -> AdminResult<()> {
    store
        .delete_by_id(Collection::Variants, id.as_str())
        .await
        .map_err(|e| {
            error!(%id, error = %e, "failed to delete variant");
            e
        })?;
    Ok(())
}

fn rank_row(position: i32) -> Row {
    let mut row = Row::new();
    row.insert("position".to_string(), Value::from(position));
    row
}

/// Issue every rank write at once and wait for all of them.
async fn apply_ranks(store: &dyn CatalogStore, updates: Vec<RankUpdate>) -> AdminResult<Vec<RankUpdate>> {
    let writes = updates.iter().map(|u| {
        store.update(Collection::Variants, u.id.as_str(), rank_row(u.position))
    });
    let results = join_all(writes).await;

    let mut applied = Vec::new();
    let mut failures = Vec::new();
    for (update, result) in updates.into_iter().zip(results) {
        match result {
            Ok(()) => applied.push(update),
            Err(error) => {
                error!(id = %update.id, position = update.position, error = %error, "rank write failed");
                failures.push(ReorderFailure { update, error });
            }
        }
    }

    if failures.is_empty() {
        info!(count = applied.len(), "variants reordered");
        Ok(applied)
    } else {
        warn!(
            applied = applied.len(),
            failed = failures.len(),
            "reorder partially applied"
        );
        Err(AdminError::ReorderPartial { applied, failures })
    }
}

/// Write ranks 0..n in the given order.
///
/// Writes run concurrently. If some fail the rest still apply and the
/// error lists both; nothing is rolled back.
pub async fn reorder_variants(
    store: &dyn CatalogStore,
    ordered_ids: &[VariantId],
) -> AdminResult<Vec<RankUpdate>> {
    apply_ranks(store, assign_ranks(ordered_ids)).await
}

/// Like [`reorder_variants`] but only writes ranks that changed.
///
/// Variants of `current` missing from `ordered_ids` are ranked after the
/// listed ones, in their current order.
pub async fn reorder_changed(
    store: &dyn CatalogStore,
    current: &[Variant],
    ordered_ids: &[VariantId],
) -> AdminResult<Vec<RankUpdate>> {
    apply_ranks(store, changed_ranks(current, ordered_ids)).await
}

/// Move `leading` to the front of a product's variants and write the ranks
/// of the whole list.
///
/// With `only_changed`, ranks that already hold are not rewritten.
pub async fn arrange_variants(
    store: &dyn CatalogStore,
    product_id: &ProductId,
    leading: &[VariantId],
    only_changed: bool,
) -> AdminResult<Vec<RankUpdate>> {
    let mut selection = selection_for(store, product_id).await?.with_reorder();
    let current = selection.variants().to_vec();
    selection.arrange(leading)?;

    let order = selection.ordered_ids();
    if only_changed {
        reorder_changed(store, &current, &order).await
    } else {
        reorder_variants(store, &order).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_store::{FailureRule, MemoryStore, Operation};
    use serde_json::json;

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
                row(json!({"id": "a", "product_id": "p1", "name": "b", "image_url": "1"})),
                row(json!({"id": "b", "product_id": "p1", "name": "A", "image_url": "2"})),
                row(json!({"id": "c", "product_id": "p1", "name": "b", "image_url": "1"})),
                row(json!({"id": "d", "product_id": "p2", "name": "Solo"})),
            ],
        )
    }

    fn ids(list: &[&str]) -> Vec<VariantId> {
        list.iter().map(|s| VariantId::new(*s)).collect()
    }

    #[tokio::test]
    async fn test_for_product_dedups_and_sorts_by_name() {
        let variants = for_product(&store(), &ProductId::new("p1")).await.unwrap();
        let got: Vec<(&str, &str)> = variants
            .iter()
            .map(|v| (v.id.as_str(), v.name.as_str()))
            .collect();
        assert_eq!(got, vec![("b", "A"), ("a", "b")]);
    }

    #[tokio::test]
    async fn test_for_product_prefers_ranks() {
        let store = store();
        reorder_variants(&store, &ids(&["a", "b"])).await.unwrap();
        let variants = for_product(&store, &ProductId::new("p1")).await.unwrap();
        assert_eq!(variants[0].id, VariantId::new("a"));
    }

    #[tokio::test]
    async fn test_reorder_assigns_contiguous_ranks() {
        let store = store();
        let applied = reorder_variants(&store, &ids(&["c", "a", "b"])).await.unwrap();
        assert_eq!(applied.len(), 3);
        for (id, rank) in [("c", 0), ("a", 1), ("b", 2)] {
            let v = get(&store, &VariantId::new(id)).await.unwrap();
            assert_eq!(v.position, Some(rank));
        }
    }

    #[tokio::test]
    async fn test_reorder_reports_partial_failure() {
        let store = store().with_failure(
            FailureRule::on(Operation::Update, Collection::Variants).when(Filter::id("a")),
        );
        let err = reorder_variants(&store, &ids(&["c", "a", "b"])).await.unwrap_err();
        match err {
            AdminError::ReorderPartial { applied, failures } => {
                let applied: Vec<(&str, i32)> =
                    applied.iter().map(|u| (u.id.as_str(), u.position)).collect();
                assert_eq!(applied, vec![("c", 0), ("b", 2)]);
                assert_eq!(failures.len(), 1);
                assert_eq!(failures[0].update.id, VariantId::new("a"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(get(&store, &VariantId::new("c")).await.unwrap().position, Some(0));
        assert_eq!(get(&store, &VariantId::new("a")).await.unwrap().position, None);
    }

    #[tokio::test]
    async fn test_reorder_changed_skips_unchanged() {
        let store = store();
        reorder_variants(&store, &ids(&["a", "b"])).await.unwrap();
        let current = for_product(&store, &ProductId::new("p1")).await.unwrap();
        let written = reorder_changed(&store, &current, &ids(&["a", "b"])).await.unwrap();
        assert!(written.is_empty());
        let written = reorder_changed(&store, &current, &ids(&["b", "a"])).await.unwrap();
        assert_eq!(written.len(), 2);
    }

    fn ranked() -> MemoryStore {
        MemoryStore::new().with_rows(
            Collection::Variants,
            vec![
                row(json!({"id": "a", "product_id": "p1", "name": "Red", "position": 0})),
                row(json!({"id": "b", "product_id": "p1", "name": "Blue", "position": 1})),
                row(json!({"id": "c", "product_id": "p1", "name": "Green", "position": 2})),
            ],
        )
    }

    async fn positions(store: &MemoryStore) -> Vec<(String, Option<i32>)> {
        for_product(store, &ProductId::new("p1"))
            .await
            .unwrap()
            .into_iter()
            .map(|v| (v.id.into_inner(), v.position))
            .collect()
    }

    #[tokio::test]
    async fn test_reorder_changed_subset_keeps_ranks_contiguous() {
        let store = ranked();
        let current = for_product(&store, &ProductId::new("p1")).await.unwrap();
        reorder_changed(&store, &current, &ids(&["c"])).await.unwrap();

        assert_eq!(
            positions(&store).await,
            vec![
                ("c".to_string(), Some(0)),
                ("a".to_string(), Some(1)),
                ("b".to_string(), Some(2)),
            ]
        );
    }

    #[tokio::test]
    async fn test_arrange_variants_subset() {
        let store = ranked();
        let written = arrange_variants(&store, &ProductId::new("p1"), &ids(&["b"]), true)
            .await
            .unwrap();
        assert_eq!(written.len(), 2);

        let ranks: Vec<Option<i32>> = positions(&store).await.into_iter().map(|(_, p)| p).collect();
        assert_eq!(ranks, vec![Some(0), Some(1), Some(2)]);
        assert_eq!(positions(&store).await[0].0, "b");
    }

    #[tokio::test]
    async fn test_arrange_variants_rejects_unknown_id() {
        let store = ranked();
        let err = arrange_variants(&store, &ProductId::new("p1"), &ids(&["zzz"]), false)
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Validation(CatalogError::UnknownVariant(_))));
        assert!(store.journal().await.is_empty());
    }

    #[tokio::test]
    async fn test_variant_crud() {
        let store = MemoryStore::new();
        let v = create(&store, VariantDraft::new("p1", "Green").with_image("g.png"))
            .await
            .unwrap();
        assert_eq!(v.product_id, Some(ProductId::new("p1")));
        update(&store, &v.id, VariantDraft::new("p1", "Olive")).await.unwrap();
        assert_eq!(get(&store, &v.id).await.unwrap().name, "Olive");
        delete(&store, &v.id).await.unwrap();
        assert!(get(&store, &v.id).await.unwrap_err().is_not_found());
    }
}
