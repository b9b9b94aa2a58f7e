//! Category screens.

use crate::error::{AdminError, AdminResult};
use catalog_core::prelude::*;
use catalog_store::{decode_row, decode_rows, CatalogStore, Collection, Filter, Query};
use tracing::{error, info};

pub async fn list(store: &dyn CatalogStore) -> AdminResult<Vec<Category>> {
    let rows = store
        .fetch(Collection::Categories, &Query::new().order_by("name", true))
        .await
        .map_err(|e| {
            error!(error = %e, "failed to list categories");
            e
        })?;
    Ok(decode_rows(rows)?)
}

pub async fn get(store: &dyn CatalogStore, id: &CategoryId) -> AdminResult<Category> {
    let row = store.fetch_one(Collection::Categories, id.as_str()).await?;
    Ok(decode_row(row)?)
}

/// Category with exactly this name.
pub async fn find_by_name(store: &dyn CatalogStore, name: &str) -> AdminResult<Option<Category>> {
    let row = store
        .find_first(Collection::Categories, vec![Filter::eq("name", name)])
        .await?;
    Ok(row.map(decode_row).transpose()?)
}

pub async fn create(store: &dyn CatalogStore, draft: CategoryDraft) -> AdminResult<Category> {
    let draft = draft.normalized();
    draft.validate()?;
    let inserted = store
        .insert(Collection::Categories, vec![draft.to_row()?])
        .await
        .map_err(|e| {
            error!(category = %draft.name, error = %e, "failed to create category");
            e
        })?;
    let row = inserted
        .into_iter()
        .next()
        .ok_or_else(|| AdminError::NotFound(format!("inserted category {}", draft.name)))?;
    let category: Category = decode_row(row)?;
    info!(category = %category.name, id = %category.id, "category created");
    Ok(category)
}

pub async fn update(
    store: &dyn CatalogStore,
    id: &CategoryId,
    draft: CategoryDraft,
) -> AdminResult<()> {
    let draft = draft.normalized();
    draft.validate()?;
    store
        .update(Collection::Categories, id.as_str(), draft.to_row()?)
        .await
        .map_err(|e| {
            error!(%id, error = %e, "failed to update category");
            e
        })?;
    Ok(())
}

/// Delete a category. Products that reference it are left to the store's
/// constraints.
pub async fn delete(store: &dyn CatalogStore, id: &CategoryId) -> AdminResult<()> {
    store
        .delete_by_id(Collection::Categories, id.as_str())
        .await
        .map_err(|e| {
            error!(%id, error = %e, "failed to delete category");
            e
        })?;
    info!(%id, "category deleted");
    Ok(())
}
