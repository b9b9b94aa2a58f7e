//! Product screens: list, show, create, edit, delete.

use crate::error::{AdminError, AdminResult};
use catalog_core::prelude::*;
use catalog_store::{decode_row, decode_rows, CatalogStore, Collection, Filter, Query};
use serde::Serialize;
use tracing::{error, info};

pub async fn list(store: &dyn CatalogStore) -> AdminResult<Vec<Product>> {
    let rows = store
        .fetch(Collection::Products, &Query::new().order_by("name", true))
        .await
        .map_err(|e| {
            error!(error = %e, "failed to list products");
            e
        })?;
    Ok(decode_rows(rows)?)
}

/// One product; [`AdminError::NotFound`] when the id matches nothing.
pub async fn get(store: &dyn CatalogStore, id: &ProductId) -> AdminResult<Product> {
    let row = store.fetch_one(Collection::Products, id.as_str()).await?;
    Ok(decode_row(row)?)
}

/// First product with exactly this name.
pub async fn find_by_name(store: &dyn CatalogStore, name: &str) -> AdminResult<Option<Product>> {
    let row = store
        .find_first(Collection::Products, vec![Filter::eq("name", name)])
        .await?;
    Ok(row.map(decode_row).transpose()?)
}

pub async fn create(store: &dyn CatalogStore, draft: ProductDraft) -> AdminResult<Product> {
    let draft = draft.normalized();
    draft.validate()?;
    let inserted = store
        .insert(Collection::Products, vec![draft.to_row()?])
        .await
        .map_err(|e| {
            error!(product = %draft.name, error = %e, "failed to create product");
            e
        })?;
    let row = inserted
        .into_iter()
        .next()
        .ok_or_else(|| AdminError::NotFound(format!("inserted product {}", draft.name)))?;
    let product: Product = decode_row(row)?;
    info!(product = %product.name, id = %product.id, "product created");
    Ok(product)
}

pub async fn update(store: &dyn CatalogStore, id: &ProductId, draft: ProductDraft) -> AdminResult<()> {
    let draft = draft.normalized();
    draft.validate()?;
    store
        .update(Collection::Products, id.as_str(), draft.to_row()?)
        .await
        .map_err(|e| {
            error!(%id, error = %e, "failed to update product");
            e
        })?;
    info!(%id, "product updated");
    Ok(())
}

/// What a product delete removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DeleteSummary {
    pub variants_removed: u64,
}

/// Delete a product's variants, then the product.
///
/// Stops at the first failure; variants already removed stay removed.
pub async fn delete(store: &dyn CatalogStore, id: &ProductId) -> AdminResult<DeleteSummary> {
    let variants_removed = store
        .delete(Collection::Variants, &[Filter::eq("product_id", id.as_str())])
        .await
        .map_err(|e| {
            error!(%id, error = %e, "failed to delete variants of product");
            e
        })?;
    store
        .delete_by_id(Collection::Products, id.as_str())
        .await
        .map_err(|e| {
            error!(%id, error = %e, "failed to delete product");
            e
        })?;
    info!(%id, variants_removed, "product deleted");
    Ok(DeleteSummary { variants_removed })
}
