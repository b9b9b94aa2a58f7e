//! The storefront listing: products joined with category and variants.

use crate::error::AdminResult;
use catalog_core::prelude::*;
use catalog_store::{decode_rows, CatalogStore, Collection, Embed, Query};
use serde::Serialize;
use tracing::{debug, error, warn};

/// Projection used for the listing: every product column, the category
/// name and the variant chips.
pub fn listing_query() -> Query {
    Query::new()
        .embed(Embed::parent(
            "category",
            Collection::Categories,
            "category_id",
            &["name"],
        ))
        .embed(Embed::children(
            "variants",
            Collection::Variants,
            "product_id",
            &["id", "name", "image_url"],
        ))
        .order_by("name", true)
}

/// Fetch the listing with each product's variants de-duplicated.
pub async fn fetch_listings(store: &dyn CatalogStore) -> AdminResult<Vec<ProductListing>> {
    let rows = store
        .fetch(Collection::Products, &listing_query())
        .await
        .map_err(|e| {
            error!(error = %e, "failed to fetch products");
            e
        })?;
    let mut listings: Vec<ProductListing> = decode_rows(rows)?;
    for listing in listings.iter_mut() {
        let variants = std::mem::take(&mut listing.variants);
        listing.variants = deduplicate_variants(variants);
    }
    debug!(count = listings.len(), "fetched listing");
    Ok(listings)
}

/// Category names for the filter selector.
///
/// This is a metadata refresh: a failure is logged and yields an empty list.
pub async fn category_names(store: &dyn CatalogStore) -> Vec<String> {
    let query = Query::new().select(&["name"]).order_by("name", true);
    match store.fetch(Collection::Categories, &query).await {
        Ok(rows) => rows
            .into_iter()
            .filter_map(|row| row.get("name").and_then(|v| v.as_str()).map(str::to_string))
            .collect(),
        Err(e) => {
            warn!(error = %e, "failed to refresh category names");
            Vec::new()
        }
    }
}

/// One page of the filtered listing.
#[derive(Debug, Clone, Serialize)]
pub struct BrowsePage<'a> {
    pub items: Vec<&'a ProductListing>,
    pub pagination: Pagination,
}

/// Filter the listing, then cut out the requested page.
pub fn browse<'a>(
    listings: &'a [ProductListing],
    filter: &CatalogFilter,
    page: usize,
    per_page: usize,
) -> BrowsePage<'a> {
    let matching = filter.apply(listings);
    let pagination = Pagination::new(page, per_page, matching.len());
    let items = pagination.slice(&matching).to_vec();
    BrowsePage { items, pagination }
}
