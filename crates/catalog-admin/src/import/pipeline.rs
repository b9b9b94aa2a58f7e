//! Writing grouped products to the store.

use super::{group_rows, read_sheet, ImportDefaults, ImportError, ImportFailure, ImportProduct};
use crate::error::AdminResult;
use catalog_core::{CategoryId, ProductId};
use catalog_store::{
    decode_row, CatalogStore, Collection, Filter, MemoryStore, Query, Row, StoreError,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, error, info};

/// Products fully processed out of the total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportProgress {
    pub done: usize,
    pub total: usize,
}

impl ImportProgress {
    /// `round(done / total * 100)`; an empty import counts as complete.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.done as f64 / self.total as f64) * 100.0).round() as u8
    }
}

/// What happened to one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportedProduct {
    pub name: String,
    pub product_id: ProductId,
    /// `false` when an existing product with the same name was reused.
    pub created: bool,
    pub variants_inserted: usize,
}

/// Summary of a completed import.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub products: Vec<ImportedProduct>,
}

impl ImportReport {
    pub fn created(&self) -> usize {
        self.products.iter().filter(|p| p.created).count()
    }

    pub fn reused(&self) -> usize {
        self.products.len() - self.created()
    }

    pub fn variants_inserted(&self) -> usize {
        self.products.iter().map(|p| p.variants_inserted).sum()
    }
}

#[derive(Deserialize)]
struct IdRow {
    id: ProductId,
}

fn first_id(rows: Vec<Row>) -> Result<Option<String>, StoreError> {
    match rows.into_iter().next() {
        Some(row) => Ok(Some(decode_row::<IdRow>(row)?.id.into_inner())),
        None => Ok(None),
    }
}

/// Running state of one import.
struct Run<'a> {
    store: &'a dyn CatalogStore,
    categories: HashMap<String, CategoryId>,
    done: usize,
    total: usize,
    wrote: bool,
}

impl Run<'_> {
    async fn category_id(&mut self, name: &str) -> Result<CategoryId, ImportError> {
        if let Some(id) = self.categories.get(name) {
            return Ok(id.clone());
        }
        let query = Query::new()
            .select(&["id"])
            .filter(Filter::eq("name", name))
            .limit(1);
        let rows = self
            .store
            .fetch(Collection::Categories, &query)
            .await
            .map_err(|source| ImportError::CategoryLookup {
                category: name.to_string(),
                source,
            })?;
        let id = first_id(rows)
            .map_err(|source| ImportError::CategoryLookup {
                category: name.to_string(),
                source,
            })?
            .map(CategoryId::new)
            .ok_or_else(|| ImportError::CategoryMissing(name.to_string()))?;
        self.categories.insert(name.to_string(), id.clone());
        Ok(id)
    }

    async fn existing_product(&self, name: &str) -> Result<Option<ProductId>, ImportError> {
        let query = Query::new()
            .select(&["id"])
            .filter(Filter::eq("name", name))
            .limit(1);
        let check = |source: StoreError| ImportError::ProductCheck {
            name: name.to_string(),
            source,
        };
        let rows = self
            .store
            .fetch(Collection::Products, &query)
            .await
            .map_err(check)?;
        Ok(first_id(rows).map_err(check)?.map(ProductId::new))
    }

    async fn insert_product(
        &mut self,
        product: &ImportProduct,
        category_id: &CategoryId,
    ) -> Result<ProductId, ImportError> {
        let insert_err = |source: StoreError| ImportError::ProductInsert {
            name: product.name.clone(),
            source,
        };
        let mut row = Row::new();
        row.insert("name".to_string(), Value::from(product.name.clone()));
        row.insert("category_id".to_string(), Value::from(category_id.as_str()));
        row.insert(
            "image_url".to_string(),
            product.image_url.clone().map_or(Value::Null, Value::from),
        );
        row.insert(
            "price".to_string(),
            Value::from(product.price.as_decimal()),
        );

        let inserted = self
            .store
            .insert(Collection::Products, vec![row])
            .await
            .map_err(insert_err)?;
        self.wrote = true;
        first_id(inserted)
            .map_err(insert_err)?
            .map(ProductId::new)
            .ok_or_else(|| {
                insert_err(StoreError::Decode("insert returned no rows".to_string()))
            })
    }

    async fn insert_variants(
        &mut self,
        product: &ImportProduct,
        product_id: &ProductId,
    ) -> Result<usize, ImportError> {
        if product.variants.is_empty() {
            return Ok(0);
        }
        let rows: Vec<Row> = product
            .variants
            .iter()
            .map(|v| {
                let mut row = Row::new();
                row.insert("product_id".to_string(), Value::from(product_id.as_str()));
                row.insert("name".to_string(), Value::from(v.name.clone()));
                row.insert(
                    "image_url".to_string(),
                    v.image_url.clone().map_or(Value::Null, Value::from),
                );
                row
            })
            .collect();
        let inserted = self
            .store
            .insert(Collection::Variants, rows)
            .await
            .map_err(|source| ImportError::VariantInsert {
                name: product.name.clone(),
                source,
            })?;
        self.wrote = true;
        Ok(inserted.len())
    }

    async fn import_one(&mut self, product: &ImportProduct) -> Result<ImportedProduct, ImportError> {
        let category_id = self.category_id(&product.category).await?;
        let (product_id, created) = match self.existing_product(&product.name).await? {
            Some(id) => (id, false),
            None => (self.insert_product(product, &category_id).await?, true),
        };
        let variants_inserted = self.insert_variants(product, &product_id).await?;
        Ok(ImportedProduct {
            name: product.name.clone(),
            product_id,
            created,
            variants_inserted,
        })
    }

    fn failure(&self, error: ImportError) -> ImportFailure {
        ImportFailure {
            error,
            progress: ImportProgress {
                done: self.done,
                total: self.total,
            }
            .percent(),
            products_committed: self.done,
            partially_applied: self.wrote,
        }
    }
}

/// Write grouped products one at a time, reporting progress after each.
///
/// The first failure halts the import. Products finished before it stay
/// in the store; the failure carries the last reported percentage.
pub async fn import_catalog<F>(
    store: &dyn CatalogStore,
    products: &[ImportProduct],
    mut on_progress: F,
) -> Result<ImportReport, ImportFailure>
where
    F: FnMut(ImportProgress),
{
    let mut run = Run {
        store,
        categories: HashMap::new(),
        done: 0,
        total: products.len(),
        wrote: false,
    };
    let mut report = ImportReport::default();
    info!(products = run.total, "import started");

    for product in products {
        match run.import_one(product).await {
            Ok(outcome) => {
                debug!(
                    product = %outcome.name,
                    created = outcome.created,
                    variants = outcome.variants_inserted,
                    "product imported"
                );
                report.products.push(outcome);
                run.done += 1;
                on_progress(ImportProgress {
                    done: run.done,
                    total: run.total,
                });
            }
            Err(e) => {
                error!(product = %product.name, error = %e, "import halted");
                return Err(run.failure(e));
            }
        }
    }

    info!(
        created = report.created(),
        reused = report.reused(),
        variants = report.variants_inserted(),
        "import finished"
    );
    Ok(report)
}

/// Read, group and import a spreadsheet file.
pub async fn import_file<F>(
    store: &dyn CatalogStore,
    path: impl AsRef<Path>,
    defaults: &ImportDefaults,
    on_progress: F,
) -> Result<ImportReport, ImportFailure>
where
    F: FnMut(ImportProgress),
{
    let rows = read_sheet(path).map_err(|e| {
        error!(error = %e, "failed to read import file");
        ImportFailure::before_start(e)
    })?;
    let products = group_rows(&rows, defaults);
    if products.is_empty() {
        return Err(ImportFailure::before_start(ImportError::NoData));
    }
    import_catalog(store, &products, on_progress).await
}

/// In-memory copy of the categories and product names, for rehearsing an
/// import without writing to the real store.
pub async fn dry_run_store(store: &dyn CatalogStore) -> AdminResult<MemoryStore> {
    let categories = store
        .fetch(Collection::Categories, &Query::new().select(&["id", "name"]))
        .await?;
    let products = store
        .fetch(Collection::Products, &Query::new().select(&["id", "name"]))
        .await?;
    Ok(MemoryStore::new()
        .with_rows(Collection::Categories, categories)
        .with_rows(Collection::Products, products))
}
