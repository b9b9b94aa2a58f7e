//! End-to-end import runs against the in-memory store.

use catalog_admin::import::{group_rows, import_catalog, import_file, dry_run_store, RawRow};
use catalog_admin::{ImportDefaults, ImportError};
use catalog_store::{CatalogStore, Collection, FailureRule, Filter, MemoryStore, Operation, Query, Row};
use serde_json::{json, Value};
use std::io::Write;

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn store() -> MemoryStore {
    MemoryStore::new()
        .with_rows(
            Collection::Categories,
            vec![
                row(json!({"id": "c-shoes", "name": "Shoes"})),
                row(json!({"id": "c-edit", "name": "edit"})),
            ],
        )
        .with_rows(
            Collection::Products,
            vec![row(json!({"id": "p-old", "name": "Loafer", "category_id": "c-shoes"}))],
        )
}

fn raw(name: &str, category: Option<&str>, variant: Option<&str>) -> RawRow {
    RawRow {
        name: Some(name.to_string()),
        category: category.map(str::to_string),
        variant_name: variant.map(str::to_string),
        ..RawRow::default()
    }
}

async fn names(store: &MemoryStore, collection: Collection) -> Vec<String> {
    store
        .fetch(collection, &Query::new())
        .await
        .unwrap()
        .into_iter()
        .filter_map(|r| r.get("name").and_then(Value::as_str).map(str::to_string))
        .collect()
}

#[tokio::test]
async fn import_creates_products_and_reuses_by_name() {
    let store = store();
    let rows = vec![
        raw("Runner", Some("Shoes"), Some("Red")),
        raw("Runner", Some("Shoes"), Some("Blue")),
        raw("Loafer", Some("Shoes"), Some("Tan")),
        raw("Poster", None, None),
    ];
    let products = group_rows(&rows, &ImportDefaults::default());
    let mut seen = Vec::new();
    let report = import_catalog(&store, &products, |p| seen.push(p.percent()))
        .await
        .unwrap();

    assert_eq!(seen, vec![33, 67, 100]);
    assert_eq!(report.created(), 2);
    assert_eq!(report.reused(), 1);
    assert_eq!(report.variants_inserted(), 3);

    let loafers = store
        .fetch(Collection::Products, &Query::new().filter(Filter::eq("name", "Loafer")))
        .await
        .unwrap();
    assert_eq!(loafers.len(), 1);

    let tan = store
        .find_first(Collection::Variants, vec![Filter::eq("name", "Tan")])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(tan["product_id"], "p-old");

    let poster = store
        .find_first(Collection::Products, vec![Filter::eq("name", "Poster")])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(poster["category_id"], "c-edit");
    assert_eq!(poster["price"], 10.0);
}

#[tokio::test]
async fn import_halts_on_missing_category_and_keeps_earlier_products() {
    let store = store();
    let rows = vec![
        raw("Runner", Some("Shoes"), Some("Red")),
        raw("Ghost", Some("Nonexistent"), Some("Grey")),
        raw("Sandal", Some("Shoes"), None),
    ];
    let products = group_rows(&rows, &ImportDefaults::default());
    let mut last = None;
    let failure = import_catalog(&store, &products, |p| last = Some(p.percent()))
        .await
        .unwrap_err();

    assert!(matches!(failure.error, ImportError::CategoryMissing(ref c) if c == "Nonexistent"));
    assert_eq!(failure.error.to_string(), "Category \"Nonexistent\" not found.");
    assert_eq!(failure.products_committed, 1);
    assert_eq!(failure.progress, 33);
    assert_eq!(last, Some(33));
    assert!(failure.partially_applied);

    let products = names(&store, Collection::Products).await;
    assert!(products.contains(&"Runner".to_string()));
    assert!(!products.contains(&"Ghost".to_string()));
    assert!(!products.contains(&"Sandal".to_string()));
    assert_eq!(names(&store, Collection::Variants).await, vec!["Red"]);
}

#[tokio::test]
async fn import_halts_on_variant_insert_failure_without_rollback() {
    let store = store().with_failure(
        FailureRule::on(Operation::Insert, Collection::Variants).when(Filter::eq("name", "Blue")),
    );
    let rows = vec![
        raw("Runner", Some("Shoes"), Some("Red")),
        raw("Sneaker", Some("Shoes"), Some("Blue")),
    ];
    let products = group_rows(&rows, &ImportDefaults::default());
    let failure = import_catalog(&store, &products, |_| {}).await.unwrap_err();

    assert!(matches!(failure.error, ImportError::VariantInsert { ref name, .. } if name == "Sneaker"));
    assert_eq!(failure.progress, 50);
    // The product row written just before the failing batch stays.
    assert!(names(&store, Collection::Products).await.contains(&"Sneaker".to_string()));
}

#[tokio::test]
async fn import_halts_on_category_lookup_error() {
    let store = store().with_failure(FailureRule::on(Operation::Fetch, Collection::Categories));
    let products = group_rows(&[raw("Runner", Some("Shoes"), None)], &ImportDefaults::default());
    let failure = import_catalog(&store, &products, |_| {}).await.unwrap_err();

    assert!(matches!(failure.error, ImportError::CategoryLookup { .. }));
    assert!(failure.error.to_string().starts_with("Failed to find category Shoes"));
    assert_eq!(failure.progress, 0);
    assert!(!failure.partially_applied);
}

#[tokio::test]
async fn import_file_reads_csv() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "product_id,name,category,price,variant_name,variant_image_url").unwrap();
    writeln!(file, "P1,Tee,Shoes,12.5,S,s.png").unwrap();
    writeln!(file, "P1,Tee,Shoes,12.5,M,m.png").unwrap();

    let store = store();
    let report = import_file(&store, file.path(), &ImportDefaults::default(), |_| {})
        .await
        .unwrap();
    assert_eq!(report.products.len(), 1);
    assert_eq!(report.products[0].variants_inserted, 2);
}

#[tokio::test]
async fn import_file_rejects_header_only_sheet() {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "name,category").unwrap();

    let failure = import_file(&store(), file.path(), &ImportDefaults::default(), |_| {})
        .await
        .unwrap_err();
    assert_eq!(failure.to_string(), "No data found in the file.");
    assert!(!failure.partially_applied);
}

#[tokio::test]
async fn dry_run_leaves_source_untouched() {
    let source = store();
    let rehearsal = dry_run_store(&source).await.unwrap();
    let products = group_rows(&[raw("Runner", Some("Shoes"), Some("Red"))], &ImportDefaults::default());
    import_catalog(&rehearsal, &products, |_| {}).await.unwrap();

    assert_eq!(names(&source, Collection::Products).await, vec!["Loafer"]);
    assert_eq!(names(&rehearsal, Collection::Products).await.len(), 2);
    assert!(source.journal().await.is_empty());
}
