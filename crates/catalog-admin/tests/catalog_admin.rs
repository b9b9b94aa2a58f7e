//! Session gating, browsing, reorder and purge against the in-memory store.

use catalog_admin::prelude::*;
use catalog_admin::{products, variants};
use catalog_core::prelude::*;
use catalog_store::{Collection, FailureRule, Filter, MemoryStore, Operation, Row, StaticAuth};
use serde_json::{json, Value};
use std::sync::Arc;

fn row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => unreachable!(),
    }
}

fn seeded() -> MemoryStore {
    MemoryStore::new()
        .with_rows(
            Collection::Categories,
            vec![row(json!({"id": "c1", "name": "Shoes"}))],
        )
        .with_rows(
            Collection::Products,
            vec![row(json!({"id": "p1", "name": "Runner", "category_id": "c1"}))],
        )
        .with_rows(
            Collection::Variants,
            vec![
                row(json!({"id": "a", "product_id": "p1", "name": "Red", "image_url": "r"})),
                row(json!({"id": "b", "product_id": "p1", "name": "Blue", "image_url": "b"})),
                row(json!({"id": "c", "product_id": "p1", "name": "Green", "image_url": "g"})),
                row(json!({"id": "d", "product_id": "p1", "name": "Red", "image_url": "r"})),
            ],
        )
}

fn context(store: Arc<MemoryStore>) -> AppContext {
    let auth = StaticAuth::new().with_account("ops@shop.test", "pw", "u-ops");
    AppContext::new(store, Arc::new(auth))
}

#[tokio::test]
async fn admin_flow_requires_sign_in() {
    let store = Arc::new(seeded());
    let mut ctx = context(store.clone());
    assert!(ctx.require_admin().is_err());

    ctx.sign_in("ops@shop.test", "pw").await.unwrap();
    let admin = ctx.require_admin().unwrap();
    assert_eq!(admin.id, UserId::new("u-ops"));

    let created = products::create(
        ctx.store(),
        ProductDraft::new("Sandal").with_category("c1"),
    )
    .await
    .unwrap();
    assert_eq!(products::get(ctx.store(), &created.id).await.unwrap().name, "Sandal");

    ctx.sign_out().await.unwrap();
    assert!(ctx.require_admin().is_err());
}

#[tokio::test]
async fn listing_and_selection_share_dedup() {
    let store = seeded();
    let listings = fetch_listings(&store).await.unwrap();
    assert_eq!(listings[0].variants.len(), 3);
    assert_eq!(listings[0].more_variants(), 1);

    let mut selection = variants::selection_for(&store, &ProductId::new("p1")).await.unwrap();
    let names: Vec<&str> = selection.variants().iter().map(|v| v.name.as_str()).collect();
    assert_eq!(names, vec!["Blue", "Green", "Red"]);

    selection.select(&VariantId::new("c")).unwrap();
    assert_eq!(selection.display_image(&listings[0].product), "g");
}

#[tokio::test]
async fn reorder_partial_failure_keeps_other_ranks() {
    let store = seeded().with_failure(
        FailureRule::on(Operation::Update, Collection::Variants).when(Filter::id("a")),
    );
    let order = vec![VariantId::new("c"), VariantId::new("a"), VariantId::new("b")];
    let err = reorder_variants(&store, &order).await.unwrap_err();
    assert!(err.is_partially_applied());

    let c = variants::get(&store, &VariantId::new("c")).await.unwrap();
    let b = variants::get(&store, &VariantId::new("b")).await.unwrap();
    assert_eq!((c.position, b.position), (Some(0), Some(2)));
}

#[tokio::test]
async fn purge_then_list_has_no_duplicates() {
    let store = seeded();
    let report = purge_duplicate_variants(&store).await.unwrap();
    assert_eq!(report.removed, vec![VariantId::new("d")]);
    assert!(report.is_clean());

    let again = purge_duplicate_variants(&store).await.unwrap();
    assert_eq!(again.duplicates, 0);
}
