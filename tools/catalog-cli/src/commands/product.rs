//! Product management commands.

use anyhow::{anyhow, Result};
use catalog_admin::{categories, products, variants};
use catalog_core::forms::ProductDraft;
use catalog_core::{CategoryId, ProductId};
use catalog_store::CatalogStore;
use serde_json::json;

use super::{confirm, parse_price, ProductArgs, ProductCommand, ProductFields};
use crate::context::Context;
use crate::output::{format_price, stock_badge};

/// Run the product command.
pub async fn run(args: ProductArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ProductCommand::List => list(ctx).await,
        ProductCommand::Show { id } => show(&ProductId::new(id), ctx).await,
        ProductCommand::Add { name, fields } => add(name, fields, ctx).await,
        ProductCommand::Edit { id, name, fields } => {
            edit(&ProductId::new(id), name, fields, ctx).await
        }
        ProductCommand::Delete { id, yes } => delete(&ProductId::new(id), yes, ctx).await,
    }
}

async fn list(ctx: &Context) -> Result<()> {
    let app = ctx.connect().await?;
    let rows = products::list(app.store()).await?;

    if ctx.output.is_json() {
        ctx.output.json(&rows);
        return Ok(());
    }

    ctx.output.header(&format!("Products ({})", rows.len()));
    let widths = [12, 32, 10];
    ctx.output.table_header(&["ID", "NAME", "PRICE"], &widths);
    for product in &rows {
        ctx.output.table_row(
            &[
                product.id.as_str(),
                product.name.as_str(),
                format_price(product.price).as_str(),
            ],
            &widths,
        );
    }
    Ok(())
}

async fn show(id: &ProductId, ctx: &Context) -> Result<()> {
    let app = ctx.connect().await?;
    let product = products::get(app.store(), id).await?;
    let variants = variants::for_product(app.store(), id).await?;
    let category = match &product.category_id {
        Some(category_id) => Some(categories::get(app.store(), category_id).await?),
        None => None,
    };

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "product": product,
            "category": category,
            "variants": variants,
        }));
        return Ok(());
    }

    ctx.output.header(&product.name);
    ctx.output.kv("id", product.id.as_str());
    ctx.output.kv(
        "category",
        category.as_ref().map(|c| c.name.as_str()).unwrap_or("-"),
    );
    ctx.output.kv("price", &format_price(product.price));
    ctx.output.kv("image", product.display_image());
    if let Some(description) = &product.description {
        ctx.output.kv("description", description);
    }

    ctx.output.header(&format!("Variants ({})", variants.len()));
    for variant in &variants {
        ctx.output.list_item(&format!(
            "{}  {}  {}  {}",
            variant.id,
            variant.name,
            format_price(variant.price),
            stock_badge(variant.stock)
        ));
    }
    Ok(())
}

async fn add(name: String, fields: ProductFields, ctx: &Context) -> Result<()> {
    let app = ctx.admin().await?;
    let draft = apply_fields(ProductDraft::new(name), fields, app.store()).await?;
    let product = products::create(app.store(), draft).await?;

    if ctx.output.is_json() {
        ctx.output.json(&product);
    } else {
        ctx.output
            .success(&format!("Created product {} ({})", product.name, product.id));
    }
    Ok(())
}

async fn edit(
    id: &ProductId,
    name: Option<String>,
    fields: ProductFields,
    ctx: &Context,
) -> Result<()> {
    let app = ctx.admin().await?;
    let current = products::get(app.store(), id).await?;

    let mut draft = ProductDraft::from_product(&current);
    if let Some(name) = name {
        draft.name = name;
    }
    let draft = apply_fields(draft, fields, app.store()).await?;
    products::update(app.store(), id, draft).await?;

    ctx.output.success(&format!("Updated product {}", id));
    Ok(())
}

async fn delete(id: &ProductId, yes: bool, ctx: &Context) -> Result<()> {
    let app = ctx.admin().await?;
    let product = products::get(app.store(), id).await?;

    let prompt = format!("Delete \"{}\" and all of its variants?", product.name);
    if !confirm(ctx, &prompt, yes)? {
        ctx.output.info("Delete cancelled");
        return Ok(());
    }

    let summary = products::delete(app.store(), id).await?;
    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "deleted": id,
            "variants_removed": summary.variants_removed,
        }));
    } else {
        ctx.output.success(&format!(
            "Deleted {} ({} variants removed)",
            product.name, summary.variants_removed
        ));
    }
    Ok(())
}

async fn apply_fields(
    mut draft: ProductDraft,
    fields: ProductFields,
    store: &dyn CatalogStore,
) -> Result<ProductDraft> {
    if let Some(category) = fields.category {
        draft = draft.with_category(resolve_category(store, &category).await?);
    }
    if let Some(description) = fields.description {
        draft = draft.with_description(description);
    }
    if let Some(image) = fields.image {
        draft = draft.with_image(image);
    }
    if let Some(price) = fields.price {
        draft = draft.with_price(parse_price(&price)?);
    }
    Ok(draft)
}

/// Look a category up by exact name.
pub(crate) async fn resolve_category(store: &dyn CatalogStore, name: &str) -> Result<CategoryId> {
    categories::find_by_name(store, name)
        .await?
        .map(|c| c.id)
        .ok_or_else(|| anyhow!("Category \"{}\" not found", name))
}
