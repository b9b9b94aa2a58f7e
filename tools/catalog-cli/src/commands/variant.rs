//! Variant management commands.

use anyhow::{bail, Result};
use catalog_admin::variants::{self, arrange_variants};
use catalog_admin::AdminError;
use catalog_core::forms::VariantDraft;
use catalog_core::{ProductId, VariantId};
use serde_json::json;

use super::{confirm, parse_price, VariantArgs, VariantCommand, VariantFields};
use crate::context::Context;
use crate::output::{format_price, stock_badge};

/// Run the variant command.
pub async fn run(args: VariantArgs, ctx: &Context) -> Result<()> {
    match args.command {
        VariantCommand::List { product } => list(&ProductId::new(product), ctx).await,
        VariantCommand::Add {
            product,
            name,
            fields,
        } => add(ProductId::new(product), name, fields, ctx).await,
        VariantCommand::Edit { id, name, fields } => {
            edit(&VariantId::new(id), name, fields, ctx).await
        }
        VariantCommand::Delete { id, yes } => delete(&VariantId::new(id), yes, ctx).await,
        VariantCommand::Reorder { product, ids, all } => {
            reorder(&ProductId::new(product), ids, all, ctx).await
        }
    }
}

async fn list(product: &ProductId, ctx: &Context) -> Result<()> {
    let app = ctx.connect().await?;
    let rows = variants::for_product(app.store(), product).await?;

    if ctx.output.is_json() {
        ctx.output.json(&rows);
        return Ok(());
    }

    ctx.output.header(&format!("Variants of {} ({})", product, rows.len()));
    let widths = [12, 20, 10, 14, 4];
    ctx.output
        .table_header(&["ID", "NAME", "PRICE", "STOCK", "RANK"], &widths);
    for variant in &rows {
        let rank = variant
            .position
            .map(|p| p.to_string())
            .unwrap_or_else(|| "-".to_string());
        ctx.output.table_row(
            &[
                variant.id.as_str(),
                variant.name.as_str(),
                format_price(variant.price).as_str(),
                stock_badge(variant.stock).as_str(),
                rank.as_str(),
            ],
            &widths,
        );
    }
    Ok(())
}

async fn add(product: ProductId, name: String, fields: VariantFields, ctx: &Context) -> Result<()> {
    let app = ctx.admin().await?;
    let draft = apply_fields(VariantDraft::new(product, name), fields)?;
    let variant = variants::create(app.store(), draft).await?;

    if ctx.output.is_json() {
        ctx.output.json(&variant);
    } else {
        ctx.output
            .success(&format!("Created variant {} ({})", variant.name, variant.id));
    }
    Ok(())
}

async fn edit(
    id: &VariantId,
    name: Option<String>,
    fields: VariantFields,
    ctx: &Context,
) -> Result<()> {
    let app = ctx.admin().await?;
    let current = variants::get(app.store(), id).await?;

    let mut draft = VariantDraft::from_variant(&current);
    if let Some(name) = name {
        draft.name = name;
    }
    let draft = apply_fields(draft, fields)?;
    variants::update(app.store(), id, draft).await?;

    ctx.output.success(&format!("Updated variant {}", id));
    Ok(())
}

async fn delete(id: &VariantId, yes: bool, ctx: &Context) -> Result<()> {
    let app = ctx.admin().await?;
    let variant = variants::get(app.store(), id).await?;

    let prompt = format!("Delete variant \"{}\"?", variant.name);
    if !confirm(ctx, &prompt, yes)? {
        ctx.output.info("Delete cancelled");
        return Ok(());
    }

    variants::delete(app.store(), id).await?;
    ctx.output.success(&format!("Deleted variant {}", variant.name));
    Ok(())
}

async fn reorder(product: &ProductId, ids: Vec<String>, all: bool, ctx: &Context) -> Result<()> {
    let app = ctx.admin().await?;
    let ordered: Vec<VariantId> = ids.into_iter().map(VariantId::new).collect();

    let result = arrange_variants(app.store(), product, &ordered, !all).await;

    match result {
        Ok(applied) => {
            if ctx.output.is_json() {
                ctx.output.json(&json!({ "applied": applied, "failed": [] }));
            } else if applied.is_empty() {
                ctx.output.info("Order unchanged");
            } else {
                ctx.output
                    .success(&format!("Updated {} rank(s)", applied.len()));
            }
            Ok(())
        }
        Err(AdminError::ReorderPartial { applied, failures }) => {
            if ctx.output.is_json() {
                let failed: Vec<_> = failures
                    .iter()
                    .map(|f| json!({ "id": f.update.id, "position": f.update.position, "error": f.error.to_string() }))
                    .collect();
                ctx.output.json(&json!({ "applied": applied, "failed": failed }));
            } else {
                for failure in &failures {
                    ctx.output.warn(&failure.to_string());
                }
            }
            bail!(
                "{} of {} rank writes failed; {} applied and kept",
                failures.len(),
                failures.len() + applied.len(),
                applied.len()
            )
        }
        Err(e) => Err(e.into()),
    }
}

fn apply_fields(mut draft: VariantDraft, fields: VariantFields) -> Result<VariantDraft> {
    if let Some(image) = fields.image {
        draft = draft.with_image(image);
    }
    if let Some(price) = fields.price {
        draft = draft.with_price(parse_price(&price)?);
    }
    if let Some(stock) = fields.stock {
        draft = draft.with_stock(stock);
    }
    Ok(draft)
}
