//! Category management commands.

use anyhow::Result;
use catalog_admin::categories;
use catalog_core::forms::CategoryDraft;
use catalog_core::CategoryId;

use super::{confirm, CategoryArgs, CategoryCommand};
use crate::context::Context;

/// Run the category command.
pub async fn run(args: CategoryArgs, ctx: &Context) -> Result<()> {
    match args.command {
        CategoryCommand::List => list(ctx).await,
        CategoryCommand::Show { id } => show(&CategoryId::new(id), ctx).await,
        CategoryCommand::Add { name, description } => add(name, description, ctx).await,
        CategoryCommand::Edit {
            id,
            name,
            description,
        } => edit(&CategoryId::new(id), name, description, ctx).await,
        CategoryCommand::Delete { id, yes } => delete(&CategoryId::new(id), yes, ctx).await,
    }
}

async fn list(ctx: &Context) -> Result<()> {
    let app = ctx.connect().await?;
    let rows = categories::list(app.store()).await?;

    if ctx.output.is_json() {
        ctx.output.json(&rows);
        return Ok(());
    }

    ctx.output.header(&format!("Categories ({})", rows.len()));
    let widths = [12, 24, 40];
    ctx.output.table_header(&["ID", "NAME", "DESCRIPTION"], &widths);
    for category in &rows {
        ctx.output.table_row(
            &[
                category.id.as_str(),
                category.name.as_str(),
                category.description.as_deref().unwrap_or(""),
            ],
            &widths,
        );
    }
    Ok(())
}

async fn show(id: &CategoryId, ctx: &Context) -> Result<()> {
    let app = ctx.connect().await?;
    let category = categories::get(app.store(), id).await?;

    if ctx.output.is_json() {
        ctx.output.json(&category);
        return Ok(());
    }

    ctx.output.header(&category.name);
    ctx.output.kv("id", category.id.as_str());
    ctx.output
        .kv("description", category.description.as_deref().unwrap_or("-"));
    Ok(())
}

async fn add(name: String, description: Option<String>, ctx: &Context) -> Result<()> {
    let app = ctx.admin().await?;
    let mut draft = CategoryDraft::new(name);
    if let Some(description) = description {
        draft = draft.with_description(description);
    }
    let category = categories::create(app.store(), draft).await?;

    if ctx.output.is_json() {
        ctx.output.json(&category);
    } else {
        ctx.output
            .success(&format!("Created category {} ({})", category.name, category.id));
    }
    Ok(())
}

async fn edit(
    id: &CategoryId,
    name: Option<String>,
    description: Option<String>,
    ctx: &Context,
) -> Result<()> {
    let app = ctx.admin().await?;
    let current = categories::get(app.store(), id).await?;

    let mut draft = CategoryDraft::from_category(&current);
    if let Some(name) = name {
        draft.name = name;
    }
    if let Some(description) = description {
        draft = draft.with_description(description);
    }
    categories::update(app.store(), id, draft).await?;

    ctx.output.success(&format!("Updated category {}", id));
    Ok(())
}

async fn delete(id: &CategoryId, yes: bool, ctx: &Context) -> Result<()> {
    let app = ctx.admin().await?;
    let category = categories::get(app.store(), id).await?;

    let prompt = format!("Delete category \"{}\"?", category.name);
    if !confirm(ctx, &prompt, yes)? {
        ctx.output.info("Delete cancelled");
        return Ok(());
    }

    categories::delete(app.store(), id).await?;
    ctx.output.success(&format!("Deleted category {}", category.name));
    Ok(())
}
