//! Duplicate variant purge.

use anyhow::{bail, Result};
use catalog_admin::maintenance::{find_duplicate_variants, purge_duplicate_variants};

use super::{confirm, DedupeArgs};
use crate::context::Context;

/// Run the dedupe command.
pub async fn run(args: DedupeArgs, ctx: &Context) -> Result<()> {
    let app = ctx.admin().await?;

    let spinner = ctx.output.spinner("Scanning variants...");
    let scan = find_duplicate_variants(app.store()).await;
    spinner.finish_and_clear();
    let (scanned, duplicates) = scan?;

    if duplicates.is_empty() {
        if ctx.output.is_json() {
            ctx.output
                .json(&serde_json::json!({ "scanned": scanned, "duplicates": 0 }));
        } else {
            ctx.output
                .success(&format!("No duplicates among {} variants", scanned));
        }
        return Ok(());
    }

    if !ctx.output.is_json() {
        ctx.output.header(&format!(
            "{} duplicate variant(s) among {}",
            duplicates.len(),
            scanned
        ));
        for variant in &duplicates {
            ctx.output.list_item(&format!(
                "{}  {}  {}",
                variant.id,
                variant.name,
                variant.image_url.as_deref().unwrap_or("-")
            ));
        }
    }

    if args.dry_run {
        if ctx.output.is_json() {
            ctx.output.json(&duplicates);
        }
        return Ok(());
    }

    if !confirm(ctx, "Delete these rows?", args.yes)? {
        ctx.output.info("Nothing deleted");
        return Ok(());
    }

    let report = purge_duplicate_variants(app.store()).await?;
    if ctx.output.is_json() {
        ctx.output.json(&report);
    } else {
        ctx.output
            .success(&format!("Removed {} duplicate variant(s)", report.removed.len()));
        for (id, error) in &report.failed {
            ctx.output.warn(&format!("{}: {}", id, error));
        }
    }

    if !report.is_clean() {
        bail!("{} delete(s) failed", report.failed.len());
    }
    Ok(())
}
