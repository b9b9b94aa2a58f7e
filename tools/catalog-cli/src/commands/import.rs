//! Spreadsheet import command.

use anyhow::{bail, Context as _, Result};
use catalog_admin::import::{
    dry_run_store, group_rows, import_catalog, read_sheet, ImportError, ImportFailure,
    ImportReport,
};
use catalog_store::CatalogStore;
use serde_json::json;

use super::{confirm, ImportArgs};
use crate::context::Context;

/// Run the import command.
pub async fn run(args: ImportArgs, ctx: &Context) -> Result<()> {
    let path = ctx.resolve_path(&args.file);
    if !path.exists() {
        bail!("File not found: {}", path.display());
    }

    let mut defaults = ctx.config.import.defaults();
    if let Some(category) = args.default_category {
        defaults.category = category;
    }

    let rows = read_sheet(&path).with_context(|| format!("Failed to read {}", path.display()))?;
    let products = group_rows(&rows, &defaults);
    if products.is_empty() {
        bail!("No data found in the file.");
    }
    let variant_count: usize = products.iter().map(|p| p.variants.len()).sum();
    ctx.output.info(&format!(
        "{} rows grouped into {} products with {} variants",
        rows.len(),
        products.len(),
        variant_count
    ));

    // A rehearsal reads from the live store but writes to a snapshot.
    let app = if args.dry_run {
        ctx.connect().await?
    } else {
        ctx.admin().await?
    };
    let rehearsal;
    let store: &dyn CatalogStore = if args.dry_run {
        rehearsal = dry_run_store(app.store()).await?;
        ctx.output.info("Dry run: nothing will be written to the store");
        &rehearsal
    } else {
        let prompt = format!("Import {} products into the catalog?", products.len());
        if !confirm(ctx, &prompt, args.yes)? {
            ctx.output.info("Import cancelled");
            return Ok(());
        }
        app.store()
    };

    let pb = ctx.output.progress("importing");
    let result = import_catalog(store, &products, |progress| {
        pb.set_position(u64::from(progress.percent()));
        pb.set_message(format!("{}/{} products", progress.done, progress.total));
    })
    .await;

    match result {
        Ok(report) => {
            pb.finish_with_message("done");
            print_report(&report, args.dry_run, ctx);
            Ok(())
        }
        Err(failure) => {
            // Leave the bar where the import stopped.
            pb.abandon_with_message(format!("halted at {}%", failure.progress));
            print_failure(&failure, ctx);
            Err(failure.into())
        }
    }
}

fn print_report(report: &ImportReport, dry_run: bool, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "dry_run": dry_run,
            "created": report.created(),
            "reused": report.reused(),
            "variants_inserted": report.variants_inserted(),
            "products": report.products,
        }));
        return;
    }

    let verb = if dry_run { "Would import" } else { "Imported" };
    ctx.output.success(&format!(
        "{} {} products ({} new, {} existing) and {} variants",
        verb,
        report.products.len(),
        report.created(),
        report.reused(),
        report.variants_inserted()
    ));
    for product in &report.products {
        let status = if product.created { "new" } else { "existing" };
        ctx.output.debug(&format!(
            "{} [{}] +{} variants",
            product.name, status, product.variants_inserted
        ));
    }
}

fn print_failure(failure: &ImportFailure, ctx: &Context) {
    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "error": failure.error.to_string(),
            "cause": failure_cause(&failure.error),
            "progress": failure.progress,
            "products_committed": failure.products_committed,
            "partially_applied": failure.partially_applied,
        }));
        return;
    }

    ctx.output.kv("progress", &format!("{}%", failure.progress));
    ctx.output.kv("cause", failure_cause(&failure.error));
    if failure.error.is_store_failure() {
        ctx.output
            .info("The store rejected a request. Check the connection and credentials, then retry.");
    }
    ctx.output
        .kv("products committed", &failure.products_committed.to_string());
    if failure.partially_applied {
        ctx.output
            .warn("Earlier writes were kept. Fix the file and import again; existing products are reused by name.");
    }
}

/// Whether a failed import should be blamed on the store or on the file.
fn failure_cause(error: &ImportError) -> &'static str {
    if error.is_store_failure() {
        "store"
    } else {
        "input"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_store::StoreError;

    #[test]
    fn test_failure_cause() {
        let store = ImportError::ProductInsert {
            name: "Tee".to_string(),
            source: StoreError::Rejected("duplicate key".to_string()),
        };
        assert_eq!(failure_cause(&store), "store");
        assert_eq!(failure_cause(&ImportError::NoData), "input");
        assert_eq!(
            failure_cause(&ImportError::CategoryMissing("hats".to_string())),
            "input"
        );
    }
}
