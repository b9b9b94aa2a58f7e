//! Listing browse command.

use anyhow::{Context as _, Result};
use catalog_admin::listing::{browse, category_names, fetch_listings};
use catalog_core::catalog::ProductListing;
use catalog_core::search::{CatalogFilter, CategoryScope};
use console::style;

use super::BrowseArgs;
use crate::context::Context;
use crate::output::{format_price, truncate};

/// Run the browse command.
pub async fn run(args: BrowseArgs, ctx: &Context) -> Result<()> {
    let app = ctx.connect().await?;

    let spinner = ctx.output.spinner("Loading catalog...");
    let listings = fetch_listings(app.store()).await;
    let categories = category_names(app.store()).await;
    spinner.finish_and_clear();
    let listings = listings.context("Failed to load the catalog")?;

    let mut filter = CatalogFilter::new()
        .with_category(CategoryScope::parse(args.category.as_deref().unwrap_or("")));
    if let Some(term) = args.search {
        filter = filter.with_search(term);
    }

    let width = args.width.unwrap_or_else(|| ctx.output.term_width());
    let per_page = args
        .per_page
        .unwrap_or_else(|| ctx.config.display.page_size().for_width(width));
    let page = browse(&listings, &filter, args.page, per_page);

    if ctx.output.is_json() {
        ctx.output.json(&page);
        return Ok(());
    }

    if !categories.is_empty() {
        ctx.output.kv("categories", &format!("all, {}", categories.join(", ")));
    }

    if page.items.is_empty() {
        ctx.output.info("No products match.");
        return Ok(());
    }

    let p = &page.pagination;
    ctx.output.header(&format!(
        "Products {}-{} of {}",
        p.start_item(),
        p.end_item(),
        p.total
    ));

    let widths = [24, 16, 10, 40];
    ctx.output
        .table_header(&["NAME", "CATEGORY", "PRICE", "VARIANTS"], &widths);
    for listing in &page.items {
        ctx.output.table_row(
            &[
                listing.product.name.as_str(),
                listing.category_name().unwrap_or("-"),
                format_price(listing.product.price).as_str(),
                variant_chips(listing).as_str(),
            ],
            &widths,
        );
    }

    if p.total_pages > 1 {
        let pages: Vec<String> = p
            .page_numbers()
            .into_iter()
            .map(|n| {
                if n == p.page {
                    style(format!("[{}]", n)).bold().to_string()
                } else {
                    n.to_string()
                }
            })
            .collect();
        println!();
        ctx.output.kv("pages", &pages.join(" "));
        if p.has_next() {
            ctx.output
                .info(&format!("Next: catalog browse --page {}", p.page + 1));
        }
    }

    Ok(())
}

/// Preview of a listing's variant names, e.g. "Red, Blue +2".
fn variant_chips(listing: &ProductListing) -> String {
    let names: Vec<String> = listing
        .preview_variants()
        .iter()
        .map(|v| truncate(&v.name, 12))
        .collect();
    match listing.more_variants() {
        0 => names.join(", "),
        more => format!("{} +{}", names.join(", "), more),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_core::catalog::{Product, Variant};

    fn listing(variants: &[&str]) -> ProductListing {
        ProductListing {
            product: Product::new("p1", "Tee"),
            category: None,
            variants: variants
                .iter()
                .enumerate()
                .map(|(i, name)| Variant::new(i.to_string(), *name, None))
                .collect(),
        }
    }

    #[test]
    fn test_variant_chips() {
        assert_eq!(variant_chips(&listing(&[])), "");
        assert_eq!(variant_chips(&listing(&["S", "M"])), "S, M");
        assert_eq!(variant_chips(&listing(&["S", "M", "L", "XL"])), "S, M +2");
    }
}
