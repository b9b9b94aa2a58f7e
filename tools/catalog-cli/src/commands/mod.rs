//! CLI command implementations.

pub mod auth;
pub mod browse;
pub mod category;
pub mod config;
pub mod dedupe;
pub mod import;
pub mod product;
pub mod variant;

use anyhow::{bail, Result};
use catalog_core::Price;
use clap::{Args, Subcommand};
use dialoguer::Confirm;

use crate::context::Context;

/// Arguments for the browse command.
#[derive(Args)]
pub struct BrowseArgs {
    /// Category name, or "all".
    #[arg(long)]
    pub category: Option<String>,

    /// Case-insensitive text search over name and description.
    #[arg(short, long)]
    pub search: Option<String>,

    /// Page number, starting at 1.
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Display width used to pick the page size (default: terminal width).
    #[arg(short, long)]
    pub width: Option<usize>,

    /// Items per page, overriding the width rule.
    #[arg(long)]
    pub per_page: Option<usize>,
}

/// Arguments for the product command.
#[derive(Args)]
pub struct ProductArgs {
    #[command(subcommand)]
    pub command: ProductCommand,
}

/// Fields shared by product add and edit.
#[derive(Args)]
pub struct ProductFields {
    /// Category name.
    #[arg(long)]
    pub category: Option<String>,

    /// Description.
    #[arg(short, long)]
    pub description: Option<String>,

    /// Image URL.
    #[arg(short, long)]
    pub image: Option<String>,

    /// Price, e.g. 19.99.
    #[arg(short, long)]
    pub price: Option<String>,
}

#[derive(Subcommand)]
pub enum ProductCommand {
    /// List all products.
    List,
    /// Show a product with its variants.
    Show {
        /// Product ID.
        id: String,
    },
    /// Create a product.
    Add {
        /// Product name.
        name: String,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Edit a product.
    Edit {
        /// Product ID.
        id: String,
        /// New name.
        #[arg(short, long)]
        name: Option<String>,
        #[command(flatten)]
        fields: ProductFields,
    },
    /// Delete a product and its variants.
    Delete {
        /// Product ID.
        id: String,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the category command.
#[derive(Args)]
pub struct CategoryArgs {
    #[command(subcommand)]
    pub command: CategoryCommand,
}

#[derive(Subcommand)]
pub enum CategoryCommand {
    /// List all categories.
    List,
    /// Show one category.
    Show {
        /// Category ID.
        id: String,
    },
    /// Create a category.
    Add {
        /// Category name.
        name: String,
        /// Description.
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Edit a category.
    Edit {
        /// Category ID.
        id: String,
        /// New name.
        #[arg(short, long)]
        name: Option<String>,
        /// New description.
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a category.
    Delete {
        /// Category ID.
        id: String,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
}

/// Arguments for the variant command.
#[derive(Args)]
pub struct VariantArgs {
    #[command(subcommand)]
    pub command: VariantCommand,
}

/// Fields shared by variant add and edit.
#[derive(Args)]
pub struct VariantFields {
    /// Image URL.
    #[arg(short, long)]
    pub image: Option<String>,

    /// Price, e.g. 19.99.
    #[arg(short, long)]
    pub price: Option<String>,

    /// Units in stock.
    #[arg(short, long)]
    pub stock: Option<i64>,
}

#[derive(Subcommand)]
pub enum VariantCommand {
    /// List the variants of a product.
    List {
        /// Product ID.
        product: String,
    },
    /// Add a variant to a product.
    Add {
        /// Product ID.
        product: String,
        /// Variant name.
        name: String,
        #[command(flatten)]
        fields: VariantFields,
    },
    /// Edit a variant.
    Edit {
        /// Variant ID.
        id: String,
        /// New name.
        #[arg(short, long)]
        name: Option<String>,
        #[command(flatten)]
        fields: VariantFields,
    },
    /// Delete a variant.
    Delete {
        /// Variant ID.
        id: String,
        /// Skip confirmation.
        #[arg(short, long)]
        yes: bool,
    },
    /// Set the display order of a product's variants.
    Reorder {
        /// Product ID.
        product: String,
        /// Variant IDs in the new order.
        #[arg(required = true)]
        ids: Vec<String>,
        /// Write every rank, not only the ones that changed.
        #[arg(long)]
        all: bool,
    },
}

/// Arguments for the import command.
#[derive(Args)]
pub struct ImportArgs {
    /// CSV or Excel file to import.
    pub file: String,

    /// Rehearse against an in-memory copy; nothing is written.
    #[arg(long)]
    pub dry_run: bool,

    /// Category for rows that leave it blank.
    #[arg(long)]
    pub default_category: Option<String>,

    /// Skip confirmation.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the dedupe command.
#[derive(Args)]
pub struct DedupeArgs {
    /// Only report duplicates.
    #[arg(long)]
    pub dry_run: bool,

    /// Skip confirmation.
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the login command.
#[derive(Args)]
pub struct LoginArgs {
    /// Admin email (default: [admin] email or CATALOG_ADMIN_EMAIL).
    #[arg(short, long)]
    pub email: Option<String>,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Create a default catalog.toml here.
    Init {
        /// Overwrite an existing file.
        #[arg(short, long)]
        force: bool,
    },
    /// Set the color scheme, or flip light/dark when none is given.
    Theme {
        /// light, dark or system.
        scheme: Option<String>,
    },
}

/// Parse a price argument.
pub(crate) fn parse_price(input: &str) -> Result<Price> {
    match Price::parse(input) {
        Some(price) if price.cents >= 0 => Ok(price),
        Some(_) => bail!("Price cannot be negative: {}", input),
        None => bail!("Not a price: {}", input),
    }
}

/// Ask before a destructive step unless `--yes` was given.
///
/// JSON mode never prompts; it requires `--yes`.
pub(crate) fn confirm(ctx: &Context, prompt: &str, yes: bool) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    if ctx.output.is_json() {
        bail!("Confirmation required; pass --yes");
    }
    Ok(Confirm::new()
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("$12.50").unwrap(), Price::from_cents(1250));
        assert_eq!(parse_price("0").unwrap(), Price::from_cents(0));
        assert!(parse_price("-1").is_err());
        assert!(parse_price("cheap").is_err());
    }
}
