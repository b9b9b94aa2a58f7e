//! Catalog CLI - back office for the storefront catalog.
//!
//! Commands:
//! - `catalog browse` - Filter and page through the product listing
//! - `catalog product` - Manage products
//! - `catalog category` - Manage categories
//! - `catalog variant` - Manage and reorder variants
//! - `catalog import` - Bulk import from a spreadsheet
//! - `catalog dedupe` - Purge duplicate variant rows
//! - `catalog login` / `logout` / `whoami` - Admin session
//! - `catalog config` - Manage configuration

mod commands;
mod config;
mod context;
mod logging;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    BrowseArgs, CategoryArgs, ConfigArgs, DedupeArgs, ImportArgs, LoginArgs, ProductArgs,
    VariantArgs,
};

/// Catalog CLI - browse and administer the storefront catalog
#[derive(Parser)]
#[command(name = "catalog")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Use JSON output format
    #[arg(long, global = true)]
    json: bool,

    /// Config file path
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter and page through the product listing
    Browse(BrowseArgs),

    /// Manage products
    Product(ProductArgs),

    /// Manage categories
    Category(CategoryArgs),

    /// Manage variants of a product
    Variant(VariantArgs),

    /// Import products and variants from a CSV or Excel file
    Import(ImportArgs),

    /// Remove duplicate variant rows
    Dedupe(DedupeArgs),

    /// Sign in as an administrator
    Login(LoginArgs),

    /// End the stored admin session
    Logout,

    /// Show the signed-in administrator
    Whoami,

    /// Manage configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::init(cli.verbose);

    // Setup output formatting
    let output = output::Output::new(cli.verbose, cli.json);

    let config_path = cli.config.as_deref();
    let ctx = match context::Context::load(config_path, output.clone()) {
        Ok(ctx) => ctx,
        Err(e) => {
            output.error(&format!("{:#}", e));
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Browse(args) => commands::browse::run(args, &ctx).await,
        Commands::Product(args) => commands::product::run(args, &ctx).await,
        Commands::Category(args) => commands::category::run(args, &ctx).await,
        Commands::Variant(args) => commands::variant::run(args, &ctx).await,
        Commands::Import(args) => commands::import::run(args, &ctx).await,
        Commands::Dedupe(args) => commands::dedupe::run(args, &ctx).await,
        Commands::Login(args) => commands::auth::login(args, &ctx).await,
        Commands::Logout => commands::auth::logout(&ctx).await,
        Commands::Whoami => commands::auth::whoami(&ctx).await,
        Commands::Config(args) => commands::config::run(args, &ctx).await,
    };

    if let Err(e) = result {
        ctx.output.error(&format!("{:#}", e));
        std::process::exit(1);
    }

    Ok(())
}
