//! Configuration management commands.

use std::fs;

use anyhow::{anyhow, bail, Result};
use catalog_admin::ColorScheme;

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CliConfig};
use crate::context::Context;
use crate::output::terminal_prefers_dark;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Init { force } => init_config(force, ctx),
        ConfigCommand::Theme { scheme } => set_theme(scheme.as_deref(), ctx),
    }
}

fn show_config(ctx: &Context) -> Result<()> {
    // Never echo the key itself.
    let mut shown = ctx.config.clone();
    if !shown.store.anon_key.is_empty() {
        shown.store.anon_key = "********".to_string();
    }

    if ctx.output.is_json() {
        ctx.output.json(&shown);
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }

    ctx.output.info("[store]");
    ctx.output.kv("url", or_unset(&shown.store.url));
    ctx.output.kv("anon_key", or_unset(&shown.store.anon_key));
    ctx.output.kv("schema", &shown.store.schema);
    ctx.output.kv("timeout_secs", &shown.store.timeout_secs.to_string());

    ctx.output.info("[import]");
    ctx.output.kv("default_category", &shown.import.default_category);
    ctx.output
        .kv("default_price", &shown.import.defaults().price.display());

    ctx.output.info("[display]");
    ctx.output.kv("color_scheme", shown.display.color_scheme.as_str());
    ctx.output
        .kv("page_size_compact", &shown.display.page_size_compact.to_string());
    ctx.output
        .kv("page_size_wide", &shown.display.page_size_wide.to_string());
    ctx.output
        .kv("wide_threshold", &shown.display.wide_threshold.to_string());

    ctx.output.info("[admin]");
    ctx.output
        .kv("email", shown.admin.email.as_deref().unwrap_or("(unset)"));

    Ok(())
}

fn init_config(force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join("catalog.toml");

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config())?;
    ctx.output
        .success(&format!("Created: {}", config_path.display()));
    Ok(())
}

fn set_theme(scheme: Option<&str>, ctx: &Context) -> Result<()> {
    let path = ctx
        .config_path
        .as_ref()
        .and_then(|p| p.to_str())
        .ok_or_else(|| anyhow!("No config file found. Run `catalog config init` to create one."))?;

    // Reload without environment overrides so they are not written back.
    let mut config = CliConfig::load(path)?;
    let next = match scheme {
        Some(value) => value.parse::<ColorScheme>()?,
        None => config.display.color_scheme.toggled(terminal_prefers_dark()),
    };
    config.display.color_scheme = next;
    config.save(path)?;

    ctx.output.success(&format!("Color scheme set to {}", next));
    Ok(())
}

fn or_unset(value: &str) -> &str {
    if value.is_empty() {
        "(unset)"
    } else {
        value
    }
}
