//! CLI configuration.

use anyhow::{Context, Result};
use catalog_admin::{ColorScheme, ImportDefaults};
use catalog_core::search::PageSize;
use catalog_core::Price;
use catalog_store::StoreConfig;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, when no `--config` is given.
pub const CONFIG_NAMES: [&str; 3] = ["catalog.toml", ".catalog.toml", "catalog.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    /// Hosted store connection.
    #[serde(default)]
    pub store: StoreConfig,

    /// Spreadsheet import defaults.
    #[serde(default)]
    pub import: ImportConfig,

    /// Listing display.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Administrator account.
    #[serde(default)]
    pub admin: AdminConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &str) -> Result<()> {
        let content = if path.ends_with(".json") {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path))
    }

    /// Overlay `CATALOG_*` environment variables.
    pub fn with_env(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("CATALOG_STORE_URL") {
            self.store.url = url;
        }
        if let Some(key) = get("CATALOG_STORE_KEY") {
            self.store.anon_key = key;
        }
        if let Some(email) = get("CATALOG_ADMIN_EMAIL") {
            self.admin.email = Some(email);
        }
        self
    }
}

/// `[import]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ImportConfig {
    /// Category for rows that leave it blank.
    pub default_category: String,
    /// Price for rows that leave it blank.
    pub default_price: f64,
}

impl Default for ImportConfig {
    fn default() -> Self {
        let defaults = ImportDefaults::default();
        Self {
            default_category: defaults.category,
            default_price: defaults.price.as_decimal(),
        }
    }
}

impl ImportConfig {
    pub fn defaults(&self) -> ImportDefaults {
        ImportDefaults {
            category: self.default_category.clone(),
            price: Price::from_decimal(self.default_price),
        }
    }
}

/// `[display]` section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub color_scheme: ColorScheme,
    pub page_size_compact: usize,
    pub page_size_wide: usize,
    /// Width at or above which the wide page size applies.
    pub wide_threshold: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        let sizes = PageSize::default();
        Self {
            color_scheme: ColorScheme::default(),
            page_size_compact: sizes.compact,
            page_size_wide: sizes.wide,
            wide_threshold: sizes.wide_threshold,
        }
    }
}

impl DisplayConfig {
    pub fn page_size(&self) -> PageSize {
        PageSize {
            compact: self.page_size_compact.max(1),
            wide: self.page_size_wide.max(1),
            wide_threshold: self.wide_threshold,
        }
    }
}

/// `[admin]` section. The password is never stored here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AdminConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Generate a default config file.
pub fn generate_default_config() -> String {
    r#"# Storefront catalog configuration

[store]
# url = "https://your-project.supabase.co"
# anon_key = "your-anon-key"
schema = "public"
timeout_secs = 15

[import]
default_category = "edit"
default_price = 10.0

[display]
color_scheme = "system"
page_size_compact = 12
page_size_wide = 32
wide_threshold = 768

[admin]
# email = "admin@example.com"
"#
    .to_string()
}
