//! CLI execution context.

use std::ffi::OsString;
use std::fs::{self, OpenOptions};
use std::io::Write as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context as _, Result};
use catalog_admin::AppContext;
use catalog_store::{AuthUser, RestAuth, RestStore};
use tracing::debug;

use crate::config::{CliConfig, CONFIG_NAMES};
use crate::output::Output;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration, with environment overrides applied.
    pub config: CliConfig,
    /// File the configuration came from, if any.
    pub config_path: Option<PathBuf>,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            // Try to find config in current directory or parent directories
            match Self::find_config(&cwd) {
                Some((path, config)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };
        let config = config.with_env();
        let output = output.with_color_scheme(config.display.color_scheme);

        Ok(Self {
            config,
            config_path,
            output,
            cwd,
        })
    }

    /// Find config file in directory tree.
    fn find_config(start: &Path) -> Option<(PathBuf, CliConfig)> {
        let mut current = start.to_path_buf();
        loop {
            for name in &CONFIG_NAMES {
                let config_path = current.join(name);
                if config_path.exists() {
                    if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                        return Some((config_path, config));
                    }
                }
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Connect to the store, restoring a saved session when there is one.
    pub async fn connect(&self) -> Result<AppContext> {
        if !self.config.store.is_configured() {
            bail!(
                "Store is not configured. Set [store] url and anon_key in catalog.toml \
                 or CATALOG_STORE_URL / CATALOG_STORE_KEY."
            );
        }

        let store = RestStore::new(self.config.store.clone()).context("Invalid store settings")?;
        let auth = RestAuth::new(&self.config.store).context("Invalid store settings")?;
        let mut app = AppContext::new(Arc::new(store), Arc::new(auth))
            .with_color_scheme(self.config.display.color_scheme);

        let saved = self.load_session();
        app.initialize(saved.as_ref().map(|u| u.access_token.as_str()))
            .await;
        if saved.is_some() && !app.session().is_signed_in() {
            self.clear_session()?;
        }
        Ok(app)
    }

    /// Connect and make sure an administrator is signed in.
    ///
    /// Without a saved session, `CATALOG_ADMIN_EMAIL` (or `[admin] email`)
    /// together with `CATALOG_ADMIN_PASSWORD` are used to sign in.
    pub async fn admin(&self) -> Result<AppContext> {
        let mut app = self.connect().await?;
        if app.session().is_signed_in() {
            return Ok(app);
        }

        let password = std::env::var("CATALOG_ADMIN_PASSWORD").ok();
        if let (Some(email), Some(password)) = (self.config.admin.email.as_deref(), password) {
            debug!(email = %email, "signing in from environment");
            let user = app.sign_in(email, &password).await?.clone();
            self.save_session(&user)?;
        }

        app.require_admin()
            .map_err(|e| anyhow!("{}. Run `catalog login` first.", e))?;
        Ok(app)
    }

    /// Where the session token is kept between runs.
    pub fn session_file(&self) -> Result<PathBuf> {
        Ok(data_dir(std::env::var_os("HOME"))?
            .join("catalog-cli")
            .join("session.json"))
    }

    /// Read the saved session, ignoring an unreadable file.
    pub fn load_session(&self) -> Option<AuthUser> {
        let content = fs::read_to_string(self.session_file().ok()?).ok()?;
        match serde_json::from_str(&content) {
            Ok(user) => Some(user),
            Err(e) => {
                debug!(error = %e, "ignoring unreadable session file");
                None
            }
        }
    }

    /// Persist the session for later commands.
    pub fn save_session(&self, user: &AuthUser) -> Result<()> {
        let path = self.session_file()?;
        let content = serde_json::to_string_pretty(user)?;
        write_private(&path, &content)
    }

    /// Forget the saved session.
    pub fn clear_session(&self) -> Result<()> {
        let Ok(path) = self.session_file() else {
            return Ok(());
        };
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove session file: {}", path.display()))?;
        }
        Ok(())
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if PathBuf::from(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

/// Per-user data directory under `home`.
fn data_dir(home: Option<OsString>) -> Result<PathBuf> {
    match home {
        Some(home) if !home.is_empty() => Ok(PathBuf::from(home).join(".local").join("share")),
        _ => bail!("HOME is not set; cannot locate the session directory"),
    }
}

/// Write a file only the current user can read, creating its directory.
fn write_private(path: &Path, content: &str) -> Result<()> {
    if let Some(dir) = path.parent() {
        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(0o700);
        }
        builder
            .create(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options
        .open(path)
        .with_context(|| format!("Failed to open session file: {}", path.display()))?;

    // The mode above only applies to new files.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }

    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write session file: {}", path.display()))
}
