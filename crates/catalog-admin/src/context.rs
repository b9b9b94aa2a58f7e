//! Application context: the session and the color scheme.
//!
//! Both live in an [`AppContext`] value the caller creates at startup and
//! passes to whatever needs them. Nothing here is global.

use crate::error::{AdminError, AdminResult};
use catalog_core::CatalogError;
use catalog_store::{AuthProvider, AuthUser, CatalogStore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// Display color scheme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ColorScheme {
    Light,
    Dark,
    /// Follow the terminal or OS preference.
    #[default]
    System,
}

impl ColorScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorScheme::Light => "light",
            ColorScheme::Dark => "dark",
            ColorScheme::System => "system",
        }
    }

    /// Concrete scheme given the environment's preference.
    pub fn resolve(self, prefers_dark: bool) -> ColorScheme {
        match self {
            ColorScheme::System if prefers_dark => ColorScheme::Dark,
            ColorScheme::System => ColorScheme::Light,
            fixed => fixed,
        }
    }

    /// The opposite of what is currently shown.
    pub fn toggled(self, prefers_dark: bool) -> ColorScheme {
        match self.resolve(prefers_dark) {
            ColorScheme::Dark => ColorScheme::Light,
            _ => ColorScheme::Dark,
        }
    }

    pub fn is_dark(self, prefers_dark: bool) -> bool {
        self.resolve(prefers_dark) == ColorScheme::Dark
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ColorScheme {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ColorScheme::Light),
            "dark" => Ok(ColorScheme::Dark),
            "system" | "auto" => Ok(ColorScheme::System),
            other => Err(CatalogError::InvalidField {
                field: "color_scheme",
                reason: format!("unknown scheme '{other}'"),
            }),
        }
    }
}

/// Who is using the back office.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Anonymous,
    SignedIn(AuthUser),
}

impl SessionState {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            SessionState::SignedIn(user) => Some(user),
            SessionState::Anonymous => None,
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, SessionState::SignedIn(_))
    }
}

/// Store handle, auth provider, session and color scheme for one process.
pub struct AppContext {
    store: Arc<dyn CatalogStore>,
    auth: Arc<dyn AuthProvider>,
    session: SessionState,
    color_scheme: ColorScheme,
}

impl AppContext {
    /// Create a context with an anonymous session.
    pub fn new(store: Arc<dyn CatalogStore>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            store,
            auth,
            session: SessionState::Anonymous,
            color_scheme: ColorScheme::default(),
        }
    }

    pub fn with_color_scheme(mut self, scheme: ColorScheme) -> Self {
        self.color_scheme = scheme;
        self
    }

    pub fn store(&self) -> &dyn CatalogStore {
        self.store.as_ref()
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn current_user(&self) -> Option<&AuthUser> {
        self.session.user()
    }

    /// Restore a session from a stored token, if it is still valid.
    ///
    /// A rejected or lapsed token leaves the session anonymous.
    pub async fn initialize(&mut self, stored_token: Option<&str>) -> &SessionState {
        let Some(token) = stored_token.filter(|t| !t.is_empty()) else {
            return &self.session;
        };
        match self.auth.current_user(token).await {
            Ok(user) if !user.is_expired() => {
                self.store.authorize(Some(user.access_token.clone())).await;
                info!(email = %user.email, "session restored");
                self.session = SessionState::SignedIn(user);
            }
            Ok(user) => {
                warn!(email = %user.email, "stored session has expired");
            }
            Err(e) => {
                warn!(error = %e, "stored session rejected");
            }
        }
        &self.session
    }

    /// Sign in with email and password.
    pub async fn sign_in(&mut self, email: &str, password: &str) -> AdminResult<&AuthUser> {
        let user = self.auth.sign_in(email.trim(), password).await.map_err(|e| {
            warn!(email = %email, error = %e, "sign-in failed");
            AdminError::Auth(e)
        })?;
        self.store.authorize(Some(user.access_token.clone())).await;
        info!(email = %user.email, "signed in");
        self.session = SessionState::SignedIn(user);
        self.require_admin()
    }

    /// End the session. Signing out when anonymous is a no-op.
    pub async fn sign_out(&mut self) -> AdminResult<()> {
        if let SessionState::SignedIn(user) = std::mem::take(&mut self.session) {
            self.store.authorize(None).await;
            self.auth.sign_out(&user).await?;
            info!(email = %user.email, "signed out");
        }
        Ok(())
    }

    /// The signed-in user, or [`AdminError::Unauthorized`].
    pub fn require_admin(&self) -> AdminResult<&AuthUser> {
        self.session
            .user()
            .ok_or_else(|| AdminError::Unauthorized("sign in to manage the catalog".to_string()))
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.color_scheme
    }

    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.color_scheme = scheme;
    }

    /// Flip between light and dark, returning the new scheme.
    pub fn toggle_color_scheme(&mut self, prefers_dark: bool) -> ColorScheme {
        self.color_scheme = self.color_scheme.toggled(prefers_dark);
        self.color_scheme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use catalog_store::{MemoryStore, StaticAuth};

    fn context() -> AppContext {
        let auth = StaticAuth::new().with_account("admin@shop.test", "secret", "u-1");
        AppContext::new(Arc::new(MemoryStore::new()), Arc::new(auth))
    }

    #[tokio::test]
    async fn test_starts_anonymous_and_gates_admin() {
        let ctx = context();
        assert_eq!(ctx.session(), &SessionState::Anonymous);
        assert!(matches!(ctx.require_admin(), Err(AdminError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_sign_in_and_out() {
        let mut ctx = context();
        let user = ctx.sign_in("admin@shop.test", "secret").await.unwrap();
        assert_eq!(user.email, "admin@shop.test");
        assert!(ctx.require_admin().is_ok());

        ctx.sign_out().await.unwrap();
        assert!(!ctx.session().is_signed_in());
        ctx.sign_out().await.unwrap();
    }

    #[tokio::test]
    async fn test_bad_credentials_stay_anonymous() {
        let mut ctx = context();
        assert!(matches!(
            ctx.sign_in("admin@shop.test", "wrong").await,
            Err(AdminError::Auth(_))
        ));
        assert!(!ctx.session().is_signed_in());
    }

    #[tokio::test]
    async fn test_initialize_with_unknown_token() {
        let mut ctx = context();
        let state = ctx.initialize(Some("stale")).await;
        assert_eq!(state, &SessionState::Anonymous);
    }

    #[test]
    fn test_color_scheme() {
        assert_eq!(ColorScheme::System.resolve(true), ColorScheme::Dark);
        assert_eq!(ColorScheme::System.toggled(false), ColorScheme::Dark);
        assert_eq!(ColorScheme::Dark.toggled(false), ColorScheme::Light);
        assert_eq!("DARK".parse::<ColorScheme>().unwrap(), ColorScheme::Dark);
        assert!("sepia".parse::<ColorScheme>().is_err());
    }
}
