//! Email/password authentication against the hosted store.

use crate::config::StoreConfig;
use crate::AuthError;
use async_trait::async_trait;
use catalog_core::UserId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

/// A signed-in user and the token that proves it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthUser {
    pub id: UserId,
    pub email: String,
    /// Bearer token for store requests.
    pub access_token: String,
    /// Unix timestamp when the token lapses, if the provider said.
    #[serde(default)]
    pub expires_at: Option<i64>,
}

impl AuthUser {
    /// Check whether the token has lapsed at `now` (unix seconds).
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }
}

/// Sign-in boundary.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Exchange credentials for a session.
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError>;

    /// Resolve a stored token back to its user.
    async fn current_user(&self, access_token: &str) -> Result<AuthUser, AuthError>;

    /// End the session.
    async fn sign_out(&self, user: &AuthUser) -> Result<(), AuthError>;
}

#[derive(Deserialize)]
struct UserBody {
    id: UserId,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Deserialize)]
struct TokenBody {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
    user: UserBody,
}

/// [`AuthProvider`] over the store's auth endpoints.
pub struct RestAuth {
    base_url: String,
    anon_key: String,
    client: reqwest::Client,
}

impl RestAuth {
    pub fn new(config: &StoreConfig) -> Result<Self, AuthError> {
        if !config.is_configured() {
            return Err(AuthError::Request(
                "store url and anon key must both be set".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| AuthError::Request(e.to_string()))?;
        Ok(Self {
            base_url: config.base_url().to_string(),
            anon_key: config.anon_key.clone(),
            client,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }
}

#[async_trait]
impl AuthProvider for RestAuth {
    #[instrument(name = "auth_sign_in", skip(self, password))]
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .client
            .post(self.url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;
        let status = response.status();
        if status.is_client_error() {
            debug!(%status, "sign-in rejected");
            return Err(AuthError::InvalidCredentials);
        }
        if !status.is_success() {
            return Err(AuthError::Request(format!("HTTP {status}")));
        }
        let body: TokenBody = response.json().await?;
        Ok(AuthUser {
            id: body.user.id,
            email: body.user.email.unwrap_or_else(|| email.to_string()),
            access_token: body.access_token,
            expires_at: body
                .expires_in
                .map(|secs| chrono::Utc::now().timestamp() + secs),
        })
    }

    #[instrument(name = "auth_current_user", skip_all)]
    async fn current_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        let response = self
            .client
            .get(self.url("user"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        let status = response.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(AuthError::SessionExpired);
        }
        if !status.is_success() {
            return Err(AuthError::Request(format!("HTTP {status}")));
        }
        let body: UserBody = response.json().await?;
        Ok(AuthUser {
            id: body.id,
            email: body.email.unwrap_or_default(),
            access_token: access_token.to_string(),
            expires_at: None,
        })
    }

    #[instrument(name = "auth_sign_out", skip_all, fields(email = %user.email))]
    async fn sign_out(&self, user: &AuthUser) -> Result<(), AuthError> {
        let response = self
            .client
            .post(self.url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(&user.access_token)
            .send()
            .await?;
        let status = response.status();
        // An already-revoked token is as good as signed out.
        if status.is_success() || status.as_u16() == 401 {
            Ok(())
        } else {
            Err(AuthError::Request(format!("HTTP {status}")))
        }
    }
}

struct Account {
    id: UserId,
    password: String,
}

/// Fixed set of accounts held in memory.
#[derive(Default)]
pub struct StaticAuth {
    accounts: HashMap<String, Account>,
    sessions: Mutex<HashMap<String, AuthUser>>,
    issued: Mutex<u64>,
}

impl StaticAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(
        mut self,
        email: impl Into<String>,
        password: impl Into<String>,
        id: impl Into<UserId>,
    ) -> Self {
        self.accounts.insert(
            email.into(),
            Account {
                id: id.into(),
                password: password.into(),
            },
        );
        self
    }
}

#[async_trait]
impl AuthProvider for StaticAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AuthError> {
        let account = self
            .accounts
            .get(email)
            .filter(|a| a.password == password)
            .ok_or(AuthError::InvalidCredentials)?;

        let mut issued = self.issued.lock().await;
        *issued += 1;
        let user = AuthUser {
            id: account.id.clone(),
            email: email.to_string(),
            access_token: format!("static-{}-{}", account.id, *issued),
            expires_at: None,
        };
        self.sessions
            .lock()
            .await
            .insert(user.access_token.clone(), user.clone());
        Ok(user)
    }

    async fn current_user(&self, access_token: &str) -> Result<AuthUser, AuthError> {
        self.sessions
            .lock()
            .await
            .get(access_token)
            .cloned()
            .ok_or(AuthError::SessionExpired)
    }

    async fn sign_out(&self, user: &AuthUser) -> Result<(), AuthError> {
        self.sessions.lock().await.remove(&user.access_token);
        Ok(())
    }
}
