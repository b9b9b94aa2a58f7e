//! Store error types.

use thiserror::Error;

/// Errors that can occur when talking to the catalog store.
#[derive(Error, Debug, Clone)]
pub enum StoreError {
    /// A single-row fetch matched nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to send the request or read the response.
    #[error("Request failed: {0}")]
    Request(String),

    /// The store answered with an error status.
    #[error("HTTP {status}: {message}")]
    Http {
        status: u16,
        /// Store error code, when the body carried one.
        code: Option<String>,
        message: String,
    },

    /// The store refused the operation.
    #[error("Rejected: {0}")]
    Rejected(String),

    /// A row could not be decoded or encoded.
    #[error("Deserialization error: {0}")]
    Decode(String),

    /// The store is not configured well enough to send requests.
    #[error("Invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    /// Check if this is the distinguished not-found outcome.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    /// The store error code, if any.
    pub fn code(&self) -> Option<&str> {
        match self {
            StoreError::Http { code, .. } => code.as_deref(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            StoreError::Decode(e.to_string())
        } else {
            StoreError::Request(e.to_string())
        }
    }
}

/// Authentication error type.
#[derive(Error, Debug, Clone)]
pub enum AuthError {
    /// Invalid credentials provided.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Token invalid or expired.
    #[error("session expired or token invalid")]
    SessionExpired,

    /// No session is active.
    #[error("not signed in")]
    NotSignedIn,

    /// Failed to reach the auth service.
    #[error("auth request failed: {0}")]
    Request(String),

    /// Unexpected response body.
    #[error("unexpected auth response: {0}")]
    Parse(String),
}

impl AuthError {
    /// Check if this is an authentication failure.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidCredentials | AuthError::SessionExpired | AuthError::NotSignedIn
        )
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            AuthError::Parse(e.to_string())
        } else {
            AuthError::Request(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinguished() {
        assert!(StoreError::NotFound("products/9".into()).is_not_found());
        let http = StoreError::Http {
            status: 500,
            code: Some("XX000".into()),
            message: "boom".into(),
        };
        assert!(!http.is_not_found());
        assert_eq!(http.code(), Some("XX000"));
    }
}
