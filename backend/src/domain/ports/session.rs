//! Port for bearer-token session resolution.

use async_trait::async_trait;

use crate::domain::UserId;

/// Opaque bearer token issued at login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token handed to clients.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<SessionToken> for String {
    fn from(value: SessionToken) -> Self {
        value.0
    }
}

/// Errors raised by session adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// The session backend could not serve the request.
    #[error("session store unavailable: {message}")]
    Unavailable {
        /// Adapter-provided diagnostic.
        message: String,
    },
}

/// Resolves caller identity from bearer tokens and issues new sessions.
///
/// Resolution returning `Ok(None)` means the token is unknown or expired;
/// callers map that to `AuthRequired`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionService: Send + Sync {
    /// Issue a fresh token bound to `user`.
    async fn issue(&self, user: UserId) -> Result<SessionToken, SessionError>;

    /// Resolve a bearer token to the user it was issued for.
    async fn resolve(&self, token: &str) -> Result<Option<UserId>, SessionError>;

    /// Invalidate a token, if it exists.
    async fn revoke(&self, token: &str) -> Result<(), SessionError>;
}
