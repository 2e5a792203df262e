//! Port for account registration and credential checks.

use async_trait::async_trait;

use crate::domain::UserId;

/// Profile of a registered account, returned after signup or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Stable identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, unique per account.
    pub email: String,
}

/// Errors raised by account adapters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AccountError {
    /// An account already exists for the email address.
    #[error("an account already exists for {email}")]
    EmailTaken {
        /// The conflicting address.
        email: String,
    },
    /// The account backend could not serve the request.
    #[error("account store unavailable: {message}")]
    Unavailable {
        /// Adapter-provided diagnostic.
        message: String,
    },
}

/// Stores accounts and verifies credentials.
///
/// `verify` returning `Ok(None)` means unknown email or wrong password;
/// adapters must not distinguish the two.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountDirectory: Send + Sync {
    /// Register a new account.
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AccountError>;

    /// Check credentials and return the matching account.
    async fn verify(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthenticatedUser>, AccountError>;
}
