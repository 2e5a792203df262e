//! In-memory accounts and sessions.
//!
//! Backs `/api/signup` and `/api/login` so the service runs stand-alone.
//! Passwords are stored as salted SHA-256 digests; tokens are random UUIDs.
//! A deployment fronted by a real identity provider would replace this
//! adapter behind the same ports.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use rand::RngCore;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::domain::UserId;
use crate::domain::ports::{
    AccountDirectory, AccountError, AuthenticatedUser, SessionError, SessionService, SessionToken,
};

#[derive(Debug, Clone)]
struct AccountRecord {
    id: UserId,
    name: String,
    email: String,
    salt: [u8; 16],
    password_digest: String,
}

#[derive(Debug, Default)]
struct MemoryState {
    // Keyed by lowercased email.
    accounts: HashMap<String, AccountRecord>,
    tokens: HashMap<String, UserId>,
}

/// In-memory [`AccountDirectory`] and [`SessionService`] adapter.
#[derive(Debug, Default)]
pub struct MemoryAccounts {
    state: RwLock<MemoryState>,
}

impl MemoryAccounts {
    /// Create an empty adapter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn digest(salt: &[u8; 16], password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }

    fn fresh_salt() -> [u8; 16] {
        let mut salt = [0_u8; 16];
        rand::thread_rng().fill_bytes(&mut salt);
        salt
    }
}

fn account_poisoned<E>(_: E) -> AccountError {
    AccountError::Unavailable {
        message: "account state lock poisoned".to_owned(),
    }
}

fn session_poisoned<E>(_: E) -> SessionError {
    SessionError::Unavailable {
        message: "session state lock poisoned".to_owned(),
    }
}

impl From<&AccountRecord> for AuthenticatedUser {
    fn from(record: &AccountRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            email: record.email.clone(),
        }
    }
}

#[async_trait]
impl AccountDirectory for MemoryAccounts {
    async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AccountError> {
        let key = email.trim().to_lowercase();
        let mut state = self.state.write().map_err(account_poisoned)?;
        if state.accounts.contains_key(&key) {
            return Err(AccountError::EmailTaken {
                email: email.trim().to_owned(),
            });
        }
        let salt = Self::fresh_salt();
        let record = AccountRecord {
            id: UserId::random(),
            name: name.trim().to_owned(),
            email: email.trim().to_owned(),
            salt,
            password_digest: Self::digest(&salt, password),
        };
        let user = AuthenticatedUser::from(&record);
        state.accounts.insert(key, record);
        Ok(user)
    }

    async fn verify(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<AuthenticatedUser>, AccountError> {
        let key = email.trim().to_lowercase();
        let state = self.state.read().map_err(account_poisoned)?;
        let Some(record) = state.accounts.get(&key) else {
            return Ok(None);
        };
        if Self::digest(&record.salt, password) != record.password_digest {
            return Ok(None);
        }
        Ok(Some(AuthenticatedUser::from(record)))
    }
}

#[async_trait]
impl SessionService for MemoryAccounts {
    async fn issue(&self, user: UserId) -> Result<SessionToken, SessionError> {
        let token = Uuid::new_v4().simple().to_string();
        let mut state = self.state.write().map_err(session_poisoned)?;
        state.tokens.insert(token.clone(), user);
        Ok(SessionToken::new(token))
    }

    async fn resolve(&self, token: &str) -> Result<Option<UserId>, SessionError> {
        let state = self.state.read().map_err(session_poisoned)?;
        Ok(state.tokens.get(token).copied())
    }

    async fn revoke(&self, token: &str) -> Result<(), SessionError> {
        let mut state = self.state.write().map_err(session_poisoned)?;
        state.tokens.remove(token);
        Ok(())
    }
}
