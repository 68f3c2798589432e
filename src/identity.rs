//! Credential check and code delivery. Both sit behind traits so the
//! in-memory directory and log-only delivery can be swapped for a real
//! identity provider and mail service.

use crate::db::seed;
use crate::domain::models::UserRole;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use async_trait::async_trait;
use rand_core::OsRng;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub photo: Option<String>,
}

/// Display fields copied from the employee record after an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("account {0} already exists")]
    Exists(String),
    #[error("password hashing failed")]
    Hash,
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn authenticate(&self, user_id: &str, password: &str) -> Option<Principal>;
    async fn register(&self, principal: Principal, password: &str) -> Result<(), IdentityError>;
    async fn remove(&self, user_id: &str) -> bool;
    /// `false` when no account exists for `user_id`.
    async fn update_profile(&self, user_id: &str, profile: &ProfileUpdate) -> bool;
    /// Applies only when `user_id` and `email` belong to the same account.
    async fn reset_password(&self, user_id: &str, email: &str, password: &str) -> Result<bool, IdentityError>;
}

struct Account {
    principal: Principal,
    hash: String,
}

/// In-memory accounts keyed by lowercased login id. Passwords are stored
/// as argon2 hashes.
#[derive(Clone, Default)]
pub struct CredentialDirectory {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

fn hash_password(password: &str) -> Result<String, IdentityError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|_| IdentityError::Hash)
}

fn key(user_id: &str) -> String {
    user_id.trim().to_lowercase()
}

impl CredentialDirectory {
    pub async fn seeded() -> Result<Self, IdentityError> {
        let directory = Self::default();
        for account in seed::accounts() {
            directory
                .register(
                    Principal {
                        user_id: account.id.to_string(),
                        name: account.name.to_string(),
                        email: account.email.to_string(),
                        role: account.role,
                        photo: Some(account.photo.to_string()),
                    },
                    account.password,
                )
                .await?;
        }
        Ok(directory)
    }
}

#[async_trait]
impl IdentityProvider for CredentialDirectory {
    async fn authenticate(&self, user_id: &str, password: &str) -> Option<Principal> {
        let accounts = self.accounts.read().await;
        let account = accounts.get(&key(user_id))?;
        let parsed = PasswordHash::new(&account.hash).ok()?;
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .ok()?;
        Some(account.principal.clone())
    }

    async fn register(&self, principal: Principal, password: &str) -> Result<(), IdentityError> {
        let hash = hash_password(password)?;
        let mut accounts = self.accounts.write().await;
        let k = key(&principal.user_id);
        if accounts.contains_key(&k) {
            return Err(IdentityError::Exists(principal.user_id));
        }
        accounts.insert(k, Account { principal, hash });
        Ok(())
    }

    async fn remove(&self, user_id: &str) -> bool {
        self.accounts.write().await.remove(&key(user_id)).is_some()
    }

    async fn update_profile(&self, user_id: &str, profile: &ProfileUpdate) -> bool {
        let mut accounts = self.accounts.write().await;
        let Some(account) = accounts.get_mut(&key(user_id)) else {
            return false;
        };
        account.principal.name = profile.name.clone();
        account.principal.email = profile.email.clone();
        account.principal.photo = profile.photo.clone();
        true
    }

    async fn reset_password(&self, user_id: &str, email: &str, password: &str) -> Result<bool, IdentityError> {
        let hash = hash_password(password)?;
        let mut accounts = self.accounts.write().await;
        match accounts.get_mut(&key(user_id)) {
            Some(account) if account.principal.email.eq_ignore_ascii_case(email.trim()) => {
                account.hash = hash;
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

/// Where verification codes go.
#[async_trait]
pub trait CodeDelivery: Send + Sync {
    async fn send_code(&self, email: &str, code: &str) -> anyhow::Result<()>;
}

/// Logs the code instead of mailing it.
pub struct LogDelivery;

#[async_trait]
impl CodeDelivery for LogDelivery {
    async fn send_code(&self, email: &str, code: &str) -> anyhow::Result<()> {
        tracing::info!("Verification code for {}: {}", email, code);
        Ok(())
    }
}
