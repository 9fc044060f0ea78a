//! Account storage.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::accounts::password::{Credential, DEFAULT_HASH_ROUNDS};
use crate::content::StoreError;

/// A registered account. The credential never leaves this module's types.
#[derive(Debug, Clone)]
pub struct Account {
    pub id: String,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    password: Credential,
}

impl Account {
    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Public view of an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountProfile {
    pub id: String,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    /// Fails with `Conflict` when the email is already registered.
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// The account when `email` exists and `password` matches.
    async fn verify_credential(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, StoreError>;
}

/// Accounts keyed by id, with a lower-cased email index.
#[derive(Debug)]
pub struct InMemoryAccountStore {
    inner: RwLock<Accounts>,
    hash_rounds: u32,
}

#[derive(Debug, Default)]
struct Accounts {
    by_id: HashMap<String, Account>,
    by_email: HashMap<String, String>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::with_hash_rounds(DEFAULT_HASH_ROUNDS)
    }

    /// Creates a store that hashes new passwords with `rounds` PBKDF2 rounds.
    pub fn with_hash_rounds(hash_rounds: u32) -> Self {
        Self {
            inner: RwLock::new(Accounts::default()),
            hash_rounds,
        }
    }
}

impl Default for InMemoryAccountStore {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.inner.read().await.by_id.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_email
            .get(&normalize_email(email))
            .and_then(|id| inner.by_id.get(id))
            .cloned())
    }

    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let email_key = normalize_email(&account.email);
        if self.inner.read().await.by_email.contains_key(&email_key) {
            return Err(StoreError::Conflict("User already exists".to_string()));
        }

        // Key derivation is CPU-bound, keep it off the async workers
        let rounds = self.hash_rounds;
        let password = account.password.clone();
        let credential = tokio::task::spawn_blocking(move || Credential::hash(&password, rounds))
            .await
            .map_err(|e| StoreError::Backend(format!("password hashing aborted: {}", e)))?
            .map_err(|e| StoreError::Backend(format!("password hashing failed: {}", e)))?;

        let mut inner = self.inner.write().await;
        if inner.by_email.contains_key(&email_key) {
            return Err(StoreError::Conflict("User already exists".to_string()));
        }

        let created = Account {
            id: Uuid::new_v4().to_string(),
            name: account.name.trim().to_string(),
            email: account.email.trim().to_string(),
            created_at: Utc::now(),
            password: credential,
        };
        inner.by_email.insert(email_key, created.id.clone());
        inner.by_id.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn verify_credential(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Account>, StoreError> {
        let Some(account) = self.find_by_email(email).await? else {
            return Ok(None);
        };

        let password = password.to_string();
        tokio::task::spawn_blocking(move || {
            let matches = account.password.verify(&password);
            matches.then_some(account)
        })
        .await
        .map_err(|e| StoreError::Backend(format!("password check aborted: {}", e)))
    }
}
