//! User account store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use clementine_core::{AccountId, Email, UserRole};

use super::StoreError;
use crate::models::UserAccount;

/// Store for user accounts.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Get an account by its email address.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the store fails.
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserAccount>, StoreError>;

    /// Get an account by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the store fails.
    async fn find_by_id(&self, id: AccountId) -> Result<Option<UserAccount>, StoreError>;

    /// Insert a new account.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the email or ID already exists.
    async fn insert(&self, account: UserAccount) -> Result<(), StoreError>;

    /// Replace an existing account.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the account doesn't exist.
    async fn update(&self, account: UserAccount) -> Result<(), StoreError>;

    /// Delete an account.
    ///
    /// # Returns
    ///
    /// Returns `true` if the account was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the store fails.
    async fn delete(&self, id: AccountId) -> Result<bool, StoreError>;

    /// Count accounts holding `role`.
    ///
    /// Used by the last-administrator guard on account deletion.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the store fails.
    async fn count_by_role(&self, role: UserRole) -> Result<usize, StoreError>;
}

/// In-memory reference implementation of [`AccountStore`].
#[derive(Debug, Default)]
pub struct InMemoryAccountStore {
    accounts: RwLock<HashMap<AccountId, UserAccount>>,
}

impl InMemoryAccountStore {
    /// Create an empty account store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_email(&self, email: &Email) -> Result<Option<UserAccount>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|account| account.email == *email)
            .cloned())
    }

    async fn find_by_id(&self, id: AccountId) -> Result<Option<UserAccount>, StoreError> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn insert(&self, account: UserAccount) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        if accounts.contains_key(&account.id) {
            return Err(StoreError::Conflict(format!(
                "account {} already exists",
                account.id
            )));
        }
        if accounts.values().any(|a| a.email == account.email) {
            return Err(StoreError::Conflict("email already exists".to_owned()));
        }
        accounts.insert(account.id, account);
        Ok(())
    }

    async fn update(&self, account: UserAccount) -> Result<(), StoreError> {
        let mut accounts = self.accounts.write().await;
        let Some(slot) = accounts.get_mut(&account.id) else {
            return Err(StoreError::NotFound);
        };
        *slot = account;
        Ok(())
    }

    async fn delete(&self, id: AccountId) -> Result<bool, StoreError> {
        Ok(self.accounts.write().await.remove(&id).is_some())
    }

    async fn count_by_role(&self, role: UserRole) -> Result<usize, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts.values().filter(|a| a.role == role).count())
    }
}
