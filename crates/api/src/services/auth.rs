//! Login service.
//!
//! The OAuth handshake itself lives in [`crate::github`]; this service owns
//! what happens once GitHub has vouched for an identity: the idempotent
//! create-or-return-existing account contract.

use std::sync::Arc;

use thiserror::Error;

use chrono::Utc;
use clementine_core::{AccountId, Email, EmailError, UserRole};

use crate::github::{GithubError, GithubUser};
use crate::models::UserAccount;
use crate::store::{AccountStore, StoreError};

/// Errors that can occur during login.
#[derive(Debug, Error)]
pub enum AuthError {
    /// GitHub returned no usable email address for the account.
    #[error("github account has no usable email address")]
    MissingEmail,

    /// The email from the identity provider failed validation.
    #[error("invalid email from identity provider: {0}")]
    InvalidEmail(#[from] EmailError),

    /// The GitHub collaborator failed.
    #[error(transparent)]
    Github(#[from] GithubError),

    /// The account store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Service for external-login account handling.
pub struct AuthService {
    accounts: Arc<dyn AccountStore>,
    admin_emails: Vec<Email>,
}

impl AuthService {
    /// Create a new auth service.
    ///
    /// `admin_emails` is the bootstrap list: a first login with one of these
    /// addresses creates the account as an administrator.
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountStore>, admin_emails: Vec<Email>) -> Self {
        Self {
            accounts,
            admin_emails,
        }
    }

    /// Log a verified GitHub identity in, creating an account on first
    /// contact.
    ///
    /// Idempotent by contract: a repeat login for a known email returns the
    /// existing account and performs no write at all. Roles are assigned at
    /// creation time only; logins never mutate an existing account.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingEmail` / `AuthError::InvalidEmail` when
    /// GitHub supplies no usable address.
    pub async fn login_or_register(&self, user: &GithubUser) -> Result<UserAccount, AuthError> {
        let email = user.email.as_deref().ok_or(AuthError::MissingEmail)?;
        let email = Email::parse(email)?;

        if let Some(existing) = self.accounts.find_by_email(&email).await? {
            tracing::debug!(account_id = %existing.id, "returning existing account for login");
            return Ok(existing);
        }

        let role = if self.admin_emails.contains(&email) {
            UserRole::Admin
        } else {
            UserRole::Customer
        };

        let now = Utc::now();
        let account = UserAccount {
            id: AccountId::new(),
            email: email.clone(),
            display_name: user.name.clone().unwrap_or_else(|| user.login.clone()),
            profile_picture: user.avatar_url.clone(),
            phone_number: None,
            address: None,
            role,
            created_at: now,
            updated_at: now,
        };

        match self.accounts.insert(account.clone()).await {
            Ok(()) => {
                tracing::info!(account_id = %account.id, role = %account.role, "account created");
                Ok(account)
            }
            // Lost a race with a concurrent first login for the same email;
            // the create-or-return-existing contract still holds.
            Err(StoreError::Conflict(_)) => {
                let existing = self
                    .accounts
                    .find_by_email(&email)
                    .await?
                    .ok_or(StoreError::NotFound)?;
                Ok(existing)
            }
            Err(other) => Err(other.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use crate::store::InMemoryAccountStore;

    fn github_user(email: Option<&str>) -> GithubUser {
        GithubUser {
            login: "octocat".to_owned(),
            name: Some("Octo Cat".to_owned()),
            email: email.map(str::to_owned),
            avatar_url: Some("https://avatars.example/octocat".to_owned()),
        }
    }

    fn service(admin_emails: Vec<Email>) -> (AuthService, Arc<InMemoryAccountStore>) {
        let store = Arc::new(InMemoryAccountStore::new());
        (
            AuthService::new(Arc::clone(&store) as Arc<dyn AccountStore>, admin_emails),
            store,
        )
    }

    #[tokio::test]
    async fn test_first_login_creates_customer_account() {
        let (service, store) = service(vec![]);

        let account = service
            .login_or_register(&github_user(Some("octo@example.com")))
            .await
            .unwrap();

        assert_eq!(account.email.as_str(), "octo@example.com");
        assert_eq!(account.display_name, "Octo Cat");
        assert_eq!(account.role, UserRole::Customer);
        assert!(store.find_by_id(account.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_bootstrap_admin_email_creates_admin() {
        let (service, _) = service(vec![Email::parse("root@example.com").unwrap()]);

        let account = service
            .login_or_register(&github_user(Some("root@example.com")))
            .await
            .unwrap();

        assert_eq!(account.role, UserRole::Admin);
    }

    #[tokio::test]
    async fn test_repeat_login_is_idempotent() {
        let (service, store) = service(vec![]);
        let user = github_user(Some("octo@example.com"));

        let first = service.login_or_register(&user).await.unwrap();
        let second = service.login_or_register(&user).await.unwrap();

        assert_eq!(second, first);
        assert_eq!(store.count_by_role(UserRole::Customer).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_login_without_email_fails() {
        let (service, _) = service(vec![]);

        let err = service
            .login_or_register(&github_user(None))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::MissingEmail));
    }

    #[tokio::test]
    async fn test_display_name_falls_back_to_login() {
        let (service, _) = service(vec![]);
        let mut user = github_user(Some("octo@example.com"));
        user.name = None;

        let account = service.login_or_register(&user).await.unwrap();
        assert_eq!(account.display_name, "octocat");
    }
}
