//! User profile service.
//!
//! Profile read/update/delete with the authorization policy, the per-role
//! field-permission table, and the last-administrator guard.

use std::sync::Arc;

use thiserror::Error;

use chrono::Utc;
use clementine_core::{AccountId, UserRole};

use crate::models::{Principal, ProfilePatch, UserAccount};
use crate::policy::fields::{self, ProfileField};
use crate::policy::{self, Action, PolicyError};
use crate::store::{AccountStore, StoreError};

/// The literal target token that resolves to the caller's own account.
pub const ME: &str = "me";

/// Errors that can occur during profile operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// The caller is not allowed to perform this operation.
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// No account matches the target.
    #[error("account not found")]
    NotFound,

    /// A non-administrator tried to change a role.
    #[error("role changes require administrator access")]
    RoleChangeForbidden,

    /// Deleting this account would leave no administrators.
    #[error("cannot delete the last administrator account")]
    LastAdminProtected,

    /// The account store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Service for user profile operations.
pub struct AccountService {
    accounts: Arc<dyn AccountStore>,
}

impl AccountService {
    /// Create a new account service.
    #[must_use]
    pub fn new(accounts: Arc<dyn AccountStore>) -> Self {
        Self { accounts }
    }

    /// Resolve a target token (`"me"` or an explicit ID) to an account ID.
    ///
    /// # Errors
    ///
    /// Returns `PolicyError::Unauthenticated` for `"me"` without a principal
    /// and `AccountError::NotFound` for a malformed explicit ID - a garbage
    /// ID is indistinguishable from a missing account.
    fn resolve_target(
        principal: Option<&Principal>,
        target: &str,
    ) -> Result<AccountId, AccountError> {
        if target == ME {
            return principal
                .map(|p| p.id)
                .ok_or(AccountError::Policy(PolicyError::Unauthenticated));
        }
        AccountId::parse(target).map_err(|_| AccountError::NotFound)
    }

    /// Get a profile.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if the account doesn't exist and
    /// `AccountError::Policy` if the caller may not read it.
    pub async fn get_profile(
        &self,
        principal: Option<&Principal>,
        target: &str,
    ) -> Result<UserAccount, AccountError> {
        let id = Self::resolve_target(principal, target)?;
        let account = self
            .accounts
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)?;
        policy::authorize(principal, account.id, Action::Read)?;
        Ok(account)
    }

    /// Update a profile.
    ///
    /// Which patch fields apply depends on the caller's role (see
    /// `policy::fields`): non-administrators are limited to their contact
    /// fields and any other keys are silently dropped - except an explicit
    /// attempt to change `role`, which is rejected outright. Administrators
    /// apply the whole patch. The identity field (`email`) is not
    /// client-writable by anyone. `updated_at` is refreshed on every
    /// successful write.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotFound` if the account doesn't exist,
    /// `AccountError::Policy` if the caller may not write it, and
    /// `AccountError::RoleChangeForbidden` for a non-administrator role
    /// change.
    pub async fn update_profile(
        &self,
        principal: Option<&Principal>,
        target: &str,
        patch: ProfilePatch,
    ) -> Result<UserAccount, AccountError> {
        let id = Self::resolve_target(principal, target)?;
        let mut account = self
            .accounts
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)?;
        policy::authorize(principal, account.id, Action::Write)?;

        let Some(actor) = principal else {
            return Err(AccountError::Policy(PolicyError::Unauthenticated));
        };

        // An explicit role change from a non-administrator is an error, not
        // a silent drop.
        if !fields::may_write(actor.role, ProfileField::Role)
            && let Some(requested) = patch.role
            && requested != account.role
        {
            return Err(AccountError::RoleChangeForbidden);
        }

        let allowed = fields::writable_fields(actor.role);
        if allowed.contains(&ProfileField::DisplayName)
            && let Some(display_name) = patch.display_name
        {
            account.display_name = display_name;
        }
        if allowed.contains(&ProfileField::ProfilePicture)
            && let Some(profile_picture) = patch.profile_picture
        {
            account.profile_picture = Some(profile_picture);
        }
        if allowed.contains(&ProfileField::PhoneNumber)
            && let Some(phone_number) = patch.phone_number
        {
            account.phone_number = Some(phone_number);
        }
        if allowed.contains(&ProfileField::Address)
            && let Some(address) = patch.address
        {
            account.address = Some(address);
        }
        if allowed.contains(&ProfileField::Role)
            && let Some(role) = patch.role
        {
            account.role = role;
        }

        account.updated_at = Utc::now();
        self.accounts.update(account.clone()).await?;
        tracing::info!(account_id = %account.id, "profile updated");

        Ok(account)
    }

    /// Delete an account. Administrator-only.
    ///
    /// If an administrator deletes their own account while being the last
    /// administrator, the deletion is refused so the system is never left
    /// without one.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::Policy` for non-administrators,
    /// `AccountError::NotFound` if the account doesn't exist, and
    /// `AccountError::LastAdminProtected` when the guard trips.
    pub async fn delete_account(
        &self,
        principal: Option<&Principal>,
        target: &str,
    ) -> Result<(), AccountError> {
        policy::require_admin(principal)?;
        let id = Self::resolve_target(principal, target)?;

        let account = self
            .accounts
            .find_by_id(id)
            .await?
            .ok_or(AccountError::NotFound)?;

        let deleting_self = principal.is_some_and(|p| p.id == account.id);
        if deleting_self
            && account.role == UserRole::Admin
            && self.accounts.count_by_role(UserRole::Admin).await? <= 1
        {
            return Err(AccountError::LastAdminProtected);
        }

        if !self.accounts.delete(id).await? {
            return Err(AccountError::NotFound);
        }
        tracing::info!(account_id = %account.id, "account deleted");

        Ok(())
    }
}
