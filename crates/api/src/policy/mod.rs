//! Authorization policy.
//!
//! A pure decision function shared by the account and order services. The
//! rule set, evaluated in order:
//!
//! 1. no principal - deny `Unauthenticated`;
//! 2. administrators may do anything (the profile field filter and the
//!    last-administrator guard are enforced by the account service, not
//!    here);
//! 3. otherwise allow only when the principal owns the resource.
//!
//! The policy never touches storage and has no side effects, so every cell
//! of the access matrix is testable in isolation.

pub mod fields;

use thiserror::Error;

use clementine_core::{AccountId, UserRole};

use crate::models::Principal;

/// What the caller is trying to do to the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Read the resource.
    Read,
    /// Create or modify the resource.
    Write,
    /// Destroy the resource.
    Delete,
}

/// Why access was denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// No authenticated session.
    #[error("authentication required")]
    Unauthenticated,

    /// The principal is not allowed to perform this action.
    #[error("access denied")]
    Forbidden,
}

/// Decide whether `principal` may perform `action` on a resource owned by
/// `owner`.
///
/// # Errors
///
/// Returns `PolicyError::Unauthenticated` when there is no principal and
/// `PolicyError::Forbidden` when a non-administrator targets a resource
/// they do not own.
pub fn authorize(
    principal: Option<&Principal>,
    owner: AccountId,
    action: Action,
) -> Result<(), PolicyError> {
    let principal = principal.ok_or(PolicyError::Unauthenticated)?;

    if principal.role == UserRole::Admin || principal.id == owner {
        return Ok(());
    }

    tracing::debug!(actor = %principal.id, %owner, ?action, "access denied");
    Err(PolicyError::Forbidden)
}

/// Require an administrator principal.
///
/// Used for actions that have no single owning account: catalog mutations
/// and account deletion.
///
/// # Errors
///
/// Returns `PolicyError::Unauthenticated` when there is no principal and
/// `PolicyError::Forbidden` for non-administrators.
pub fn require_admin(principal: Option<&Principal>) -> Result<(), PolicyError> {
    let principal = principal.ok_or(PolicyError::Unauthenticated)?;

    if principal.role == UserRole::Admin {
        return Ok(());
    }

    tracing::debug!(actor = %principal.id, "administrator access required");
    Err(PolicyError::Forbidden)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn admin() -> Principal {
        Principal::new(AccountId::new(), UserRole::Admin)
    }

    fn customer() -> Principal {
        Principal::new(AccountId::new(), UserRole::Customer)
    }

    #[test]
    fn test_no_principal_is_unauthenticated() {
        for action in [Action::Read, Action::Write, Action::Delete] {
            assert_eq!(
                authorize(None, AccountId::new(), action),
                Err(PolicyError::Unauthenticated)
            );
        }
    }

    #[test]
    fn test_admin_allowed_on_any_resource() {
        let admin = admin();
        for action in [Action::Read, Action::Write, Action::Delete] {
            assert_eq!(authorize(Some(&admin), AccountId::new(), action), Ok(()));
        }
    }

    #[test]
    fn test_owner_allowed_on_own_resource() {
        let customer = customer();
        for action in [Action::Read, Action::Write, Action::Delete] {
            assert_eq!(authorize(Some(&customer), customer.id, action), Ok(()));
        }
    }

    #[test]
    fn test_non_owner_customer_forbidden() {
        let customer = customer();
        for action in [Action::Read, Action::Write, Action::Delete] {
            assert_eq!(
                authorize(Some(&customer), AccountId::new(), action),
                Err(PolicyError::Forbidden)
            );
        }
    }

    #[test]
    fn test_require_admin() {
        assert_eq!(require_admin(None), Err(PolicyError::Unauthenticated));
        assert_eq!(
            require_admin(Some(&customer())),
            Err(PolicyError::Forbidden)
        );
        assert_eq!(require_admin(Some(&admin())), Ok(()));
    }
}
