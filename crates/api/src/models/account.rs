//! User account domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clementine_core::{AccountId, Email, UserRole};

use super::session::Principal;

/// A user account.
///
/// Created on first successful GitHub login for an email address; the email
/// is the identity field and is never client-writable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Unique account ID.
    pub id: AccountId,
    /// Email address bound at account creation (unique).
    pub email: Email,
    /// Name shown on the account.
    pub display_name: String,
    /// Avatar URL, if any.
    pub profile_picture: Option<String>,
    /// Contact phone number, if any.
    pub phone_number: Option<String>,
    /// Postal address, if any.
    pub address: Option<String>,
    /// Role of the account.
    pub role: UserRole,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// When the account was last updated.
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// The principal this account acts as.
    #[must_use]
    pub const fn principal(&self) -> Principal {
        Principal::new(self.id, self.role)
    }
}

/// A partial update to a user account.
///
/// Absent fields are left untouched. The identity field (`email`) is not
/// representable here at all; which of the remaining fields actually apply
/// depends on the caller's role (see `policy::fields`).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfilePatch {
    /// New display name.
    pub display_name: Option<String>,
    /// New avatar URL.
    pub profile_picture: Option<String>,
    /// New phone number.
    pub phone_number: Option<String>,
    /// New postal address.
    pub address: Option<String>,
    /// New role. Only administrators may change roles.
    pub role: Option<UserRole>,
}
