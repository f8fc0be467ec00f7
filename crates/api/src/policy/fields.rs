//! Per-role profile field permissions.
//!
//! A declarative table of which account fields each role may write through
//! the profile-update operation. Fields absent from a role's list are
//! silently dropped from that role's patches; `Email` appears in no list
//! because it is the identity field bound at account creation.

use clementine_core::UserRole;

/// A writable-in-principle field of a user account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    /// `display_name`
    DisplayName,
    /// `profile_picture`
    ProfilePicture,
    /// `phone_number`
    PhoneNumber,
    /// `address`
    Address,
    /// `role`
    Role,
    /// `email` - the identity field; writable by nobody.
    Email,
}

/// Fields a customer may change on their own profile.
const CUSTOMER_WRITABLE: &[ProfileField] = &[
    ProfileField::DisplayName,
    ProfileField::ProfilePicture,
    ProfileField::PhoneNumber,
    ProfileField::Address,
];

/// Fields an administrator may change on any profile.
const ADMIN_WRITABLE: &[ProfileField] = &[
    ProfileField::DisplayName,
    ProfileField::ProfilePicture,
    ProfileField::PhoneNumber,
    ProfileField::Address,
    ProfileField::Role,
];

/// The fields `role` may write.
#[must_use]
pub const fn writable_fields(role: UserRole) -> &'static [ProfileField] {
    match role {
        UserRole::Admin => ADMIN_WRITABLE,
        UserRole::Customer => CUSTOMER_WRITABLE,
    }
}

/// Whether `role` may write `field`.
#[must_use]
pub fn may_write(role: UserRole, field: ProfileField) -> bool {
    writable_fields(role).contains(&field)
}
