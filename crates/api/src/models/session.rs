//! Session-scoped identity types.

use serde::{Deserialize, Serialize};

use clementine_core::{AccountId, UserRole};

/// Keys used to store values in the session.
pub mod session_keys {
    /// The authenticated principal for the current session.
    pub const CURRENT_PRINCIPAL: &str = "current_principal";
    /// CSRF state token for an in-flight OAuth login.
    pub const OAUTH_STATE: &str = "oauth_state";
}

/// The authenticated actor behind a request.
///
/// Produced by the session extractors and threaded explicitly into every
/// service call; core logic never reads identity from ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Account ID of the actor.
    pub id: AccountId,
    /// Role of the actor.
    pub role: UserRole,
}

impl Principal {
    /// Create a principal for an account.
    #[must_use]
    pub const fn new(id: AccountId, role: UserRole) -> Self {
        Self { id, role }
    }
}
