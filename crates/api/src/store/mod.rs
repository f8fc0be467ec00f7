//! Persistence seams for the API.
//!
//! Storage is an external collaborator: the services only ever talk to the
//! traits in this module. Each entity gets its own store trait with the
//! usual find/insert/update/delete surface, plus whatever queries the
//! services need (`count_by_role`, owner filtering).
//!
//! The `InMemory*` types are the reference adapters: process-local maps
//! behind `tokio::sync::RwLock`. They back the binary and the tests; a
//! database-backed deployment would swap in adapters implementing the same
//! traits.

pub mod accounts;
pub mod catalog;
pub mod orders;

use thiserror::Error;

pub use accounts::{AccountStore, InMemoryAccountStore};
pub use catalog::{CatalogStore, InMemoryCatalog};
pub use orders::{InMemoryOrderStore, OrderStore};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique email).
    #[error("constraint violation: {0}")]
    Conflict(String),

    /// The backing store failed.
    #[error("store backend error: {0}")]
    Backend(String),
}
