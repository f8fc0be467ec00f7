//! Application state shared across handlers.

use std::sync::Arc;

use thiserror::Error;

use crate::config::ApiConfig;
use crate::github::{GithubClient, GithubError};
use crate::services::{AccountService, AuthService, OrderService};
use crate::store::{
    AccountStore, CatalogStore, InMemoryAccountStore, InMemoryCatalog, InMemoryOrderStore,
    OrderStore,
};

/// Error constructing the application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("github client error: {0}")]
    Github(#[from] GithubError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to the
/// configuration, the services, and the catalog store.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: ApiConfig,
    catalog: Arc<dyn CatalogStore>,
    orders: OrderService,
    accounts: AccountService,
    auth: AuthService,
    github: GithubClient,
}

impl AppState {
    /// Create application state backed by the in-memory reference stores.
    ///
    /// # Errors
    ///
    /// Returns an error if the GitHub client cannot be constructed.
    pub fn new(config: ApiConfig) -> Result<Self, StateError> {
        let catalog: Arc<dyn CatalogStore> = Arc::new(InMemoryCatalog::new());
        let orders: Arc<dyn OrderStore> = Arc::new(InMemoryOrderStore::new());
        let accounts: Arc<dyn AccountStore> = Arc::new(InMemoryAccountStore::new());
        Self::with_stores(config, catalog, orders, accounts)
    }

    /// Create application state over explicit store implementations.
    ///
    /// # Errors
    ///
    /// Returns an error if the GitHub client cannot be constructed.
    pub fn with_stores(
        config: ApiConfig,
        catalog: Arc<dyn CatalogStore>,
        orders: Arc<dyn OrderStore>,
        accounts: Arc<dyn AccountStore>,
    ) -> Result<Self, StateError> {
        let github = GithubClient::new(&config.github)?;
        let order_service = OrderService::new(Arc::clone(&catalog), orders);
        let account_service = AccountService::new(Arc::clone(&accounts));
        let auth_service = AuthService::new(accounts, config.admin_emails.clone());

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                orders: order_service,
                accounts: account_service,
                auth: auth_service,
                github,
            }),
        })
    }

    /// Get a reference to the API configuration.
    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog store.
    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogStore {
        self.inner.catalog.as_ref()
    }

    /// Get a reference to the order service.
    #[must_use]
    pub fn orders(&self) -> &OrderService {
        &self.inner.orders
    }

    /// Get a reference to the account service.
    #[must_use]
    pub fn accounts(&self) -> &AccountService {
        &self.inner.accounts
    }

    /// Get a reference to the auth service.
    #[must_use]
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    /// Get a reference to the GitHub client.
    #[must_use]
    pub fn github(&self) -> &GithubClient {
        &self.inner.github
    }
}
