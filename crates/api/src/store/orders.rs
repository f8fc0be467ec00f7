//! Order store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use clementine_core::{AccountId, OrderId};

use super::StoreError;
use crate::models::Order;

/// Store for orders.
///
/// An order together with its line items is a single document: `insert`
/// persists it atomically and `delete` removes it as one unit, so no partial
/// order is ever visible.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Insert a new order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Conflict` if the ID already exists.
    async fn insert(&self, order: Order) -> Result<(), StoreError>;

    /// Get an order by ID.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the store fails.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError>;

    /// List orders, newest first, optionally restricted to one owner.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the store fails.
    async fn find_by_owner(&self, owner: Option<AccountId>) -> Result<Vec<Order>, StoreError>;

    /// Replace an existing order.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NotFound` if the order doesn't exist.
    async fn update(&self, order: Order) -> Result<(), StoreError>;

    /// Delete an order.
    ///
    /// # Returns
    ///
    /// Returns `true` if the order was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Backend` if the store fails.
    async fn delete(&self, id: OrderId) -> Result<bool, StoreError>;
}

/// In-memory reference implementation of [`OrderStore`].
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    orders: RwLock<HashMap<OrderId, Order>>,
}

impl InMemoryOrderStore {
    /// Create an empty order store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: Order) -> Result<(), StoreError> {
        let mut orders = self.orders.write().await;
        if orders.contains_key(&order.id) {
            return Err(StoreError::Conflict(format!(
                "order {} already exists",
                order.id
            )));
        }
        orders.insert(order.id, order);
        Ok(())
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, StoreError> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn find_by_owner(&self, owner: Option<AccountId>) -> Result<Vec<Order>, StoreError> {
        let orders = self.orders.read().await;
        let mut matching: Vec<Order> = orders
            .values()
            .filter(|order| owner.is_none_or(|owner| order.owner_id == owner))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.id.cmp(&b.id)));
        Ok(matching)
    }

    async fn update(&self, order: Order) -> Result<(), StoreError> {
        let mut orders = self.orders.write().await;
        let Some(slot) = orders.get_mut(&order.id) else {
            return Err(StoreError::NotFound);
        };
        *slot = order;
        Ok(())
    }

    async fn delete(&self, id: OrderId) -> Result<bool, StoreError> {
        Ok(self.orders.write().await.remove(&id).is_some())
    }
}
