//! Order service.
//!
//! Orchestrates pricing, the status lifecycle, the authorization policy,
//! and the order store to implement create / read / update-status / delete.

use std::sync::Arc;

use thiserror::Error;

use chrono::Utc;
use clementine_core::{AccountId, OrderId, OrderStatus, UserRole};

use crate::models::{CreateOrderRequest, Order, Principal};
use crate::policy::{self, Action, PolicyError};
use crate::pricing::{self, PricingError};
use crate::store::{CatalogStore, OrderStore, StoreError};

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The caller is not allowed to perform this operation.
    #[error(transparent)]
    Policy(#[from] PolicyError),

    /// Pricing the requested items failed; nothing was persisted.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// No order with the given ID exists.
    #[error("order not found")]
    NotFound,

    /// The requested status is not reachable from the order's current status.
    #[error("cannot move order from {from} to {to}")]
    InvalidStatus {
        /// Current status.
        from: OrderStatus,
        /// Requested status.
        to: OrderStatus,
    },

    /// The order store failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Service for order operations.
pub struct OrderService {
    catalog: Arc<dyn CatalogStore>,
    orders: Arc<dyn OrderStore>,
}

impl OrderService {
    /// Create a new order service.
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogStore>, orders: Arc<dyn OrderStore>) -> Self {
        Self { catalog, orders }
    }

    /// Create an order.
    ///
    /// The owner defaults to the caller; creating an order for another
    /// account requires administrator access. The requested items are priced
    /// first - any pricing failure aborts before anything is written - and
    /// the resulting order (status `Pending`, line items and total included)
    /// is persisted as a single document.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Policy` if the caller may not create this order
    /// and `OrderError::Pricing` for unknown products or invalid quantities.
    pub async fn create_order(
        &self,
        principal: Option<&Principal>,
        request: CreateOrderRequest,
    ) -> Result<Order, OrderError> {
        let owner_id = match (principal, request.owner_id) {
            (_, Some(owner)) => owner,
            (Some(p), None) => p.id,
            (None, None) => return Err(PolicyError::Unauthenticated.into()),
        };
        policy::authorize(principal, owner_id, Action::Write)?;

        let priced = pricing::price_order(self.catalog.as_ref(), &request.items).await?;

        let now = Utc::now();
        let order = Order {
            id: OrderId::new(),
            owner_id,
            items: priced.line_items,
            total_amount: priced.total_amount,
            status: OrderStatus::Pending,
            shipping_address: request.shipping_address,
            created_at: now,
            updated_at: now,
        };

        self.orders.insert(order.clone()).await?;
        tracing::info!(order_id = %order.id, owner_id = %order.owner_id, "order created");

        Ok(order)
    }

    /// Get a single order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist and
    /// `OrderError::Policy` if the caller may not read it.
    pub async fn get_order(
        &self,
        principal: Option<&Principal>,
        id: OrderId,
    ) -> Result<Order, OrderError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(OrderError::NotFound)?;
        policy::authorize(principal, order.owner_id, Action::Read)?;
        Ok(order)
    }

    /// List orders, newest first.
    ///
    /// Administrators see every order, optionally filtered by owner.
    /// Customers always see exactly their own orders; asking for someone
    /// else's is denied.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::Policy` for unauthenticated or cross-owner
    /// requests.
    pub async fn list_orders(
        &self,
        principal: Option<&Principal>,
        owner: Option<AccountId>,
    ) -> Result<Vec<Order>, OrderError> {
        let filter = match owner {
            Some(owner) => {
                policy::authorize(principal, owner, Action::Read)?;
                Some(owner)
            }
            None => match principal {
                Some(p) if p.role == UserRole::Admin => None,
                Some(p) => Some(p.id),
                None => return Err(PolicyError::Unauthenticated.into()),
            },
        };

        Ok(self.orders.find_by_owner(filter).await?)
    }

    /// Move an order to a new status.
    ///
    /// Delegates the transition decision to the status table and refreshes
    /// only `status` and `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist,
    /// `OrderError::Policy` if the caller may not modify it, and
    /// `OrderError::InvalidStatus` if the transition table rejects the move.
    pub async fn update_status(
        &self,
        principal: Option<&Principal>,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        let mut order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(OrderError::NotFound)?;
        policy::authorize(principal, order.owner_id, Action::Write)?;

        if !order.status.can_transition_to(status) {
            return Err(OrderError::InvalidStatus {
                from: order.status,
                to: status,
            });
        }

        order.set_status(status);
        self.orders.update(order.clone()).await?;
        tracing::info!(order_id = %order.id, status = %order.status, "order status updated");

        Ok(order)
    }

    /// Delete an order.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` if the order doesn't exist and
    /// `OrderError::Policy` if the caller may not delete it.
    pub async fn delete_order(
        &self,
        principal: Option<&Principal>,
        id: OrderId,
    ) -> Result<(), OrderError> {
        let order = self
            .orders
            .find_by_id(id)
            .await?
            .ok_or(OrderError::NotFound)?;
        policy::authorize(principal, order.owner_id, Action::Delete)?;

        if !self.orders.delete(id).await? {
            return Err(OrderError::NotFound);
        }
        tracing::info!(order_id = %order.id, "order deleted");

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    use rust_decimal::Decimal;

    use chrono::Utc;
    use clementine_core::{CurrencyCode, Price, ProductId};

    use crate::models::{OrderItemRequest, Product, ShippingAddress};
    use crate::store::{InMemoryCatalog, InMemoryOrderStore};

    fn admin() -> Principal {
        Principal::new(AccountId::new(), UserRole::Admin)
    }

    fn customer() -> Principal {
        Principal::new(AccountId::new(), UserRole::Customer)
    }

    fn address() -> ShippingAddress {
        ShippingAddress {
            name: "Jo Doe".to_owned(),
            line1: "1 Main St".to_owned(),
            line2: None,
            city: "Springfield".to_owned(),
            region: "IL".to_owned(),
            postal_code: "62701".to_owned(),
            country: "US".to_owned(),
        }
    }

    fn product(price: Decimal) -> Product {
        let now = Utc::now();
        Product {
            id: ProductId::new(),
            name: "widget".to_owned(),
            description: None,
            price: Price::new(price, CurrencyCode::USD),
            created_at: now,
            updated_at: now,
        }
    }

    async fn service_with(products: &[Product]) -> (OrderService, Arc<InMemoryOrderStore>) {
        let catalog = Arc::new(InMemoryCatalog::new());
        for p in products {
            catalog.insert(p.clone()).await.unwrap();
        }
        let orders = Arc::new(InMemoryOrderStore::new());
        (
            OrderService::new(catalog, Arc::clone(&orders) as Arc<dyn OrderStore>),
            orders,
        )
    }

    fn create_request(items: Vec<OrderItemRequest>) -> CreateOrderRequest {
        CreateOrderRequest {
            owner_id: None,
            items,
            shipping_address: address(),
        }
    }

    #[tokio::test]
    async fn test_create_order_snapshots_price_and_computes_total() {
        let p1 = product(Decimal::new(1000, 2)); // 10.00
        let (service, _) = service_with(&[p1.clone()]).await;
        let caller = customer();

        let order = service
            .create_order(
                Some(&caller),
                create_request(vec![OrderItemRequest {
                    product_id: p1.id,
                    quantity: 2,
                }]),
            )
            .await
            .unwrap();

        assert_eq!(order.owner_id, caller.id);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].quantity, 2);
        assert_eq!(order.items[0].price_at_purchase.amount, Decimal::new(1000, 2));
        assert_eq!(order.total_amount.amount, Decimal::new(2000, 2));
        assert_eq!(order.created_at, order.updated_at);
    }

    #[tokio::test]
    async fn test_create_order_pricing_failure_persists_nothing() {
        let (service, orders) = service_with(&[]).await;
        let caller = customer();

        let err = service
            .create_order(
                Some(&caller),
                create_request(vec![OrderItemRequest {
                    product_id: ProductId::new(),
                    quantity: 1,
                }]),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OrderError::Pricing(PricingError::ProductNotFound(_))
        ));
        assert!(orders.find_by_owner(None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_order_requires_principal() {
        let p1 = product(Decimal::new(500, 2));
        let (service, _) = service_with(&[p1.clone()]).await;

        let err = service
            .create_order(
                None,
                create_request(vec![OrderItemRequest {
                    product_id: p1.id,
                    quantity: 1,
                }]),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            OrderError::Policy(PolicyError::Unauthenticated)
        ));
    }

    #[tokio::test]
    async fn test_create_order_for_other_owner_requires_admin() {
        let p1 = product(Decimal::new(500, 2));
        let (service, _) = service_with(&[p1.clone()]).await;
        let caller = customer();
        let other = AccountId::new();

        let mut request = create_request(vec![OrderItemRequest {
            product_id: p1.id,
            quantity: 1,
        }]);
        request.owner_id = Some(other);

        let err = service
            .create_order(Some(&caller), request.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Policy(PolicyError::Forbidden)));

        let order = service.create_order(Some(&admin()), request).await.unwrap();
        assert_eq!(order.owner_id, other);
    }

    #[tokio::test]
    async fn test_update_status_changes_status_and_updated_at_only() {
        let p1 = product(Decimal::new(1000, 2));
        let (service, _) = service_with(&[p1.clone()]).await;
        let caller = customer();

        let order = service
            .create_order(
                Some(&caller),
                create_request(vec![OrderItemRequest {
                    product_id: p1.id,
                    quantity: 2,
                }]),
            )
            .await
            .unwrap();

        let updated = service
            .update_status(Some(&caller), order.id, OrderStatus::Shipped)
            .await
            .unwrap();

        assert_eq!(updated.status, OrderStatus::Shipped);
        assert!(updated.updated_at > order.updated_at);
        assert_eq!(updated.items, order.items);
        assert_eq!(updated.total_amount, order.total_amount);
        assert_eq!(updated.created_at, order.created_at);
    }

    #[tokio::test]
    async fn test_update_status_missing_order_is_not_found() {
        let (service, _) = service_with(&[]).await;

        let err = service
            .update_status(Some(&admin()), OrderId::new(), OrderStatus::Shipped)
            .await
            .unwrap_err();

        assert!(matches!(err, OrderError::NotFound));
    }

    #[tokio::test]
    async fn test_get_order_enforces_ownership() {
        let p1 = product(Decimal::new(1000, 2));
        let (service, _) = service_with(&[p1.clone()]).await;
        let owner = customer();

        let order = service
            .create_order(
                Some(&owner),
                create_request(vec![OrderItemRequest {
                    product_id: p1.id,
                    quantity: 1,
                }]),
            )
            .await
            .unwrap();

        let err = service
            .get_order(Some(&customer()), order.id)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Policy(PolicyError::Forbidden)));

        assert_eq!(
            service.get_order(Some(&owner), order.id).await.unwrap().id,
            order.id
        );
        assert_eq!(
            service.get_order(Some(&admin()), order.id).await.unwrap().id,
            order.id
        );
    }

    #[tokio::test]
    async fn test_list_orders_scopes_customers_to_their_own() {
        let p1 = product(Decimal::new(1000, 2));
        let (service, _) = service_with(&[p1.clone()]).await;
        let alice = customer();
        let bob = customer();

        for caller in [&alice, &alice, &bob] {
            service
                .create_order(
                    Some(caller),
                    create_request(vec![OrderItemRequest {
                        product_id: p1.id,
                        quantity: 1,
                    }]),
                )
                .await
                .unwrap();
        }

        let mine = service.list_orders(Some(&alice), None).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert!(mine.iter().all(|o| o.owner_id == alice.id));

        let all = service.list_orders(Some(&admin()), None).await.unwrap();
        assert_eq!(all.len(), 3);

        let err = service
            .list_orders(Some(&alice), Some(bob.id))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Policy(PolicyError::Forbidden)));

        let bobs = service
            .list_orders(Some(&admin()), Some(bob.id))
            .await
            .unwrap();
        assert_eq!(bobs.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_order() {
        let p1 = product(Decimal::new(1000, 2));
        let (service, orders) = service_with(&[p1.clone()]).await;
        let owner = customer();

        let order = service
            .create_order(
                Some(&owner),
                create_request(vec![OrderItemRequest {
                    product_id: p1.id,
                    quantity: 1,
                }]),
            )
            .await
            .unwrap();

        let err = service
            .delete_order(Some(&customer()), order.id)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::Policy(PolicyError::Forbidden)));

        service.delete_order(Some(&owner), order.id).await.unwrap();
        assert!(orders.find_by_id(order.id).await.unwrap().is_none());

        let err = service
            .delete_order(Some(&owner), order.id)
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::NotFound));
    }
}
