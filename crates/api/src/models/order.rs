//! Order domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clementine_core::{AccountId, OrderId, OrderStatus, Price, ProductId};

/// One priced entry within an order.
///
/// `price_at_purchase` is the catalog price captured when the order was
/// created; it is never recomputed, even if the catalog price changes later.
/// Line items are immutable once the order exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    /// Product this line refers to.
    pub product_id: ProductId,
    /// Number of units ordered. Always at least 1.
    pub quantity: u32,
    /// Price snapshot taken at order creation.
    pub price_at_purchase: Price,
}

/// Shipping destination for an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    /// Recipient name.
    pub name: String,
    /// Street address.
    pub line1: String,
    /// Apartment, suite, etc.
    pub line2: Option<String>,
    /// City.
    pub city: String,
    /// State or province.
    pub region: String,
    /// Postal or ZIP code.
    pub postal_code: String,
    /// Country.
    pub country: String,
}

/// An order.
///
/// The order and its line items form a single document; they are persisted
/// and deleted as one unit. Invariant: `total_amount` equals the sum of
/// `quantity * price_at_purchase` over `items`, computed at creation and
/// never independently mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Unique order ID.
    pub id: OrderId,
    /// Account that owns this order.
    pub owner_id: AccountId,
    /// Line items, in the order they were submitted.
    pub items: Vec<OrderLineItem>,
    /// Exact total across all line items.
    pub total_amount: Price,
    /// Current lifecycle status.
    pub status: OrderStatus,
    /// Shipping destination.
    pub shipping_address: ShippingAddress,
    /// When the order was created.
    pub created_at: DateTime<Utc>,
    /// When the order was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Move the order to `status`, refreshing `updated_at`.
    ///
    /// Only these two fields change. The caller is responsible for having
    /// checked the transition table and authorized the actor.
    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// One requested entry in an order-creation call.
///
/// `quantity` is signed on the wire so that non-positive values reach the
/// pricing engine and fail with a typed error instead of a deserialization
/// rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRequest {
    /// Product to order.
    pub product_id: ProductId,
    /// Requested quantity. Must be positive.
    pub quantity: i64,
}

/// Request body for creating an order.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderRequest {
    /// Owner of the new order. Defaults to the caller; setting it to a
    /// different account requires administrator access.
    pub owner_id: Option<AccountId>,
    /// Requested items, in order.
    pub items: Vec<OrderItemRequest>,
    /// Shipping destination.
    pub shipping_address: ShippingAddress,
}
