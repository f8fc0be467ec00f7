//! Pricing error types.

use thiserror::Error;

use clementine_core::ProductId;

use crate::store::StoreError;

/// Errors that can occur while pricing an order.
///
/// Any of these aborts the whole pricing operation; there is no such thing
/// as a partially priced order.
#[derive(Debug, Error)]
pub enum PricingError {
    /// The request contained no items.
    #[error("order must contain at least one item")]
    EmptyOrder,

    /// A referenced product does not exist in the catalog.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// A requested quantity was zero or negative.
    #[error("invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity {
        /// Product the bad quantity was requested for.
        product_id: ProductId,
        /// The offending quantity.
        quantity: i64,
    },

    /// The catalog store failed.
    #[error("catalog error: {0}")]
    Store(#[from] StoreError),
}
