//! Order pricing.
//!
//! Resolves requested `(product, quantity)` pairs against the catalog,
//! snapshotting each price as it is read, and computes the exact order
//! total. Pricing happens entirely before anything is persisted: a failure
//! here leaves no trace.

mod error;

pub use error::PricingError;

use rust_decimal::Decimal;

use clementine_core::Price;

use crate::models::{OrderItemRequest, OrderLineItem};
use crate::store::CatalogStore;

/// A successfully priced order, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedOrder {
    /// Priced line items, in the order they were requested.
    pub line_items: Vec<OrderLineItem>,
    /// Exact sum of `quantity * price_at_purchase` across all line items.
    pub total_amount: Price,
}

/// Price an order against the current catalog.
///
/// Each requested product is resolved exactly once; the price read at that
/// moment becomes the line item's `price_at_purchase` and is never re-read,
/// even if the catalog changes before the order is persisted. The total is
/// the exact decimal sum over the line items, in input order.
///
/// # Errors
///
/// Returns `PricingError::EmptyOrder` for an empty request,
/// `PricingError::InvalidQuantity` for any non-positive quantity,
/// `PricingError::ProductNotFound` for an unknown product, and
/// `PricingError::Store` if the catalog itself fails. Any error aborts the
/// whole operation.
pub async fn price_order(
    catalog: &dyn CatalogStore,
    items: &[OrderItemRequest],
) -> Result<PricedOrder, PricingError> {
    if items.is_empty() {
        return Err(PricingError::EmptyOrder);
    }

    let mut line_items = Vec::with_capacity(items.len());
    let mut total = Decimal::ZERO;
    let mut currency = None;

    for item in items {
        let quantity = u32::try_from(item.quantity)
            .ok()
            .filter(|&q| q > 0)
            .ok_or(PricingError::InvalidQuantity {
                product_id: item.product_id,
                quantity: item.quantity,
            })?;

        let product = catalog
            .get(item.product_id)
            .await?
            .ok_or(PricingError::ProductNotFound(item.product_id))?;

        // Price snapshot: this exact value is what the customer pays,
        // regardless of later catalog changes.
        let price_at_purchase = product.price;
        total += price_at_purchase.line_total(quantity);
        currency.get_or_insert(price_at_purchase.currency_code);

        line_items.push(OrderLineItem {
            product_id: item.product_id,
            quantity,
            price_at_purchase,
        });
    }

    Ok(PricedOrder {
        line_items,
        total_amount: Price::new(total, currency.unwrap_or_default()),
    })
}
