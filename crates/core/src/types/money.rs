//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Amounts are exact decimals; serde renders them as strings so no precision
/// is lost on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Exact line total for `quantity` units at this price.
    #[must_use]
    pub fn line_total(&self, quantity: u32) -> Decimal {
        self.amount * Decimal::from(quantity)
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    USD,
    EUR,
    GBP,
    CAD,
    AUD,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total_is_exact() {
        let price = Price::new(Decimal::new(1000, 2), CurrencyCode::USD); // 10.00
        assert_eq!(price.line_total(2), Decimal::new(2000, 2)); // 20.00

        // 0.10 * 3 must be exactly 0.30, not a binary-float approximation
        let price = Price::new(Decimal::new(10, 2), CurrencyCode::USD);
        assert_eq!(price.line_total(3), Decimal::new(30, 2));
    }

    #[test]
    fn test_line_total_zero_quantity() {
        let price = Price::new(Decimal::new(1999, 2), CurrencyCode::USD);
        assert_eq!(price.line_total(0), Decimal::ZERO);
    }

    #[test]
    fn test_serde_amount_as_string() {
        let price = Price::new(Decimal::new(1999, 2), CurrencyCode::USD);
        let json = serde_json::to_string(&price).unwrap();
        assert!(json.contains("\"19.99\""));

        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }
}
