//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A retail price (MSRP) in the store's currency.
///
/// Stored as a decimal amount in the currency's standard unit (dollars, not
/// cents) to avoid floating-point drift in product documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Get the decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_two_decimal_places() {
        let price = Price::new(Decimal::new(2200, 1)); // 220.0
        assert_eq!(price.to_string(), "220.00");
    }

    #[test]
    fn test_serde_roundtrip_as_string() {
        // serde-with-str keeps decimals exact in JSON documents
        let price = Price::new(Decimal::new(18999, 2)); // 189.99
        let json = serde_json::to_string(&price).unwrap();
        assert_eq!(json, "\"189.99\"");
        let back: Price = serde_json::from_str(&json).unwrap();
        assert_eq!(back, price);
    }
}
