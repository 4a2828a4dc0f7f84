//! Type-safe price representation using decimal arithmetic.
//!
//! All amounts are Nepalese rupees - the backend quotes a single currency,
//! so the type carries the amount only and formats with the "Rs" prefix the
//! store uses everywhere.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A rupee amount.
///
/// Serialized as a plain JSON number because that is how the backend quotes
/// prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Price(Decimal);

impl Serialize for Price {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::float::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Price {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        rust_decimal::serde::float::deserialize(deserializer).map(Self)
    }
}

impl Price {
    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from a whole-rupee amount.
    #[must_use]
    pub fn from_rupees(rupees: i64) -> Self {
        Self(Decimal::from(rupees))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Total for `quantity` units at this unit price.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }

    /// Sum of this price and another.
    #[must_use]
    pub fn plus(&self, other: Self) -> Self {
        Self(self.0 + other.0)
    }

    /// Amount formatted without the currency prefix, as the payment gateway
    /// expects it (no thousands separators, no trailing zeros).
    #[must_use]
    pub fn plain(&self) -> String {
        self.0.normalize().to_string()
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Rs {}", self.0.normalize())
    }
}

impl std::iter::Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|p| p.0).sum())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes_rupees() {
        assert_eq!(Price::from_rupees(1200).to_string(), "Rs 1200");
    }

    #[test]
    fn test_times_and_plus() {
        let line = Price::from_rupees(1000).times(2);
        assert_eq!(line, Price::from_rupees(2000));
        assert_eq!(
            line.plus(Price::from_rupees(200)),
            Price::from_rupees(2200)
        );
    }

    #[test]
    fn test_sum_over_lines() {
        let total: Price = [Price::from_rupees(500), Price::from_rupees(700)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_rupees(1200));
    }

    #[test]
    fn test_plain_has_no_prefix_or_trailing_zeros() {
        let price = Price::new(Decimal::new(220_000, 2)); // 2200.00
        assert_eq!(price.plain(), "2200");
    }

    #[test]
    fn test_serde_as_json_number() {
        let price: Price = serde_json::from_str("1999.5").unwrap();
        assert_eq!(price, Price::new(Decimal::new(19_995, 1)));

        let json = serde_json::to_string(&Price::from_rupees(1200)).unwrap();
        assert_eq!(json, "1200.0");
    }
}
