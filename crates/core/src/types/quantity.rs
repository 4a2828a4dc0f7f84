//! Bounded order quantity.
//!
//! The store sells at most five units of a watch per booking. Every
//! quantity that enters the system goes through [`Quantity::clamped`], so a
//! value outside 1..=5 can never be displayed or submitted.

use serde::{Deserialize, Serialize};

/// Number of units in a booking, always within `[MIN, MAX]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Quantity(u32);

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Clamp on the way in so out-of-range wire values cannot leak through.
        u32::deserialize(deserializer).map(Self::clamped)
    }
}

impl Quantity {
    /// Smallest orderable quantity.
    pub const MIN: u32 = 1;
    /// Largest orderable quantity.
    pub const MAX: u32 = 5;

    /// Create a quantity, clamping the value into `[MIN, MAX]`.
    #[must_use]
    pub const fn clamped(value: u32) -> Self {
        if value < Self::MIN {
            Self(Self::MIN)
        } else if value > Self::MAX {
            Self(Self::MAX)
        } else {
            Self(value)
        }
    }

    /// The quantity as a plain integer.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Apply a signed delta, clamping the result into `[MIN, MAX]`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub const fn adjusted(&self, delta: i32) -> Self {
        let value = self.0 as i64 + delta as i64;
        if value < Self::MIN as i64 {
            Self(Self::MIN)
        } else if value > Self::MAX as i64 {
            Self(Self::MAX)
        } else {
            Self(value as u32)
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_bounds() {
        assert_eq!(Quantity::clamped(0).get(), 1);
        assert_eq!(Quantity::clamped(1).get(), 1);
        assert_eq!(Quantity::clamped(3).get(), 3);
        assert_eq!(Quantity::clamped(5).get(), 5);
        assert_eq!(Quantity::clamped(99).get(), 5);
    }

    #[test]
    fn test_adjusted_stays_in_range_for_any_delta() {
        for start in 1..=5 {
            for delta in -10..=10 {
                let adjusted = Quantity::clamped(start).adjusted(delta).get();
                assert!((1..=5).contains(&adjusted));
            }
        }
    }

    #[test]
    fn test_deserialize_clamps_wire_values() {
        let qty: Quantity = serde_json::from_str("99").unwrap();
        assert_eq!(qty.get(), 5);
        let qty: Quantity = serde_json::from_str("0").unwrap();
        assert_eq!(qty.get(), 1);
    }

    #[test]
    fn test_adjusted_steps() {
        let qty = Quantity::clamped(2);
        assert_eq!(qty.adjusted(1).get(), 3);
        assert_eq!(qty.adjusted(-1).get(), 1);
        assert_eq!(qty.adjusted(-5).get(), 1);
        assert_eq!(qty.adjusted(5).get(), 5);
    }
}
