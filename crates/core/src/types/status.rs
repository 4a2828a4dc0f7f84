//! Status and role enums shared by both binaries.

use serde::{Deserialize, Serialize};

/// Booking lifecycle status as the backend reports it.
///
/// A booking with an empty shipping address is a cart line regardless of
/// status; once checkout fills the address it is an order moving from
/// `Pending` toward `Approved` or `Cancelled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Approved,
    Cancelled,
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Approved => write!(f, "approved"),
            Self::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Account role issued by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    /// Whether this role grants access to the back office.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

/// How an order is paid.
///
/// The wire strings are the backend's own and must round-trip exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "Cash on Delivery")]
    CashOnDelivery,
    #[serde(rename = "eSewa")]
    Esewa,
}

impl PaymentMethod {
    /// The backend's wire name for this method.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CashOnDelivery => "Cash on Delivery",
            Self::Esewa => "eSewa",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_status_wire_format() {
        let status: BookingStatus = serde_json::from_str("\"pending\"").unwrap();
        assert_eq!(status, BookingStatus::Pending);
        assert_eq!(serde_json::to_string(&BookingStatus::Cancelled).unwrap(), "\"cancelled\"");
    }

    #[test]
    fn test_role_gate() {
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
    }

    #[test]
    fn test_payment_method_round_trip() {
        let cod: PaymentMethod = serde_json::from_str("\"Cash on Delivery\"").unwrap();
        assert_eq!(cod, PaymentMethod::CashOnDelivery);
        assert_eq!(serde_json::to_string(&PaymentMethod::Esewa).unwrap(), "\"eSewa\"");
        assert_eq!(PaymentMethod::Esewa.as_str(), "eSewa");
    }
}
