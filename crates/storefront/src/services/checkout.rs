//! Checkout orchestration: pricing, shipping validation, and submission.
//!
//! The backend has no batch endpoint; checkout applies one update per cart
//! line, issued concurrently, and the whole submission counts as succeeded
//! only if every line update succeeds. A failure partway through leaves the
//! already-updated lines in place with no compensating action - the backend
//! contract offers nothing to compensate with, so the error surfaces to the
//! user and the cart is re-rendered from backend state.

use futures::future::join_all;
use thiserror::Error;
use tracing::instrument;

use samaya_core::{BookingId, PaymentMethod, Price, Quantity};

use crate::api::types::CheckoutUpdate;
use crate::api::{ApiClient, ApiError};

/// Flat delivery surcharge in rupees, mirrored from server-side policy.
/// Must stay in sync with the backend's order pricing.
pub const DELIVERY_CHARGE_RUPEES: i64 = 200;

/// The delivery surcharge as a price.
#[must_use]
pub fn delivery_charge() -> Price {
    Price::from_rupees(DELIVERY_CHARGE_RUPEES)
}

/// One cart line as checkout sees it: the booking to update and the
/// effective quantity (local edits applied).
#[derive(Debug, Clone)]
pub struct CartLine {
    pub booking_id: BookingId,
    pub unit_price: Price,
    pub quantity: Quantity,
}

/// Pre-tax subtotal: sum of unit price times quantity over all lines.
#[must_use]
pub fn subtotal(lines: &[CartLine]) -> Price {
    lines
        .iter()
        .map(|line| line.unit_price.times(line.quantity.get()))
        .sum()
}

/// Grand total: subtotal plus the flat delivery charge.
#[must_use]
pub fn total(lines: &[CartLine]) -> Price {
    subtotal(lines).plus(delivery_charge())
}

/// Shipping-form validation failures, caught before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShippingError {
    #[error("Please fill in all required fields")]
    MissingFields,
    #[error("Enter a valid phone number")]
    InvalidPhone,
}

/// Validate the shipping form.
///
/// Advisory only - the backend validates independently - but nothing is
/// submitted until both fields hold.
///
/// # Errors
///
/// Returns `ShippingError` when the address is empty or the phone number is
/// not 7 to 15 digits.
pub fn validate_shipping(address: &str, phone: &str) -> Result<(), ShippingError> {
    if address.trim().is_empty() || phone.trim().is_empty() {
        return Err(ShippingError::MissingFields);
    }
    if !is_valid_phone(phone) {
        return Err(ShippingError::InvalidPhone);
    }
    Ok(())
}

/// Phone numbers are 7 to 15 digits, nothing else.
fn is_valid_phone(phone: &str) -> bool {
    (7..=15).contains(&phone.len()) && phone.bytes().all(|b| b.is_ascii_digit())
}

/// Apply the checkout update to every cart line concurrently.
///
/// # Errors
///
/// Returns the first line failure; the submission as a whole must then be
/// treated as failed even though some lines may already have been updated.
#[instrument(skip(api, token, lines), fields(line_count = lines.len(), method = %method))]
pub async fn submit(
    api: &ApiClient,
    token: &str,
    lines: &[CartLine],
    address: &str,
    phone: &str,
    method: PaymentMethod,
) -> Result<(), ApiError> {
    let updates = lines.iter().map(|line| {
        let update = CheckoutUpdate {
            address_one: address.to_string(),
            number: phone.to_string(),
            payment_type: method,
            quantity: line.quantity,
        };
        async move { api.update_booking(token, &line.booking_id, &update).await }
    });

    for result in join_all(updates).await {
        result?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn line(rupees: i64, quantity: u32) -> CartLine {
        CartLine {
            booking_id: BookingId::new("b1"),
            unit_price: Price::from_rupees(rupees),
            quantity: Quantity::clamped(quantity),
        }
    }

    #[test]
    fn test_single_line_total() {
        // One line {price 1000, qty 2} + delivery 200 => 2200
        let lines = vec![line(1000, 2)];
        assert_eq!(subtotal(&lines), Price::from_rupees(2000));
        assert_eq!(total(&lines), Price::from_rupees(2200));
    }

    #[test]
    fn test_multi_line_total() {
        let lines = vec![line(1000, 2), line(500, 3)];
        assert_eq!(subtotal(&lines), Price::from_rupees(3500));
        assert_eq!(total(&lines), Price::from_rupees(3700));
    }

    #[test]
    fn test_empty_cart_total_is_delivery_only() {
        assert_eq!(subtotal(&[]), Price::from_rupees(0));
        assert_eq!(total(&[]), delivery_charge());
    }

    #[test]
    fn test_validate_shipping_accepts_valid_input() {
        assert_eq!(validate_shipping("Lazimpat, Kathmandu", "9812345678"), Ok(()));
        assert_eq!(validate_shipping("Pokhara", "1234567"), Ok(()));
        assert_eq!(validate_shipping("Pokhara", "123456789012345"), Ok(()));
    }

    #[test]
    fn test_validate_shipping_requires_both_fields() {
        assert_eq!(
            validate_shipping("", "9812345678"),
            Err(ShippingError::MissingFields)
        );
        assert_eq!(
            validate_shipping("   ", "9812345678"),
            Err(ShippingError::MissingFields)
        );
        assert_eq!(
            validate_shipping("Kathmandu", ""),
            Err(ShippingError::MissingFields)
        );
    }

    #[test]
    fn test_validate_shipping_rejects_bad_phones() {
        // Too short, too long, non-digits
        assert_eq!(
            validate_shipping("Kathmandu", "123456"),
            Err(ShippingError::InvalidPhone)
        );
        assert_eq!(
            validate_shipping("Kathmandu", "1234567890123456"),
            Err(ShippingError::InvalidPhone)
        );
        assert_eq!(
            validate_shipping("Kathmandu", "98-12345678"),
            Err(ShippingError::InvalidPhone)
        );
        assert_eq!(
            validate_shipping("Kathmandu", "98123456a8"),
            Err(ShippingError::InvalidPhone)
        );
    }
}
