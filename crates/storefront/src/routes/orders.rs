//! Order history route handlers.
//!
//! Orders are bookings whose checkout populated the shipping fields.
//! Cancellation is offered client-side only while the order is pending and
//! less than 24 hours old; the backend enforces the same rule independently.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::instrument;

use samaya_core::{BookingId, BookingStatus};

use crate::api::types::Booking;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

use super::Nav;
use super::cart::MessageQuery;

/// How long after placement an order may still be cancelled.
const CANCEL_WINDOW_HOURS: i64 = 24;

/// Whether the cancel action should be offered for an order.
///
/// Pending status and within the 24-hour window; everything else shows no
/// action.
#[must_use]
pub fn can_cancel(status: BookingStatus, created_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    status == BookingStatus::Pending
        && now.signed_duration_since(created_at) <= chrono::Duration::hours(CANCEL_WINDOW_HOURS)
}

/// Order row display data.
#[derive(Clone)]
pub struct OrderView {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub price: String,
    pub quantity: u32,
    pub address: String,
    pub dial_color: String,
    pub band_color: String,
    pub status: String,
    pub cancellable: bool,
}

impl OrderView {
    fn build(state: &AppState, booking: &Booking, now: DateTime<Utc>) -> Self {
        Self {
            id: booking.id.to_string(),
            name: booking.product_short_name.clone(),
            image_url: booking
                .product_image
                .as_deref()
                .map(|path| state.api().image_url(path))
                .unwrap_or_default(),
            price: booking.price.to_string(),
            quantity: booking.quantity.get(),
            address: booking.address_one.clone().unwrap_or_default(),
            dial_color: booking.dial_color.clone().unwrap_or_else(|| "—".to_string()),
            band_color: booking.band_color.clone().unwrap_or_else(|| "—".to_string()),
            status: booking.status.to_string(),
            cancellable: can_cancel(booking.status, booking.created_at, now),
        }
    }
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub nav: Nav,
    pub orders: Vec<OrderView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the user's order history.
#[instrument(skip(state, nav, auth))]
pub async fn index(
    State(state): State<AppState>,
    nav: Nav,
    RequireAuth(auth): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<OrdersTemplate> {
    let bookings = state.api().my_bookings(&auth.token).await?;
    let now = Utc::now();

    let orders = bookings
        .iter()
        .filter(|b| !b.is_in_cart())
        .map(|b| OrderView::build(&state, b, now))
        .collect();

    Ok(OrdersTemplate {
        nav,
        orders,
        error: query.error,
        success: query.success,
    })
}

/// Cancel form data.
#[derive(Debug, Deserialize)]
pub struct CancelOrderForm {
    pub booking_id: String,
}

/// Cancel a pending order.
#[instrument(skip(state, auth, form))]
pub async fn cancel(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    Form(form): Form<CancelOrderForm>,
) -> Response {
    let booking_id = BookingId::new(form.booking_id);

    match state.api().cancel_booking(&auth.token, &booking_id).await {
        Ok(()) => Redirect::to("/orders?success=cancelled").into_response(),
        Err(e) => {
            tracing::error!("Order cancellation failed: {e}");
            Redirect::to("/orders?error=cancel_failed").into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<Utc> {
        rfc3339.parse().unwrap()
    }

    #[test]
    fn test_pending_within_window_is_cancellable() {
        let created = at("2026-08-01T10:00:00Z");
        let now = at("2026-08-02T09:59:00Z");
        assert!(can_cancel(BookingStatus::Pending, created, now));
    }

    #[test]
    fn test_pending_after_window_is_not() {
        let created = at("2026-08-01T10:00:00Z");
        let now = at("2026-08-02T10:01:00Z");
        assert!(!can_cancel(BookingStatus::Pending, created, now));
    }

    #[test]
    fn test_non_pending_is_never_cancellable() {
        let created = at("2026-08-01T10:00:00Z");
        let now = at("2026-08-01T11:00:00Z");
        assert!(!can_cancel(BookingStatus::Approved, created, now));
        assert!(!can_cancel(BookingStatus::Cancelled, created, now));
    }
}
