//! Orders panel: the full bookings ledger with state transitions.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use samaya_core::{BookingId, BookingStatus};

use crate::api::types::Booking;
use crate::components::data_table::{TableColumn, columns};
use crate::error::Result;
use crate::filters;
use crate::middleware::auth::RequireAdminAuth;
use crate::state::AppState;

use super::MessageQuery;

/// Order row display data.
#[derive(Clone)]
pub struct OrderRow {
    pub id: String,
    pub image_url: String,
    pub name: String,
    pub price: String,
    pub quantity: u32,
    pub dial_color: String,
    pub band_color: String,
    pub address: String,
    pub phone: String,
    pub payment: String,
    pub username: String,
    pub status: String,
    pub pending: bool,
}

impl OrderRow {
    fn build(state: &AppState, booking: &Booking) -> Self {
        let dash = || "—".to_string();
        Self {
            id: booking.id.to_string(),
            image_url: booking
                .product_image
                .as_deref()
                .map(|path| state.api().image_url(path))
                .unwrap_or_default(),
            name: booking.product_short_name.clone(),
            price: booking.price.to_string(),
            quantity: booking.quantity.get(),
            dial_color: booking.dial_color.clone().unwrap_or_else(dash),
            band_color: booking.band_color.clone().unwrap_or_else(dash),
            address: booking.address_one.clone().unwrap_or_else(dash),
            phone: booking.number.clone().unwrap_or_else(dash),
            payment: booking
                .payment_type
                .map_or_else(dash, |p| p.as_str().to_string()),
            username: booking
                .user
                .as_ref()
                .and_then(|u| u.username.clone())
                .unwrap_or_else(dash),
            status: booking.status.to_string(),
            pending: booking.status == BookingStatus::Pending,
        }
    }
}

/// Orders page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersTemplate {
    pub admin_name: String,
    pub columns: Vec<TableColumn>,
    pub orders: Vec<OrderRow>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display all bookings.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
    Query(query): Query<MessageQuery>,
) -> Result<OrdersTemplate> {
    let bookings = state.api().bookings(&auth.token).await?;

    let orders = bookings
        .iter()
        .map(|b| OrderRow::build(&state, b))
        .collect();

    Ok(OrdersTemplate {
        admin_name: auth.admin.username,
        columns: columns(&[
            ("image", "Image"),
            ("name", "Name"),
            ("price", "Price"),
            ("qty", "Qty"),
            ("dial", "Dial"),
            ("band", "Band"),
            ("address", "Address"),
            ("phone", "Phone"),
            ("payment", "Payment"),
            ("user", "User"),
            ("status", "Status"),
            ("actions", "Actions"),
        ]),
        orders,
        error: query.error,
        success: query.success,
    })
}

/// Approve a pending order.
#[instrument(skip(state, auth), fields(id = %id))]
pub async fn approve(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
    Path(id): Path<String>,
) -> Response {
    let booking_id = BookingId::new(id);
    match state.api().approve_booking(&auth.token, &booking_id).await {
        Ok(()) => Redirect::to("/orders?success=approved").into_response(),
        Err(e) => {
            tracing::error!("Failed to approve order: {e}");
            Redirect::to("/orders?error=approve_failed").into_response()
        }
    }
}

/// Cancel a pending order.
#[instrument(skip(state, auth), fields(id = %id))]
pub async fn cancel(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
    Path(id): Path<String>,
) -> Response {
    let booking_id = BookingId::new(id);
    match state.api().cancel_booking(&auth.token, &booking_id).await {
        Ok(()) => Redirect::to("/orders?success=cancelled").into_response(),
        Err(e) => {
            tracing::error!("Failed to cancel order: {e}");
            Redirect::to("/orders?error=cancel_failed").into_response()
        }
    }
}

/// Delete an order outright.
#[instrument(skip(state, auth), fields(id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
    Path(id): Path<String>,
) -> Response {
    let booking_id = BookingId::new(id);
    match state.api().delete_booking(&auth.token, &booking_id).await {
        Ok(()) => Redirect::to("/orders?success=deleted").into_response(),
        Err(e) => {
            tracing::error!("Failed to delete order: {e}");
            Redirect::to("/orders?error=delete_failed").into_response()
        }
    }
}
