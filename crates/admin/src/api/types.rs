//! Wire types for the backend endpoints the admin panel consumes.
//!
//! Field names mirror the backend's JSON exactly (camelCase, `_id` for
//! document ids).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use samaya_core::{
    BookingId, BookingStatus, ContactId, PaymentMethod, Price, ProductId, Quantity, Role, StoryId,
    UserId,
};

/// Authenticated profile returned by `GET /api/users/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub role: Role,
}

/// Response body of `POST /api/users/login`.
#[derive(Debug, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// The booking owner as embedded in the admin bookings listing.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingUser {
    #[serde(default)]
    pub username: Option<String>,
}

/// A booking row in the all-bookings listing.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: BookingId,
    pub quantity: Quantity,
    pub price: Price,
    #[serde(default)]
    pub product_image: Option<String>,
    pub product_short_name: String,
    #[serde(default)]
    pub dial_color: Option<String>,
    #[serde(default)]
    pub band_color: Option<String>,
    #[serde(default)]
    pub address_one: Option<String>,
    #[serde(default)]
    pub number: Option<String>,
    #[serde(default)]
    pub payment_type: Option<PaymentMethod>,
    #[serde(default)]
    pub user: Option<BookingUser>,
    #[serde(default)]
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

/// A registered account in the users panel.
#[derive(Debug, Clone, Deserialize)]
pub struct UserAccount {
    #[serde(rename = "_id")]
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Role,
}

/// Request body for `POST /api/users` (admin user creation).
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: Role,
}

/// A contact-form message in the contacts panel.
#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    #[serde(rename = "_id")]
    pub id: ContactId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
}

/// A story in the stories panel.
#[derive(Debug, Clone, Deserialize)]
pub struct Story {
    #[serde(rename = "_id")]
    pub id: StoryId,
    pub name: String,
    pub date: String,
    pub story: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// A (dial, band) pair mapped to a product image variant.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCombination {
    pub dial_color: String,
    pub band_color: String,
    pub image_url: String,
}

/// A product row in the products panel.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub short_name: String,
    pub full_name: String,
    pub price: Price,
    #[serde(default)]
    pub discount_price: Option<Price>,
    #[serde(rename = "type")]
    pub kind: String,
    pub in_stock: bool,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_combinations: Vec<ImageCombination>,
}

/// Scalar fields of a product create/update submission. Image combination
/// parts ride alongside in the multipart body.
#[derive(Debug, Clone)]
pub struct ProductFields {
    pub short_name: String,
    pub full_name: String,
    pub price: String,
    pub discount_price: Option<String>,
    pub kind: String,
    pub in_stock: bool,
    pub description: String,
}

/// One uploaded image combination row.
#[derive(Debug, Clone)]
pub struct CombinationUpload {
    pub dial_color: String,
    pub band_color: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Scalar fields of a story create/update submission.
#[derive(Debug, Clone)]
pub struct StoryFields {
    pub name: String,
    pub date: String,
    pub story: String,
}

/// An uploaded image file.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Aggregate analytics payload from `GET /api/dashboard`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    #[serde(default)]
    pub total_sales_revenue: Price,
    #[serde(default)]
    pub total_orders: u64,
    #[serde(default)]
    pub total_products: u64,
    #[serde(default)]
    pub total_customers: u64,
    #[serde(default)]
    pub product_orders: Vec<ProductOrderCount>,
    #[serde(default)]
    pub weekly_orders: Vec<WeeklyOrderCount>,
    #[serde(default)]
    pub order_status: Vec<StatusCount>,
    #[serde(default)]
    pub contact_requests: Vec<MonthlyCount>,
}

/// Orders per product, for the top-ordered chart.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductOrderCount {
    pub product_name: String,
    pub count: u64,
}

/// Orders per ISO week.
#[derive(Debug, Clone, Deserialize)]
pub struct WeeklyOrderCount {
    #[serde(rename = "_id")]
    pub id: WeekKey,
    #[serde(default)]
    pub count: u64,
}

/// Week bucket key.
#[derive(Debug, Clone, Deserialize)]
pub struct WeekKey {
    #[serde(default)]
    pub week: Option<u32>,
    #[serde(default)]
    pub year: Option<i32>,
}

/// Orders per status.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusCount {
    #[serde(rename = "_id")]
    pub status: String,
    pub count: u64,
}

/// Contact requests per month.
#[derive(Debug, Clone, Deserialize)]
pub struct MonthlyCount {
    #[serde(rename = "_id")]
    pub month: u32,
    pub count: u64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_payload_parses() {
        let json = serde_json::json!({
            "totalSalesRevenue": 125_000,
            "totalOrders": 42,
            "totalProducts": 12,
            "totalCustomers": 30,
            "productOrders": [{"productName": "Seamaster", "count": 9}],
            "weeklyOrders": [{"_id": {"week": 31, "year": 2026}, "count": 5}],
            "orderStatus": [{"_id": "pending", "count": 7}],
            "contactRequests": [{"_id": 8, "count": 3}]
        });
        let data: DashboardData = serde_json::from_value(json).unwrap();
        assert_eq!(data.total_orders, 42);
        assert_eq!(data.product_orders.len(), 1);
        assert_eq!(data.weekly_orders.first().unwrap().id.week, Some(31));
        assert_eq!(data.order_status.first().unwrap().status, "pending");
    }

    #[test]
    fn test_dashboard_payload_defaults_missing_sections() {
        let data: DashboardData = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(data.total_orders, 0);
        assert!(data.product_orders.is_empty());
    }

    #[test]
    fn test_booking_row_with_owner() {
        let json = serde_json::json!({
            "_id": "b1",
            "quantity": 2,
            "price": 1500,
            "productShortName": "Speedmaster",
            "addressOne": "Patan",
            "number": "9812345678",
            "paymentType": "eSewa",
            "user": {"username": "asha"},
            "status": "pending",
            "createdAt": "2026-08-01T10:00:00Z"
        });
        let booking: Booking = serde_json::from_value(json).unwrap();
        assert_eq!(booking.user.unwrap().username.as_deref(), Some("asha"));
        assert_eq!(booking.payment_type, Some(PaymentMethod::Esewa));
    }
}
