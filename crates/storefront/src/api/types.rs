//! Wire types for the backend REST API.
//!
//! Field names mirror the backend's JSON exactly (camelCase, `_id` for
//! document ids). These are transport shapes; routes convert them into view
//! structs before templating.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use samaya_core::{
    BookingId, BookingStatus, PaymentMethod, Price, ProductId, Quantity, ReviewId, Role, StoryId,
    UserId,
};

/// Authenticated profile returned by `GET /api/users/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
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

/// A (dial, band) pair mapped to a product image variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageCombination {
    pub dial_color: String,
    pub band_color: String,
    pub image_url: String,
}

/// A customer review embedded in a product document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(rename = "_id")]
    pub id: ReviewId,
    /// Authoring user's id.
    pub user: UserId,
    pub username: String,
    pub rating: u8,
    pub comment: String,
}

/// A product as returned by `GET /api/products`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub short_name: String,
    pub full_name: String,
    pub price: Price,
    #[serde(default)]
    pub discount_price: Option<Price>,
    /// Category, e.g. "digital" or "analog".
    #[serde(rename = "type")]
    pub kind: String,
    pub in_stock: bool,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_combinations: Vec<ImageCombination>,
    #[serde(default)]
    pub reviews: Vec<Review>,
}

impl Product {
    /// The price a buyer actually pays: discounted when present, else list.
    #[must_use]
    pub fn effective_price(&self) -> Price {
        self.discount_price.unwrap_or(self.price)
    }

    /// The preferred display combination: black/black when offered, else the
    /// first one.
    #[must_use]
    pub fn default_combination(&self) -> Option<&ImageCombination> {
        self.image_combinations
            .iter()
            .find(|c| {
                c.dial_color.eq_ignore_ascii_case("black")
                    && c.band_color.eq_ignore_ascii_case("black")
            })
            .or_else(|| self.image_combinations.first())
    }

    /// The combination matching an exact (dial, band) pair, if offered.
    #[must_use]
    pub fn combination(&self, dial_color: &str, band_color: &str) -> Option<&ImageCombination> {
        self.image_combinations
            .iter()
            .find(|c| c.dial_color == dial_color && c.band_color == band_color)
    }

    /// The review authored by `user`, if any.
    #[must_use]
    pub fn review_by(&self, user: &UserId) -> Option<&Review> {
        self.reviews.iter().find(|r| &r.user == user)
    }
}

/// A booking as returned by the bookings endpoints.
///
/// A booking with an empty `address_one` is a cart line; once checkout
/// populates the shipping fields it is an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    #[serde(rename = "_id")]
    pub id: BookingId,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub quantity: Quantity,
    /// Unit price captured at add-to-cart time.
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
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Whether this booking is still an unconfirmed cart line.
    ///
    /// A booking sits in the cart exactly while its shipping address is
    /// empty or absent.
    #[must_use]
    pub fn is_in_cart(&self) -> bool {
        self.address_one
            .as_deref()
            .is_none_or(|addr| addr.trim().is_empty())
    }
}

/// Request body for `POST /api/bookings`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBooking {
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub product_image: String,
    pub product_short_name: String,
    pub price: Price,
    pub dial_color: Option<String>,
    pub band_color: Option<String>,
    pub address_one: Option<String>,
    pub number: Option<String>,
    pub payment_type: Option<PaymentMethod>,
}

/// Request body for the per-line checkout update `PUT /api/bookings/:id`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutUpdate {
    pub address_one: String,
    pub number: String,
    pub payment_type: PaymentMethod,
    pub quantity: Quantity,
}

/// Outcome of the bookmark toggle endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkToggle {
    Added,
    Removed,
}

/// Raw response body of `POST /api/bookmarks/:productId`.
#[derive(Debug, Deserialize)]
pub struct BookmarkToggleResponse {
    pub message: String,
}

impl BookmarkToggleResponse {
    /// Interpret the backend's message string.
    #[must_use]
    pub fn outcome(&self) -> BookmarkToggle {
        if self.message == "Bookmark removed" {
            BookmarkToggle::Removed
        } else {
            BookmarkToggle::Added
        }
    }
}

/// Request body for creating or updating a review.
#[derive(Debug, Clone, Serialize)]
pub struct ReviewInput {
    pub rating: u8,
    pub comment: String,
}

/// A story as returned by `GET /api/stories`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Story {
    #[serde(rename = "_id")]
    pub id: StoryId,
    pub name: String,
    pub date: String,
    pub story: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// Request body for `POST /api/contact`.
#[derive(Debug, Clone, Serialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn combo(dial: &str, band: &str) -> ImageCombination {
        ImageCombination {
            dial_color: dial.to_string(),
            band_color: band.to_string(),
            image_url: format!("/uploads/{dial}-{band}.png"),
        }
    }

    fn product_with_combos(combos: Vec<ImageCombination>) -> Product {
        Product {
            id: ProductId::new("p1"),
            short_name: "Seamaster".to_string(),
            full_name: "Omega Seamaster".to_string(),
            price: Price::from_rupees(5000),
            discount_price: None,
            kind: "analog".to_string(),
            in_stock: true,
            rating: Some(4.5),
            description: String::new(),
            image_combinations: combos,
            reviews: Vec::new(),
        }
    }

    #[test]
    fn test_default_combination_prefers_black_black() {
        let product = product_with_combos(vec![
            combo("blue", "black"),
            combo("Black", "Black"),
            combo("white", "brown"),
        ]);
        let default = product.default_combination().unwrap();
        assert_eq!(default.dial_color, "Black");
        assert_eq!(default.band_color, "Black");
    }

    #[test]
    fn test_default_combination_falls_back_to_first() {
        let product = product_with_combos(vec![combo("blue", "black"), combo("white", "brown")]);
        let default = product.default_combination().unwrap();
        assert_eq!(default.dial_color, "blue");
    }

    #[test]
    fn test_combination_requires_exact_pair() {
        let product = product_with_combos(vec![combo("blue", "brown"), combo("black", "black")]);
        assert!(product.combination("blue", "black").is_none());
        assert!(product.combination("blue", "brown").is_some());
    }

    #[test]
    fn test_effective_price_prefers_discount() {
        let mut product = product_with_combos(vec![]);
        assert_eq!(product.effective_price(), Price::from_rupees(5000));
        product.discount_price = Some(Price::from_rupees(4200));
        assert_eq!(product.effective_price(), Price::from_rupees(4200));
    }

    #[test]
    fn test_booking_cart_membership() {
        let json = serde_json::json!({
            "_id": "b1",
            "quantity": 2,
            "price": 1000,
            "productShortName": "Seamaster",
            "status": "pending",
            "createdAt": "2026-08-01T10:00:00Z"
        });
        let booking: Booking = serde_json::from_value(json).unwrap();
        assert!(booking.is_in_cart());

        let json = serde_json::json!({
            "_id": "b2",
            "quantity": 1,
            "price": 1000,
            "productShortName": "Seamaster",
            "addressOne": "Kathmandu",
            "number": "9812345678",
            "paymentType": "Cash on Delivery",
            "status": "pending",
            "createdAt": "2026-08-01T10:00:00Z"
        });
        let booking: Booking = serde_json::from_value(json).unwrap();
        assert!(!booking.is_in_cart());
    }

    #[test]
    fn test_whitespace_address_still_counts_as_cart() {
        let json = serde_json::json!({
            "_id": "b3",
            "quantity": 1,
            "price": 500,
            "productShortName": "Speedmaster",
            "addressOne": "   ",
            "status": "pending",
            "createdAt": "2026-08-01T10:00:00Z"
        });
        let booking: Booking = serde_json::from_value(json).unwrap();
        assert!(booking.is_in_cart());
    }

    #[test]
    fn test_bookmark_toggle_messages() {
        let added = BookmarkToggleResponse {
            message: "Product bookmarked".to_string(),
        };
        let removed = BookmarkToggleResponse {
            message: "Bookmark removed".to_string(),
        };
        assert_eq!(added.outcome(), BookmarkToggle::Added);
        assert_eq!(removed.outcome(), BookmarkToggle::Removed);
    }

    #[test]
    fn test_review_lookup_by_author() {
        let mut product = product_with_combos(vec![]);
        product.reviews.push(Review {
            id: ReviewId::new("r1"),
            user: UserId::new("u1"),
            username: "asha".to_string(),
            rating: 4,
            comment: "Solid watch".to_string(),
        });
        assert!(product.review_by(&UserId::new("u1")).is_some());
        assert!(product.review_by(&UserId::new("u2")).is_none());
    }
}
