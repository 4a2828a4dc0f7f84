//! Backend REST API client implementation.
//!
//! One thin wrapper around `reqwest` per binary; every method maps to a
//! single backend endpoint. The client holds no state beyond the base URL,
//! so it is cheap to clone and share.

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use samaya_core::{BookingId, ProductId, ReviewId};

use crate::config::BackendApiConfig;

use super::ApiError;
use super::types::{
    Booking, BookmarkToggle, BookmarkToggleResponse, CheckoutUpdate, ContactMessage,
    LoginResponse, NewBooking, Product, Profile, ReviewInput, Story,
};

/// Error payload the backend attaches to non-success responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Client for the backend service consumed by the storefront.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &BackendApiConfig) -> Self {
        Self {
            inner: Arc::new(ApiClientInner {
                client: reqwest::Client::new(),
                base_url: config.base_url.clone(),
            }),
        }
    }

    /// The backend origin, without a trailing slash.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.inner.base_url
    }

    /// Resolve a backend image path to an absolute URL.
    ///
    /// The backend stores uploaded images as root-relative paths; anything
    /// already absolute passes through untouched.
    #[must_use]
    pub fn image_url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.inner.base_url)
        } else {
            path.to_string()
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    /// Send a request and parse the JSON response body.
    async fn execute<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(ApiError::Unauthorized);
        }

        // Read the body as text first for better error diagnostics
        let body = response.text().await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(extract_error_message(&body)));
        }

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                body = %body.chars().take(500).collect::<String>(),
                "backend returned non-success status"
            );
            return Err(ApiError::Status {
                status,
                message: extract_error_message(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "failed to parse backend response"
            );
            ApiError::Parse(e)
        })
    }

    // =========================================================================
    // Products & Reviews
    // =========================================================================

    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the response cannot be parsed.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.execute(self.inner.client.get(self.url("/api/products")))
            .await
    }

    /// Fetch a single product by id.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the product does not exist.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product(&self, product_id: &ProductId) -> Result<Product, ApiError> {
        self.execute(
            self.inner
                .client
                .get(self.url(&format!("/api/products/{product_id}"))),
        )
        .await
    }

    /// Create a review on a product (one per user, enforced server-side).
    ///
    /// # Errors
    ///
    /// Returns an error if the user already reviewed the product or the
    /// request fails.
    #[instrument(skip(self, token, review), fields(product_id = %product_id))]
    pub async fn add_review(
        &self,
        token: &str,
        product_id: &ProductId,
        review: &ReviewInput,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .execute(
                self.inner
                    .client
                    .post(self.url(&format!("/api/products/{product_id}/reviews")))
                    .bearer_auth(token)
                    .json(review),
            )
            .await?;
        Ok(())
    }

    /// Replace the caller's existing review on a product.
    ///
    /// # Errors
    ///
    /// Returns an error if no review exists or the request fails.
    #[instrument(skip(self, token, review), fields(product_id = %product_id))]
    pub async fn update_review(
        &self,
        token: &str,
        product_id: &ProductId,
        review: &ReviewInput,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .execute(
                self.inner
                    .client
                    .put(self.url(&format!("/api/products/{product_id}/reviews")))
                    .bearer_auth(token)
                    .json(review),
            )
            .await?;
        Ok(())
    }

    /// Delete a review (author or admin only, enforced server-side).
    ///
    /// # Errors
    ///
    /// Returns an error if the caller does not own the review.
    #[instrument(skip(self, token), fields(product_id = %product_id, review_id = %review_id))]
    pub async fn delete_review(
        &self,
        token: &str,
        product_id: &ProductId,
        review_id: &ReviewId,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .execute(
                self.inner
                    .client
                    .delete(self.url(&format!(
                        "/api/products/{product_id}/reviews/{review_id}"
                    )))
                    .bearer_auth(token),
            )
            .await?;
        Ok(())
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Exchange credentials for a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` on bad credentials.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let response: LoginResponse = self
            .execute(
                self.inner
                    .client
                    .post(self.url("/api/users/login"))
                    .json(&serde_json::json!({ "email": email, "password": password })),
            )
            .await?;
        Ok(response.token)
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is already taken or validation fails
    /// server-side.
    #[instrument(skip(self, password), fields(email = %email))]
    pub async fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .execute(self.inner.client.post(self.url("/api/users/signup")).json(
                &serde_json::json!({
                    "username": username,
                    "email": email,
                    "password": password
                }),
            ))
            .await?;
        Ok(())
    }

    /// Exchange a bearer token for the profile it belongs to.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Unauthorized` for an expired or invalid token.
    #[instrument(skip(self, token))]
    pub async fn me(&self, token: &str) -> Result<Profile, ApiError> {
        self.execute(
            self.inner
                .client
                .get(self.url("/api/users/me"))
                .bearer_auth(token),
        )
        .await
    }

    /// Update the caller's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn update_me(
        &self,
        token: &str,
        username: &str,
        email: &str,
    ) -> Result<Profile, ApiError> {
        self.execute(
            self.inner
                .client
                .put(self.url("/api/users/me"))
                .bearer_auth(token)
                .json(&serde_json::json!({ "username": username, "email": email })),
        )
        .await
    }

    /// Change the caller's password.
    ///
    /// # Errors
    ///
    /// Returns an error if the current password is wrong.
    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        token: &str,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .execute(
                self.inner
                    .client
                    .put(self.url("/api/users/change-password"))
                    .bearer_auth(token)
                    .json(&serde_json::json!({
                        "currentPassword": current_password,
                        "newPassword": new_password
                    })),
            )
            .await?;
        Ok(())
    }

    /// Request a password-reset email.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(email = %email))]
    pub async fn forgot_password(&self, email: &str) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .execute(
                self.inner
                    .client
                    .post(self.url("/api/users/forgot-password"))
                    .json(&serde_json::json!({ "email": email })),
            )
            .await?;
        Ok(())
    }

    /// Complete a password reset using the token from the emailed link.
    ///
    /// # Errors
    ///
    /// Returns an error for an expired or unknown reset token.
    #[instrument(skip_all)]
    pub async fn reset_password(
        &self,
        reset_token: &str,
        password: &str,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .execute(
                self.inner
                    .client
                    .post(self.url("/api/users/reset-password"))
                    .json(&serde_json::json!({ "token": reset_token, "password": password })),
            )
            .await?;
        Ok(())
    }

    // =========================================================================
    // Bookings
    // =========================================================================

    /// Fetch every booking belonging to the caller (cart lines and orders).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn my_bookings(&self, token: &str) -> Result<Vec<Booking>, ApiError> {
        self.execute(
            self.inner
                .client
                .get(self.url("/api/bookings/my-bookings"))
                .bearer_auth(token),
        )
        .await
    }

    /// Create a booking (an unconfirmed cart line).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token, booking))]
    pub async fn create_booking(&self, token: &str, booking: &NewBooking) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .execute(
                self.inner
                    .client
                    .post(self.url("/api/bookings"))
                    .bearer_auth(token)
                    .json(booking),
            )
            .await?;
        Ok(())
    }

    /// Apply the checkout update to one booking: shipping fields, payment
    /// method, and the final quantity.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; callers must treat a multi-line
    /// submission as failed when any line fails.
    #[instrument(skip(self, token, update), fields(booking_id = %booking_id))]
    pub async fn update_booking(
        &self,
        token: &str,
        booking_id: &BookingId,
        update: &CheckoutUpdate,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .execute(
                self.inner
                    .client
                    .put(self.url(&format!("/api/bookings/{booking_id}")))
                    .bearer_auth(token)
                    .json(update),
            )
            .await?;
        Ok(())
    }

    /// Cancel one booking.
    ///
    /// Not idempotent: cancelling an already-cancelled booking is an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking cannot be cancelled.
    #[instrument(skip(self, token), fields(booking_id = %booking_id))]
    pub async fn cancel_booking(
        &self,
        token: &str,
        booking_id: &BookingId,
    ) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .execute(
                self.inner
                    .client
                    .put(self.url(&format!("/api/bookings/{booking_id}/cancel")))
                    .bearer_auth(token)
                    .json(&serde_json::json!({})),
            )
            .await?;
        Ok(())
    }

    // =========================================================================
    // Bookmarks
    // =========================================================================

    /// Fetch the caller's bookmarked products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn bookmarks(&self, token: &str) -> Result<Vec<Product>, ApiError> {
        self.execute(
            self.inner
                .client
                .get(self.url("/api/bookmarks"))
                .bearer_auth(token),
        )
        .await
    }

    /// Toggle a bookmark: adds when absent, removes when present.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn toggle_bookmark(
        &self,
        token: &str,
        product_id: &ProductId,
    ) -> Result<BookmarkToggle, ApiError> {
        let response: BookmarkToggleResponse = self
            .execute(
                self.inner
                    .client
                    .post(self.url(&format!("/api/bookmarks/{product_id}")))
                    .bearer_auth(token)
                    .json(&serde_json::json!({})),
            )
            .await?;
        Ok(response.outcome())
    }

    // =========================================================================
    // Stories & Contact
    // =========================================================================

    /// Fetch the published stories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn stories(&self) -> Result<Vec<Story>, ApiError> {
        self.execute(self.inner.client.get(self.url("/api/stories")))
            .await
    }

    /// Submit a contact-form message (anonymous).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, message))]
    pub async fn submit_contact(&self, message: &ContactMessage) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .execute(
                self.inner
                    .client
                    .post(self.url("/api/contact"))
                    .json(message),
            )
            .await?;
        Ok(())
    }
}

/// Pull a human-readable message out of a backend error body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| body.chars().take(200).collect())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn test_client() -> ApiClient {
        ApiClient::new(&BackendApiConfig {
            base_url: "http://localhost:3000".to_string(),
        })
    }

    #[test]
    fn test_image_url_prefixes_root_relative_paths() {
        let api = test_client();
        assert_eq!(
            api.image_url("/uploads/seamaster.png"),
            "http://localhost:3000/uploads/seamaster.png"
        );
    }

    #[test]
    fn test_image_url_passes_absolute_through() {
        let api = test_client();
        assert_eq!(
            api.image_url("https://cdn.example.com/watch.png"),
            "https://cdn.example.com/watch.png"
        );
    }

    #[test]
    fn test_extract_error_message_variants() {
        assert_eq!(
            extract_error_message("{\"error\":\"Email already registered\"}"),
            "Email already registered"
        );
        assert_eq!(
            extract_error_message("{\"message\":\"Booking not found\"}"),
            "Booking not found"
        );
        assert_eq!(extract_error_message("not json"), "not json");
    }
}
