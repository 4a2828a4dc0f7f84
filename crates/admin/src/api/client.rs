//! Admin backend client implementation.

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use samaya_core::{BookingId, ContactId, ProductId, StoryId, UserId};

use crate::config::BackendApiConfig;

use super::ApiError;
use super::types::{
    Booking, CombinationUpload, Contact, DashboardData, ImageUpload, LoginResponse, NewUser,
    Product, ProductFields, Profile, Story, StoryFields, UserAccount,
};

/// Error payload the backend attaches to non-success responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Client for the backend endpoints the admin panel consumes.
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

    /// Resolve a backend image path to an absolute URL.
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

        serde_json::from_str(&body).map_err(ApiError::Parse)
    }

    async fn execute_ignored(&self, request: reqwest::RequestBuilder) -> Result<(), ApiError> {
        let _: serde_json::Value = self.execute(request).await?;
        Ok(())
    }

    // =========================================================================
    // Auth
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

    // =========================================================================
    // Bookings
    // =========================================================================

    /// Fetch every booking in the store.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn bookings(&self, token: &str) -> Result<Vec<Booking>, ApiError> {
        self.execute(
            self.inner
                .client
                .get(self.url("/api/bookings"))
                .bearer_auth(token),
        )
        .await
    }

    /// Approve a pending booking.
    ///
    /// # Errors
    ///
    /// Returns an error if the booking cannot be approved.
    #[instrument(skip(self, token), fields(booking_id = %booking_id))]
    pub async fn approve_booking(
        &self,
        token: &str,
        booking_id: &BookingId,
    ) -> Result<(), ApiError> {
        self.execute_ignored(
            self.inner
                .client
                .put(self.url(&format!("/api/bookings/{booking_id}/approve")))
                .bearer_auth(token)
                .json(&serde_json::json!({})),
        )
        .await
    }

    /// Cancel a pending booking.
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
        self.execute_ignored(
            self.inner
                .client
                .put(self.url(&format!("/api/bookings/{booking_id}/cancel")))
                .bearer_auth(token)
                .json(&serde_json::json!({})),
        )
        .await
    }

    /// Delete a booking outright.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(booking_id = %booking_id))]
    pub async fn delete_booking(
        &self,
        token: &str,
        booking_id: &BookingId,
    ) -> Result<(), ApiError> {
        self.execute_ignored(
            self.inner
                .client
                .delete(self.url(&format!("/api/bookings/{booking_id}")))
                .bearer_auth(token),
        )
        .await
    }

    // =========================================================================
    // Users
    // =========================================================================

    /// Fetch every registered account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn users(&self, token: &str) -> Result<Vec<UserAccount>, ApiError> {
        self.execute(
            self.inner
                .client
                .get(self.url("/api/users"))
                .bearer_auth(token),
        )
        .await
    }

    /// Create an account with an explicit role.
    ///
    /// # Errors
    ///
    /// Returns an error if the email is taken or validation fails.
    #[instrument(skip(self, token, user))]
    pub async fn create_user(&self, token: &str, user: &NewUser) -> Result<(), ApiError> {
        self.execute_ignored(
            self.inner
                .client
                .post(self.url("/api/users"))
                .bearer_auth(token)
                .json(user),
        )
        .await
    }

    /// Delete an account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(user_id = %user_id))]
    pub async fn delete_user(&self, token: &str, user_id: &UserId) -> Result<(), ApiError> {
        self.execute_ignored(
            self.inner
                .client
                .delete(self.url(&format!("/api/users/{user_id}")))
                .bearer_auth(token),
        )
        .await
    }

    // =========================================================================
    // Contacts
    // =========================================================================

    /// Fetch the contact inbox.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn contacts(&self, token: &str) -> Result<Vec<Contact>, ApiError> {
        self.execute(
            self.inner
                .client
                .get(self.url("/api/contact"))
                .bearer_auth(token),
        )
        .await
    }

    /// Delete a contact message.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(contact_id = %contact_id))]
    pub async fn delete_contact(
        &self,
        token: &str,
        contact_id: &ContactId,
    ) -> Result<(), ApiError> {
        self.execute_ignored(
            self.inner
                .client
                .delete(self.url(&format!("/api/contact/{contact_id}")))
                .bearer_auth(token),
        )
        .await
    }

    // =========================================================================
    // Stories
    // =========================================================================

    /// Fetch all stories.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn stories(&self) -> Result<Vec<Story>, ApiError> {
        self.execute(self.inner.client.get(self.url("/api/stories")))
            .await
    }

    /// Publish a story with its hero image.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    #[instrument(skip(self, token, fields, image))]
    pub async fn create_story(
        &self,
        token: &str,
        fields: &StoryFields,
        image: ImageUpload,
    ) -> Result<(), ApiError> {
        let form = story_form(fields, Some(image), None);
        self.execute_ignored(
            self.inner
                .client
                .post(self.url("/api/stories"))
                .bearer_auth(token)
                .multipart(form),
        )
        .await
    }

    /// Update a story, keeping the existing image when no new one is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    #[instrument(skip(self, token, fields, image), fields(story_id = %story_id))]
    pub async fn update_story(
        &self,
        token: &str,
        story_id: &StoryId,
        fields: &StoryFields,
        image: Option<ImageUpload>,
        existing_image: Option<&str>,
    ) -> Result<(), ApiError> {
        let form = story_form(fields, image, existing_image);
        self.execute_ignored(
            self.inner
                .client
                .put(self.url(&format!("/api/stories/{story_id}")))
                .bearer_auth(token)
                .multipart(form),
        )
        .await
    }

    /// Delete a story.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(story_id = %story_id))]
    pub async fn delete_story(&self, token: &str, story_id: &StoryId) -> Result<(), ApiError> {
        self.execute_ignored(
            self.inner
                .client
                .delete(self.url(&format!("/api/stories/{story_id}")))
                .bearer_auth(token),
        )
        .await
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Fetch the full product list.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Vec<Product>, ApiError> {
        self.execute(self.inner.client.get(self.url("/api/products")))
            .await
    }

    /// Create a product with its image combinations.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    #[instrument(skip(self, token, fields, combinations))]
    pub async fn create_product(
        &self,
        token: &str,
        fields: &ProductFields,
        combinations: Vec<CombinationUpload>,
    ) -> Result<(), ApiError> {
        let form = product_form(fields, combinations);
        self.execute_ignored(
            self.inner
                .client
                .post(self.url("/api/products"))
                .bearer_auth(token)
                .multipart(form),
        )
        .await
    }

    /// Update a product's fields and any newly uploaded combinations.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    #[instrument(skip(self, token, fields, combinations), fields(product_id = %product_id))]
    pub async fn update_product(
        &self,
        token: &str,
        product_id: &ProductId,
        fields: &ProductFields,
        combinations: Vec<CombinationUpload>,
    ) -> Result<(), ApiError> {
        let form = product_form(fields, combinations);
        self.execute_ignored(
            self.inner
                .client
                .put(self.url(&format!("/api/products/{product_id}")))
                .bearer_auth(token)
                .multipart(form),
        )
        .await
    }

    /// Delete a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn delete_product(
        &self,
        token: &str,
        product_id: &ProductId,
    ) -> Result<(), ApiError> {
        self.execute_ignored(
            self.inner
                .client
                .delete(self.url(&format!("/api/products/{product_id}")))
                .bearer_auth(token),
        )
        .await
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Fetch the aggregate analytics payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn dashboard(&self, token: &str) -> Result<DashboardData, ApiError> {
        self.execute(
            self.inner
                .client
                .get(self.url("/api/dashboard"))
                .bearer_auth(token),
        )
        .await
    }
}

/// Assemble the multipart body for a story create/update.
fn story_form(
    fields: &StoryFields,
    image: Option<ImageUpload>,
    existing_image: Option<&str>,
) -> reqwest::multipart::Form {
    let mut form = reqwest::multipart::Form::new()
        .text("name", fields.name.clone())
        .text("date", fields.date.clone())
        .text("story", fields.story.clone());

    if let Some(image) = image {
        form = form.part(
            "image",
            reqwest::multipart::Part::bytes(image.bytes).file_name(image.file_name),
        );
    } else if let Some(existing) = existing_image {
        form = form.text("existingImage", existing.to_string());
    }

    form
}

/// Assemble the multipart body for a product create/update.
fn product_form(
    fields: &ProductFields,
    combinations: Vec<CombinationUpload>,
) -> reqwest::multipart::Form {
    let mut form = reqwest::multipart::Form::new()
        .text("shortName", fields.short_name.clone())
        .text("fullName", fields.full_name.clone())
        .text("price", fields.price.clone())
        .text("type", fields.kind.clone())
        .text("inStock", fields.in_stock.to_string())
        .text("description", fields.description.clone());

    if let Some(discount) = &fields.discount_price {
        form = form.text("discountPrice", discount.clone());
    }

    for combo in combinations {
        form = form
            .text("dialColors", combo.dial_color)
            .text("bandColors", combo.band_color)
            .part(
                "images",
                reqwest::multipart::Part::bytes(combo.bytes).file_name(combo.file_name),
            );
    }

    form
}

/// Pull a human-readable message out of a backend error body.
fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .unwrap_or_else(|| body.chars().take(200).collect())
}
