//! HTTP route handlers for the admin panel.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Dashboard (analytics)
//! GET  /health                  - Health check
//!
//! GET/POST /login               - Admin login
//! POST /logout                  - Logout
//!
//! GET  /orders                  - All bookings
//! POST /orders/{id}/approve     - Approve a pending order
//! POST /orders/{id}/cancel      - Cancel a pending order
//! POST /orders/{id}/delete      - Delete an order
//!
//! GET  /products                - Product management
//! POST /products                - Create product (multipart)
//! POST /products/{id}           - Update product (multipart)
//! POST /products/{id}/delete    - Delete product
//!
//! GET  /users                   - User management
//! POST /users                   - Create user
//! POST /users/{id}/delete       - Delete user
//!
//! GET  /contacts                - Contact inbox
//! POST /contacts/{id}/delete    - Delete contact message
//!
//! GET  /stories                 - Story management
//! POST /stories                 - Create story (multipart)
//! POST /stories/{id}            - Update story (multipart)
//! POST /stories/{id}/delete     - Delete story
//! ```

pub mod auth;
pub mod contacts;
pub mod dashboard;
pub mod orders;
pub mod products;
pub mod stories;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::show))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        // Orders
        .route("/orders", get(orders::index))
        .route("/orders/{id}/approve", post(orders::approve))
        .route("/orders/{id}/cancel", post(orders::cancel))
        .route("/orders/{id}/delete", post(orders::delete))
        // Products
        .route("/products", get(products::index).post(products::create))
        .route("/products/{id}", post(products::update))
        .route("/products/{id}/delete", post(products::delete))
        // Users
        .route("/users", get(users::index).post(users::create))
        .route("/users/{id}/delete", post(users::delete))
        // Contacts
        .route("/contacts", get(contacts::index))
        .route("/contacts/{id}/delete", post(contacts::delete))
        // Stories
        .route("/stories", get(stories::index).post(stories::create))
        .route("/stories/{id}", post(stories::update))
        .route("/stories/{id}/delete", post(stories::delete))
}

/// Shared message query parameters.
#[derive(Debug, serde::Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}
