//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Home page
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /products               - Product listing with filters
//! GET  /products/{id}          - Product detail
//! POST /products/{id}/reviews  - Create or update own review
//! POST /products/{id}/reviews/{review_id}/delete - Delete review
//!
//! # Cart & checkout
//! GET  /cart                   - Cart page with shipping form
//! POST /cart/add               - Add a product to the cart
//! POST /cart/quantity          - Local quantity edit (not persisted)
//! POST /cart/cancel            - Cancel one cart line
//! POST /cart/checkout          - Cash-on-delivery submission
//! POST /cart/esewa             - Gateway submission (renders handoff form)
//!
//! # Payment return
//! GET  /payment/success        - Gateway success redirect target
//! GET  /payment/failure        - Gateway failure redirect target
//!
//! # Bookmarks & orders
//! GET  /bookmarks              - Bookmarked products
//! POST /bookmarks/toggle       - Toggle a bookmark
//! GET  /orders                 - Order history
//! POST /orders/cancel          - Cancel a pending order (24h window)
//!
//! # Auth
//! GET/POST /auth/login         - Login
//! GET/POST /auth/register      - Registration
//! POST /auth/logout            - Logout
//! GET/POST /auth/forgot-password - Request reset email
//! GET/POST /auth/reset-password/{token} - Complete reset
//! GET/POST /auth/change-password - Change password (requires auth)
//!
//! # Misc
//! GET/POST /account            - Profile edit (requires auth)
//! GET/POST /contact            - Contact form
//! GET  /stories                - Stories page
//! ```

pub mod account;
pub mod auth;
pub mod bookmarks;
pub mod cart;
pub mod contact;
pub mod home;
pub mod orders;
pub mod payment;
pub mod products;
pub mod stories;

use axum::{
    Router,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
};

use crate::middleware::OptionalAuth;
use crate::models::CurrentUser;
use crate::services;
use crate::state::AppState;

/// Shared navigation context rendered by the base template: who is logged
/// in and the cart badge count.
pub struct Nav {
    pub user: Option<CurrentUser>,
    pub cart_count: u32,
}

impl FromRequestParts<AppState> for Nav {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let OptionalAuth(auth) = OptionalAuth::from_request_parts(parts, state).await?;

        let cart_count = match parts.extensions.get::<tower_sessions::Session>() {
            Some(session) if auth.is_some() => services::session::cart_count(session).await,
            _ => 0,
        };

        Ok(Self {
            user: auth.map(|a| a.user),
            cart_count,
        })
    }
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
        .route(
            "/forgot-password",
            get(auth::forgot_password_page).post(auth::forgot_password),
        )
        .route(
            "/reset-password/{token}",
            get(auth::reset_password_page).post(auth::reset_password),
        )
        .route(
            "/change-password",
            get(auth::change_password_page).post(auth::change_password),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
        .route("/{id}/reviews", post(products::submit_review))
        .route(
            "/{id}/reviews/{review_id}/delete",
            post(products::delete_review),
        )
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/quantity", post(cart::quantity))
        .route("/cancel", post(cart::cancel))
        .route("/checkout", post(cart::checkout_cod))
        .route("/esewa", post(cart::checkout_esewa))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Catalog
        .nest("/products", product_routes())
        // Cart & checkout
        .nest("/cart", cart_routes())
        // Payment return pages
        .route("/payment/success", get(payment::success))
        .route("/payment/failure", get(payment::failure))
        // Bookmarks
        .route("/bookmarks", get(bookmarks::index))
        .route("/bookmarks/toggle", post(bookmarks::toggle))
        // Order history
        .route("/orders", get(orders::index))
        .route("/orders/cancel", post(orders::cancel))
        // Account
        .route("/account", get(account::show).post(account::update))
        // Contact
        .route("/contact", get(contact::show).post(contact::submit))
        // Stories
        .route("/stories", get(stories::index))
        // Auth routes
        .nest("/auth", auth_routes())
}
