//! Backend REST API client for the admin panel.
//!
//! The admin binary consumes the backend's privileged endpoints: the full
//! bookings ledger, order state transitions, user management, contact
//! inbox, story publishing, and product CRUD with image uploads. The
//! backend enforces the admin role on every call; the bearer credential
//! belongs to the signed-in admin.

mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when calling the backend service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The bearer credential was missing, expired, or lacks the admin role.
    #[error("Unauthorized")]
    Unauthorized,
}
