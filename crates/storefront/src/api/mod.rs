//! Backend REST API client.
//!
//! # Architecture
//!
//! - The backend is the source of truth - NO local persistence, direct API
//!   calls per request
//! - JSON over HTTP; authenticated endpoints carry a bearer credential
//! - Wire types live in [`types`]; routes convert them to view structs
//!
//! # Example
//!
//! ```rust,ignore
//! use samaya_storefront::api::ApiClient;
//!
//! let api = ApiClient::new(&config.api);
//!
//! // Browse the catalog
//! let products = api.products().await?;
//!
//! // Add the default variant to the cart
//! let token = api.login("user@gmail.com", "hunter2-long").await?;
//! api.create_booking(&token, &new_booking).await?;
//! ```

mod client;
pub mod types;

pub use client::ApiClient;
pub use types::*;

use thiserror::Error;

/// Errors that can occur when calling the backend service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP transport failed (connection refused, timeout, ...).
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

    /// The bearer credential was missing, expired, or rejected.
    #[error("Unauthorized")]
    Unauthorized,
}

impl ApiError {
    /// Whether the failure means the stored credential is no longer valid.
    #[must_use]
    pub const fn is_auth_failure(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product p1".to_string());
        assert_eq!(err.to_string(), "Not found: product p1");

        let err = ApiError::Status {
            status: reqwest::StatusCode::BAD_REQUEST,
            message: "quantity out of range".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Backend returned 400 Bad Request: quantity out of range"
        );
    }

    #[test]
    fn test_auth_failure_discrimination() {
        assert!(ApiError::Unauthorized.is_auth_failure());
        assert!(!ApiError::NotFound("x".to_string()).is_auth_failure());
    }
}
