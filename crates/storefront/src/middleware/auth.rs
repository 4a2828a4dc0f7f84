//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a logged-in user in route handlers.
//! The session persists the bearer credential; the profile it maps to is
//! restored lazily on the first request that needs it (an expired credential
//! is dropped without a user-visible error).

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use crate::models::{CurrentUser, session_keys};
use crate::services;
use crate::state::AppState;

/// A restored authentication pair: who is logged in, and the credential to
/// attach to backend calls on their behalf.
#[derive(Debug, Clone)]
pub struct SessionAuth {
    pub user: CurrentUser,
    pub token: String,
}

/// Extractor that requires a logged-in user.
///
/// If nobody is logged in, returns a redirect to the login page.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(auth): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", auth.user.username)
/// }
/// ```
pub struct RequireAuth(pub SessionAuth);

/// Error returned when authentication is required but nobody is logged in.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin,
    /// Unauthorized response (for fragment requests).
    Unauthorized,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin => Redirect::to("/auth/login").into_response(),
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let OptionalAuth(auth) = OptionalAuth::from_request_parts(parts, state)
            .await
            .map_err(|_| AuthRejection::Unauthorized)?;

        auth.map(Self).ok_or(AuthRejection::RedirectToLogin)
    }
}

/// Extractor that optionally restores the current user.
///
/// Unlike `RequireAuth`, this does not reject the request when nobody is
/// logged in.
pub struct OptionalAuth(pub Option<SessionAuth>);

impl FromRequestParts<AppState> for OptionalAuth {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let Some(session) = parts.extensions.get::<Session>() else {
            return Ok(Self(None));
        };

        Ok(Self(services::session::restore(session, state.api()).await))
    }
}

/// Helper to store the authentication pair in the session after login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_session_auth(
    session: &Session,
    token: &str,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::AUTH_TOKEN, token).await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear all authentication state from the session (logout).
///
/// Purely local: the backend is never called.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_session_auth(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
