//! Admin authentication extractor.
//!
//! Every admin page requires a session whose credential maps to a profile
//! with the admin role. Ordinary accounts are bounced to the login page
//! with an access-denied message; the backend enforces the role again on
//! every privileged endpoint.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use samaya_core::Role;

use crate::models::{CurrentAdmin, session_keys};
use crate::state::AppState;

/// A restored admin authentication pair.
#[derive(Debug, Clone)]
pub struct AdminAuth {
    pub admin: CurrentAdmin,
    pub token: String,
}

/// Extractor that requires a signed-in admin.
pub struct RequireAdminAuth(pub AdminAuth);

/// Rejection: redirect to the login page.
pub struct AdminAuthRejection;

impl IntoResponse for AdminAuthRejection {
    fn into_response(self) -> Response {
        Redirect::to("/login").into_response()
    }
}

impl FromRequestParts<AppState> for RequireAdminAuth {
    type Rejection = AdminAuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AdminAuthRejection)?;

        let token: String = session
            .get(session_keys::AUTH_TOKEN)
            .await
            .ok()
            .flatten()
            .ok_or(AdminAuthRejection)?;

        if let Ok(Some(admin)) = session
            .get::<CurrentAdmin>(session_keys::CURRENT_ADMIN)
            .await
        {
            return Ok(Self(AdminAuth { admin, token }));
        }

        // Re-exchange the credential; drop it silently if rejected or the
        // account lost its admin role.
        match state.api().me(&token).await {
            Ok(profile) if profile.role == Role::Admin => {
                let admin = CurrentAdmin::from(profile);
                if let Err(e) = session.insert(session_keys::CURRENT_ADMIN, &admin).await {
                    tracing::error!("Failed to cache restored admin profile: {e}");
                }
                Ok(Self(AdminAuth { admin, token }))
            }
            _ => {
                let _ = session.flush().await;
                Err(AdminAuthRejection)
            }
        }
    }
}

/// Store the admin authentication pair after login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_session_auth(
    session: &Session,
    token: &str,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::AUTH_TOKEN, token).await?;
    session.insert(session_keys::CURRENT_ADMIN, admin).await
}

/// Clear all authentication state (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_session_auth(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.flush().await
}
