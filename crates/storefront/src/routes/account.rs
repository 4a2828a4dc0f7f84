//! Account profile route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

use super::Nav;
use super::cart::MessageQuery;

/// Profile page template.
#[derive(Template, WebTemplate)]
#[template(path = "account/profile.html")]
pub struct ProfileTemplate {
    pub nav: Nav,
    pub username: String,
    pub email: String,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the profile edit form.
#[instrument(skip(nav, auth))]
pub async fn show(
    nav: Nav,
    RequireAuth(auth): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> ProfileTemplate {
    ProfileTemplate {
        nav,
        username: auth.user.username,
        email: auth.user.email,
        error: query.error,
        success: query.success,
    }
}

/// Profile edit form data.
#[derive(Debug, Deserialize)]
pub struct ProfileForm {
    pub username: String,
    pub email: String,
}

/// Handle profile edit submission.
///
/// The session cache is refreshed from the backend's response so the navbar
/// shows the new name immediately.
#[instrument(skip(state, auth, session, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    session: Session,
    Form(form): Form<ProfileForm>,
) -> Response {
    if form.username.trim().len() < 5 {
        return Redirect::to("/account?error=username").into_response();
    }
    if !form.email.ends_with("@gmail.com") {
        return Redirect::to("/account?error=email").into_response();
    }

    match state
        .api()
        .update_me(&auth.token, form.username.trim(), &form.email)
        .await
    {
        Ok(profile) => {
            let user = CurrentUser::from(profile);
            if let Err(e) = session.insert(session_keys::CURRENT_USER, &user).await {
                tracing::error!("Failed to refresh cached profile: {e}");
            }
            Redirect::to("/account?success=updated").into_response()
        }
        Err(e) => {
            tracing::error!("Profile update failed: {e}");
            Redirect::to("/account?error=update_failed").into_response()
        }
    }
}
