//! Admin login and logout.
//!
//! Uses the same backend credential exchange as the storefront, with one
//! extra gate: only profiles carrying the admin role may enter.

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

use samaya_core::Role;

use crate::middleware::{clear_session_auth, set_session_auth};
use crate::models::CurrentAdmin;
use crate::state::AppState;

use super::MessageQuery;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub error: Option<String>,
}

/// Display the login page.
pub async fn login_page(Query(query): Query<MessageQuery>) -> LoginTemplate {
    LoginTemplate { error: query.error }
}

/// Handle login form submission.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let token = match state.api().login(&form.email, &form.password).await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!("Admin login failed: {e}");
            return Redirect::to("/login?error=credentials").into_response();
        }
    };

    let profile = match state.api().me(&token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Profile fetch after admin login failed: {e}");
            return Redirect::to("/login?error=profile_fetch").into_response();
        }
    };

    if profile.role != Role::Admin {
        tracing::warn!(user_id = %profile.id, "Non-admin account attempted admin login");
        return Redirect::to("/login?error=access_denied").into_response();
    }

    let admin = CurrentAdmin::from(profile);
    if let Err(e) = set_session_auth(&session, &token, &admin).await {
        tracing::error!("Failed to set admin session: {e}");
        return Redirect::to("/login?error=session").into_response();
    }

    Redirect::to("/").into_response()
}

/// Handle logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    if let Err(e) = clear_session_auth(&session).await {
        tracing::error!("Failed to clear admin session: {e}");
    }
    Redirect::to("/login").into_response()
}
