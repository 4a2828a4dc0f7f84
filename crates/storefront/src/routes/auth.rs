//! Authentication route handlers.
//!
//! All credential checking happens in the backend; these handlers exchange
//! form input for a bearer token, cache the profile it maps to in the
//! session, and mirror the backend's registration policy client-side so
//! obvious mistakes never cost a round-trip.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::CurrentUser;
use crate::services::session as session_store;
use crate::state::AppState;

use super::Nav;

// =============================================================================
// Form Types
// =============================================================================

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

/// Forgot password form data.
#[derive(Debug, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

/// Reset password form data.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordForm {
    pub password: String,
    pub password_confirm: String,
}

/// Change password form data.
#[derive(Debug, Deserialize)]
pub struct ChangePasswordForm {
    pub current_password: String,
    pub new_password: String,
    pub password_confirm: String,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub nav: Nav,
    pub error: Option<String>,
}

/// Forgot password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/forgot_password.html")]
pub struct ForgotPasswordTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Reset password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/reset_password.html")]
pub struct ResetPasswordTemplate {
    pub nav: Nav,
    pub reset_token: String,
    pub error: Option<String>,
}

/// Change password page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/change_password.html")]
pub struct ChangePasswordTemplate {
    pub nav: Nav,
    pub error: Option<String>,
}

// =============================================================================
// Validation
// =============================================================================

/// Registration policy mirrored from the backend.
///
/// Advisory only - the backend re-validates - but catches the common cases
/// before a network call.
fn validate_registration(form: &RegisterForm) -> std::result::Result<(), &'static str> {
    if form.username.trim().len() < 5 {
        return Err("username");
    }
    if !form.email.ends_with("@gmail.com") {
        return Err("email");
    }
    if form.password.len() < 8 {
        return Err("password_too_short");
    }
    if form.password != form.password_confirm {
        return Err("password_mismatch");
    }
    Ok(())
}

// =============================================================================
// Login / Logout
// =============================================================================

/// Display the login page.
pub async fn login_page(nav: Nav, Query(query): Query<MessageQuery>) -> LoginTemplate {
    LoginTemplate {
        nav,
        error: query.error,
        success: query.success,
    }
}

/// Handle login form submission.
///
/// Exchanges credentials for a bearer token, then the token for a profile;
/// both must succeed before the session is touched.
#[instrument(skip(state, session, form), fields(email = %form.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let token = match state.api().login(&form.email, &form.password).await {
        Ok(token) => token,
        Err(e) => {
            tracing::warn!("Login failed: {e}");
            return Redirect::to("/auth/login?error=credentials").into_response();
        }
    };

    let profile = match state.api().me(&token).await {
        Ok(profile) => profile,
        Err(e) => {
            tracing::warn!("Profile fetch after login failed: {e}");
            return Redirect::to("/auth/login?error=profile_fetch").into_response();
        }
    };

    let user = CurrentUser::from(profile);
    if let Err(e) = session_store::set_identity(&session, &token, &user).await {
        tracing::error!("Failed to set session: {e}");
        return Redirect::to("/auth/login?error=session").into_response();
    }

    session_store::refresh_cart_count(&session, state.api(), &token).await;

    Redirect::to("/").into_response()
}

/// Handle logout.
///
/// Clears the session synchronously; the backend is not called.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Response {
    session_store::logout(&session).await;
    Redirect::to("/").into_response()
}

// =============================================================================
// Registration
// =============================================================================

/// Display the registration page.
pub async fn register_page(nav: Nav, Query(query): Query<MessageQuery>) -> RegisterTemplate {
    RegisterTemplate {
        nav,
        error: query.error,
    }
}

/// Handle registration form submission.
#[instrument(skip(state, form), fields(email = %form.email))]
pub async fn register(State(state): State<AppState>, Form(form): Form<RegisterForm>) -> Response {
    if let Err(code) = validate_registration(&form) {
        return Redirect::to(&format!("/auth/register?error={code}")).into_response();
    }

    match state
        .api()
        .signup(form.username.trim(), &form.email, &form.password)
        .await
    {
        Ok(()) => Redirect::to("/auth/login?success=registered").into_response(),
        Err(e) => {
            tracing::warn!("Registration failed: {e}");
            let error_msg = e.to_string();
            if error_msg.contains("taken") || error_msg.contains("already") {
                Redirect::to("/auth/register?error=email_taken").into_response()
            } else {
                Redirect::to("/auth/register?error=failed").into_response()
            }
        }
    }
}

// =============================================================================
// Password Reset
// =============================================================================

/// Display the forgot password page.
pub async fn forgot_password_page(
    nav: Nav,
    Query(query): Query<MessageQuery>,
) -> ForgotPasswordTemplate {
    ForgotPasswordTemplate {
        nav,
        error: query.error,
        success: query.success,
    }
}

/// Handle forgot password form submission.
///
/// Always reports success to prevent email enumeration.
#[instrument(skip(state, form))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Form(form): Form<ForgotPasswordForm>,
) -> Response {
    if let Err(e) = state.api().forgot_password(form.email.trim()).await {
        tracing::warn!("Password recovery request failed: {e}");
        // Still show success to prevent email enumeration
    }

    Redirect::to("/auth/forgot-password?success=email_sent").into_response()
}

/// Display the reset password page.
///
/// The path token comes from the link in the recovery email.
pub async fn reset_password_page(
    nav: Nav,
    Path(token): Path<String>,
    Query(query): Query<MessageQuery>,
) -> ResetPasswordTemplate {
    ResetPasswordTemplate {
        nav,
        reset_token: token,
        error: query.error,
    }
}

/// Handle reset password form submission.
#[instrument(skip(state, token, form))]
pub async fn reset_password(
    State(state): State<AppState>,
    Path(token): Path<String>,
    Form(form): Form<ResetPasswordForm>,
) -> Response {
    if form.password.len() < 8 {
        return Redirect::to(&format!(
            "/auth/reset-password/{token}?error=password_too_short"
        ))
        .into_response();
    }
    if form.password != form.password_confirm {
        return Redirect::to(&format!(
            "/auth/reset-password/{token}?error=password_mismatch"
        ))
        .into_response();
    }

    match state.api().reset_password(&token, &form.password).await {
        Ok(()) => Redirect::to("/auth/login?success=password_reset").into_response(),
        Err(e) => {
            tracing::warn!("Password reset failed: {e}");
            Redirect::to(&format!("/auth/reset-password/{token}?error=reset_failed"))
                .into_response()
        }
    }
}

// =============================================================================
// Change Password
// =============================================================================

/// Display the change password page.
pub async fn change_password_page(
    nav: Nav,
    RequireAuth(_auth): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> ChangePasswordTemplate {
    ChangePasswordTemplate {
        nav,
        error: query.error,
    }
}

/// Handle change password form submission.
///
/// On success the session is cleared - the old credential may no longer be
/// valid, so the user signs in again.
#[instrument(skip(state, auth, session, form))]
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(auth): RequireAuth,
    session: Session,
    Form(form): Form<ChangePasswordForm>,
) -> Response {
    if form.new_password.len() < 8 {
        return Redirect::to("/auth/change-password?error=password_too_short").into_response();
    }
    if form.new_password != form.password_confirm {
        return Redirect::to("/auth/change-password?error=password_mismatch").into_response();
    }

    match state
        .api()
        .change_password(&auth.token, &form.current_password, &form.new_password)
        .await
    {
        Ok(()) => {
            session_store::logout(&session).await;
            Redirect::to("/auth/login?success=password_changed").into_response()
        }
        Err(e) => {
            tracing::warn!("Password change failed: {e}");
            Redirect::to("/auth/change-password?error=change_failed").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(username: &str, email: &str, password: &str, confirm: &str) -> RegisterForm {
        RegisterForm {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            password_confirm: confirm.to_string(),
        }
    }

    #[test]
    fn test_registration_policy_accepts_valid_input() {
        let result = validate_registration(&form(
            "ashamaya",
            "asha@gmail.com",
            "longenough",
            "longenough",
        ));
        assert!(result.is_ok());
    }

    #[test]
    fn test_registration_policy_rejections() {
        assert_eq!(
            validate_registration(&form("abc", "a@gmail.com", "longenough", "longenough")),
            Err("username")
        );
        assert_eq!(
            validate_registration(&form("ashamaya", "a@yahoo.com", "longenough", "longenough")),
            Err("email")
        );
        assert_eq!(
            validate_registration(&form("ashamaya", "a@gmail.com", "short", "short")),
            Err("password_too_short")
        );
        assert_eq!(
            validate_registration(&form("ashamaya", "a@gmail.com", "longenough", "different1")),
            Err("password_mismatch")
        );
    }
}
