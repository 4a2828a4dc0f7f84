//! Users panel: account listing, creation, and deletion.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use samaya_core::{Role, UserId};

use crate::api::types::NewUser;
use crate::components::data_table::{TableColumn, columns};
use crate::error::Result;
use crate::filters;
use crate::middleware::auth::RequireAdminAuth;
use crate::state::AppState;

use super::MessageQuery;

/// User row display data.
#[derive(Clone)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub role: String,
}

/// Users page template.
#[derive(Template, WebTemplate)]
#[template(path = "users/index.html")]
pub struct UsersTemplate {
    pub admin_name: String,
    pub columns: Vec<TableColumn>,
    pub users: Vec<UserRow>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display all registered accounts.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
    Query(query): Query<MessageQuery>,
) -> Result<UsersTemplate> {
    let accounts = state.api().users(&auth.token).await?;

    let users = accounts
        .into_iter()
        .map(|account| UserRow {
            id: account.id.to_string(),
            username: account.username,
            email: account.email,
            phone: account.phone.unwrap_or_else(|| "—".to_string()),
            role: match account.role {
                Role::Admin => "admin".to_string(),
                Role::User => "user".to_string(),
            },
        })
        .collect();

    Ok(UsersTemplate {
        admin_name: auth.admin.username,
        columns: columns(&[
            ("username", "Username"),
            ("email", "Email"),
            ("phone", "Phone"),
            ("role", "Role"),
            ("actions", "Actions"),
        ]),
        users,
        error: query.error,
        success: query.success,
    })
}

/// New user form data.
#[derive(Debug, Deserialize)]
pub struct NewUserForm {
    pub username: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    pub role: String,
}

/// Create an account.
#[instrument(skip(state, auth, form), fields(email = %form.email))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
    Form(form): Form<NewUserForm>,
) -> Response {
    if form.username.trim().is_empty() || form.email.trim().is_empty() || form.password.is_empty()
    {
        return Redirect::to("/users?error=fields").into_response();
    }

    let user = NewUser {
        username: form.username.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        password: form.password,
        role: if form.role == "admin" {
            Role::Admin
        } else {
            Role::User
        },
    };

    match state.api().create_user(&auth.token, &user).await {
        Ok(()) => Redirect::to("/users?success=created").into_response(),
        Err(e) => {
            tracing::error!("Failed to create user: {e}");
            Redirect::to("/users?error=create_failed").into_response()
        }
    }
}

/// Delete an account.
#[instrument(skip(state, auth), fields(id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
    Path(id): Path<String>,
) -> Response {
    let user_id = UserId::new(id);
    match state.api().delete_user(&auth.token, &user_id).await {
        Ok(()) => Redirect::to("/users?success=deleted").into_response(),
        Err(e) => {
            tracing::error!("Failed to delete user: {e}");
            Redirect::to("/users?error=delete_failed").into_response()
        }
    }
}
