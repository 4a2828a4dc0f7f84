//! Contacts panel: the inbox of storefront contact-form messages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use samaya_core::ContactId;

use crate::components::data_table::{TableColumn, columns};
use crate::error::Result;
use crate::filters;
use crate::middleware::auth::RequireAdminAuth;
use crate::state::AppState;

use super::MessageQuery;

/// Contact row display data.
#[derive(Clone)]
pub struct ContactRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Contacts page template.
#[derive(Template, WebTemplate)]
#[template(path = "contacts/index.html")]
pub struct ContactsTemplate {
    pub admin_name: String,
    pub columns: Vec<TableColumn>,
    pub contacts: Vec<ContactRow>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the contact inbox.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
    Query(query): Query<MessageQuery>,
) -> Result<ContactsTemplate> {
    let messages = state.api().contacts(&auth.token).await?;

    let contacts = messages
        .into_iter()
        .map(|contact| ContactRow {
            id: contact.id.to_string(),
            name: contact.name,
            email: contact.email,
            phone: contact.phone.unwrap_or_else(|| "—".to_string()),
            message: contact.message,
        })
        .collect();

    Ok(ContactsTemplate {
        admin_name: auth.admin.username,
        columns: columns(&[
            ("name", "Name"),
            ("email", "Email"),
            ("phone", "Phone"),
            ("message", "Message"),
            ("actions", "Actions"),
        ]),
        contacts,
        error: query.error,
        success: query.success,
    })
}

/// Delete a contact message.
#[instrument(skip(state, auth), fields(id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
    Path(id): Path<String>,
) -> Response {
    let contact_id = ContactId::new(id);
    match state.api().delete_contact(&auth.token, &contact_id).await {
        Ok(()) => Redirect::to("/contacts?success=deleted").into_response(),
        Err(e) => {
            tracing::error!("Failed to delete contact: {e}");
            Redirect::to("/contacts?error=delete_failed").into_response()
        }
    }
}
