//! Contact form route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use crate::api::types::ContactMessage;
use crate::filters;
use crate::state::AppState;

use super::Nav;
use super::cart::MessageQuery;

/// Contact page template.
#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub nav: Nav,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the contact page.
pub async fn show(nav: Nav, Query(query): Query<MessageQuery>) -> ContactTemplate {
    ContactTemplate {
        nav,
        error: query.error,
        success: query.success,
    }
}

/// Contact form data.
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Handle contact form submission (anonymous).
#[instrument(skip(state, form))]
pub async fn submit(State(state): State<AppState>, Form(form): Form<ContactForm>) -> Response {
    if form.name.trim().is_empty()
        || form.email.trim().is_empty()
        || form.message.trim().is_empty()
    {
        return Redirect::to("/contact?error=fields").into_response();
    }

    let message = ContactMessage {
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        message: form.message.trim().to_string(),
    };

    match state.api().submit_contact(&message).await {
        Ok(()) => Redirect::to("/contact?success=sent").into_response(),
        Err(e) => {
            tracing::error!("Contact submission failed: {e}");
            Redirect::to("/contact?error=send_failed").into_response()
        }
    }
}
