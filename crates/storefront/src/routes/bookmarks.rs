//! Bookmark route handlers.
//!
//! Bookmarks are a server-side many-to-many relation toggled through a
//! single endpoint: add when absent, remove when present.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use samaya_core::ProductId;

use crate::api::types::BookmarkToggle;
use crate::error::Result;
use crate::filters;
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::state::AppState;

use super::Nav;
use super::cart::MessageQuery;
use super::products::ProductCardView;

/// Bookmarks page template.
#[derive(Template, WebTemplate)]
#[template(path = "bookmarks/index.html")]
pub struct BookmarksTemplate {
    pub nav: Nav,
    pub products: Vec<ProductCardView>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display the user's bookmarked products.
#[instrument(skip(state, nav, auth))]
pub async fn index(
    State(state): State<AppState>,
    nav: Nav,
    RequireAuth(auth): RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<BookmarksTemplate> {
    let bookmarked = state.api().bookmarks(&auth.token).await?;

    let products = bookmarked
        .iter()
        .map(|p| ProductCardView::build(p, state.api(), true))
        .collect();

    Ok(BookmarksTemplate {
        nav,
        products,
        error: query.error,
        success: query.success,
    })
}

/// Toggle form data.
#[derive(Debug, Deserialize)]
pub struct ToggleForm {
    pub product_id: String,
    /// Where to send the user back to.
    pub next: Option<String>,
}

/// Toggle a bookmark and send the user back where they came from.
///
/// Anonymous users are redirected to login instead of failing silently.
#[instrument(skip(state, auth, form))]
pub async fn toggle(
    State(state): State<AppState>,
    OptionalAuth(auth): OptionalAuth,
    Form(form): Form<ToggleForm>,
) -> Response {
    let Some(auth) = auth else {
        return Redirect::to("/auth/login?error=login_required").into_response();
    };

    let product_id = ProductId::new(form.product_id);
    let target = form
        .next
        .as_deref()
        .filter(|n| n.starts_with('/') && !n.starts_with("//"))
        .unwrap_or("/products");
    let separator = if target.contains('?') { '&' } else { '?' };

    match state.api().toggle_bookmark(&auth.token, &product_id).await {
        Ok(BookmarkToggle::Added) => {
            Redirect::to(&format!("{target}{separator}success=bookmarked")).into_response()
        }
        Ok(BookmarkToggle::Removed) => {
            Redirect::to(&format!("{target}{separator}success=unbookmarked")).into_response()
        }
        Err(e) => {
            tracing::error!("Bookmark toggle failed: {e}");
            Redirect::to(&format!("{target}{separator}error=bookmark_failed")).into_response()
        }
    }
}
