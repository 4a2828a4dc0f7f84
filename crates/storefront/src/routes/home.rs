//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

use super::Nav;
use super::products::ProductCardView;

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub nav: Nav,
    pub featured: Vec<ProductCardView>,
}

/// Display the home page with a row of featured watches.
///
/// The catalog fetch is best-effort; a backend outage degrades to an empty
/// featured row rather than a broken home page.
#[instrument(skip(state, nav))]
pub async fn home(State(state): State<AppState>, nav: Nav) -> Result<HomeTemplate> {
    let featured = match state.api().products().await {
        Ok(products) => products
            .iter()
            .filter(|p| p.in_stock)
            .take(4)
            .map(|p| super::products::ProductCardView::build(p, state.api(), false))
            .collect(),
        Err(e) => {
            tracing::warn!("Failed to load featured products: {e}");
            Vec::new()
        }
    };

    Ok(HomeTemplate { nav, featured })
}
