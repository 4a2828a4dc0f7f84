//! Stories page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use tracing::instrument;

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

use super::Nav;

/// Story display data.
#[derive(Clone)]
pub struct StoryView {
    pub name: String,
    pub date: String,
    pub story: String,
    pub image_url: String,
}

/// Stories page template.
#[derive(Template, WebTemplate)]
#[template(path = "stories.html")]
pub struct StoriesTemplate {
    pub nav: Nav,
    pub stories: Vec<StoryView>,
}

/// Display the published stories.
#[instrument(skip(state, nav))]
pub async fn index(State(state): State<AppState>, nav: Nav) -> Result<StoriesTemplate> {
    let stories = state
        .api()
        .stories()
        .await?
        .into_iter()
        .map(|story| StoryView {
            name: story.name,
            date: story.date,
            story: story.story,
            image_url: story
                .image
                .as_deref()
                .map(|path| state.api().image_url(path))
                .unwrap_or_default(),
        })
        .collect();

    Ok(StoriesTemplate { nav, stories })
}
