//! Stories panel: create, update, and delete published stories.
//!
//! Story submissions are multipart because they carry the hero image; an
//! update without a new image keeps the existing one.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Multipart, Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::instrument;

use samaya_core::StoryId;

use crate::api::types::{ImageUpload, StoryFields};
use crate::error::Result;
use crate::filters;
use crate::middleware::auth::RequireAdminAuth;
use crate::state::AppState;

use super::MessageQuery;

/// Story row display data.
#[derive(Clone)]
pub struct StoryRow {
    pub id: String,
    pub name: String,
    pub date: String,
    pub story: String,
    pub image_url: String,
    pub image_path: String,
}

/// Stories page template.
#[derive(Template, WebTemplate)]
#[template(path = "stories/index.html")]
pub struct StoriesTemplate {
    pub admin_name: String,
    pub stories: Vec<StoryRow>,
    pub error: Option<String>,
    pub success: Option<String>,
}

/// Display all stories with the create form.
#[instrument(skip(state, auth))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
    Query(query): Query<MessageQuery>,
) -> Result<StoriesTemplate> {
    let stories = state
        .api()
        .stories()
        .await?
        .into_iter()
        .map(|story| StoryRow {
            id: story.id.to_string(),
            name: story.name,
            date: story.date,
            story: story.story,
            image_url: story
                .image
                .as_deref()
                .map(|path| state.api().image_url(path))
                .unwrap_or_default(),
            image_path: story.image.unwrap_or_default(),
        })
        .collect();

    Ok(StoriesTemplate {
        admin_name: auth.admin.username,
        stories,
        error: query.error,
        success: query.success,
    })
}

/// A parsed story submission.
struct StorySubmission {
    fields: StoryFields,
    image: Option<ImageUpload>,
    existing_image: Option<String>,
}

/// Read a story submission out of a multipart body.
async fn read_submission(mut multipart: Multipart) -> Option<StorySubmission> {
    let mut name = String::new();
    let mut date = String::new();
    let mut story = String::new();
    let mut image = None;
    let mut existing_image = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        let field_name = field.name().unwrap_or_default().to_string();
        match field_name.as_str() {
            "name" => name = field.text().await.ok()?,
            "date" => date = field.text().await.ok()?,
            "story" => story = field.text().await.ok()?,
            "existing_image" => existing_image = field.text().await.ok(),
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await.ok()?;
                if !file_name.is_empty() && !bytes.is_empty() {
                    image = Some(ImageUpload {
                        file_name,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Some(StorySubmission {
        fields: StoryFields { name, date, story },
        image,
        existing_image: existing_image.filter(|path| !path.is_empty()),
    })
}

/// Create a story.
#[instrument(skip(state, auth, multipart))]
pub async fn create(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
    multipart: Multipart,
) -> Response {
    let Some(submission) = read_submission(multipart).await else {
        return Redirect::to("/stories?error=fields").into_response();
    };

    if submission.fields.name.is_empty()
        || submission.fields.date.is_empty()
        || submission.fields.story.is_empty()
    {
        return Redirect::to("/stories?error=fields").into_response();
    }

    let Some(image) = submission.image else {
        return Redirect::to("/stories?error=image").into_response();
    };

    match state
        .api()
        .create_story(&auth.token, &submission.fields, image)
        .await
    {
        Ok(()) => Redirect::to("/stories?success=created").into_response(),
        Err(e) => {
            tracing::error!("Failed to create story: {e}");
            Redirect::to("/stories?error=create_failed").into_response()
        }
    }
}

/// Update a story; the existing image is kept when no new file is uploaded.
#[instrument(skip(state, auth, multipart), fields(id = %id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
    Path(id): Path<String>,
    multipart: Multipart,
) -> Response {
    let story_id = StoryId::new(id);

    let Some(submission) = read_submission(multipart).await else {
        return Redirect::to("/stories?error=fields").into_response();
    };

    if submission.fields.name.is_empty()
        || submission.fields.date.is_empty()
        || submission.fields.story.is_empty()
    {
        return Redirect::to("/stories?error=fields").into_response();
    }

    match state
        .api()
        .update_story(
            &auth.token,
            &story_id,
            &submission.fields,
            submission.image,
            submission.existing_image.as_deref(),
        )
        .await
    {
        Ok(()) => Redirect::to("/stories?success=updated").into_response(),
        Err(e) => {
            tracing::error!("Failed to update story: {e}");
            Redirect::to("/stories?error=update_failed").into_response()
        }
    }
}

/// Delete a story.
#[instrument(skip(state, auth), fields(id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdminAuth(auth): RequireAdminAuth,
    Path(id): Path<String>,
) -> Response {
    let story_id = StoryId::new(id);
    match state.api().delete_story(&auth.token, &story_id).await {
        Ok(()) => Redirect::to("/stories?success=deleted").into_response(),
        Err(e) => {
            tracing::error!("Failed to delete story: {e}");
            Redirect::to("/stories?error=delete_failed").into_response()
        }
    }
}
