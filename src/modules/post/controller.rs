use std::sync::Arc;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State, multipart::MultipartError, rejection::QueryRejection},
    http::StatusCode,
};
use log::{error, warn};
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::error::AppError;
use crate::modules::post::{
    model::{FeedPost, Post},
    post_service::{PostForm, PostService, PostServiceError},
    repository::PostRepositoryError,
};
use crate::modules::store::model::PostId;
use crate::modules::upload::uploader::ImageFile;

pub const UPLOAD_FAILED: &str = "Image upload failed, post was not created. Please try again later.";
pub const SAVE_FAILED: &str = "Failed to save post. Please try again later.";
pub const LIKE_FAILED: &str = "Failed to update like status. Please try again later.";
pub const INVALID_FEED_QUERY: &str = "Feed limit must be a non-negative whole number.";

#[derive(Deserialize)]
pub struct FeedQuery {
    pub limit: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LikeToggleResponse {
    pub post_id: PostId,
    pub is_liked: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct RevisionResponse {
    pub revision: u64,
}

pub async fn get_feed(
    State(state): State<Arc<AppState>>,
    query: Result<Query<FeedQuery>, QueryRejection>,
) -> Result<Json<Vec<FeedPost>>, AppError> {
    let Query(query) = query.map_err(|rejection| {
        warn!("Rejected feed query: {}", rejection.body_text());
        AppError::BadRequest(vec![INVALID_FEED_QUERY.to_string()])
    })?;
    Ok(Json(state.posts.feed(state.config.viewer_user_id, query.limit).await))
}

pub async fn get_feed_revision(State(state): State<Arc<AppState>>) -> Json<RevisionResponse> {
    Json(RevisionResponse { revision: state.posts.invalidator().revision() })
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Post>), AppError> {
    let form = read_post_form(multipart).await?;
    match state.posts.create(form, state.config.author_user_id).await {
        Ok(post) => Ok((StatusCode::CREATED, Json(post))),
        Err(PostServiceError::Invalid(errors)) => Err(AppError::BadRequest(errors)),
        Err(PostServiceError::Database(PostRepositoryError::Validation(message))) => {
            Err(AppError::BadRequest(vec![message]))
        }
        Err(PostServiceError::Upload(e)) => {
            error!("Image upload error: {:?}", e);
            Err(AppError::Upstream(UPLOAD_FAILED.to_string()))
        }
        Err(e) => {
            error!("Store post error: {:?}", e);
            Err(AppError::Internal(SAVE_FAILED.to_string()))
        }
    }
}

pub async fn toggle_like(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<PostId>,
) -> Result<Json<LikeToggleResponse>, AppError> {
    match state.posts.toggle_like(post_id, state.config.viewer_user_id).await {
        Ok(status) => Ok(Json(LikeToggleResponse { post_id, is_liked: status.is_liked() })),
        Err(PostServiceError::Database(PostRepositoryError::Validation(message))) => {
            Err(AppError::BadRequest(vec![message]))
        }
        Err(e) => {
            error!("Toggle like error: {:?}", e);
            Err(AppError::Internal(LIKE_FAILED.to_string()))
        }
    }
}

async fn read_post_form(mut multipart: Multipart) -> Result<PostForm, AppError> {
    let mut form = PostForm::default();
    while let Some(field) = multipart.next_field().await.map_err(malformed)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("title") => form.title = Some(field.text().await.map_err(malformed)?),
            Some("content") => form.content = Some(field.text().await.map_err(malformed)?),
            Some("image") => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(malformed)?;
                form.image = Some(ImageFile { file_name, content_type, bytes });
            }
            _ => {}
        }
    }
    Ok(form)
}

fn malformed(e: MultipartError) -> AppError {
    warn!("Malformed post form: {}", e);
    AppError::BadRequest(vec!["Malformed form data.".to_string()])
}
