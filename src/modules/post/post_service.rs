use std::sync::Arc;

use thiserror::Error;

use crate::modules::feed::invalidation::FeedInvalidator;
use crate::modules::post::{
    model::{FeedPost, LikeStatus, NewPost, Post},
    repository::{PostRepository, PostRepositoryError, PostRepositoryImpl},
};
use crate::modules::store::model::{PostId, UserId};
use crate::modules::upload::uploader::{ImageFile, ImageUploader, UploadError};

#[derive(Error, Debug)]
pub enum PostServiceError {
    #[error("Invalid post: {}", .0.join(" "))]
    Invalid(Vec<String>),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Database error: {0}")]
    Database(#[from] PostRepositoryError),
}

/// Raw fields of a post submission. Anything may be missing.
#[derive(Debug, Default)]
pub struct PostForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub image: Option<ImageFile>,
}

pub trait PostService {
    async fn feed(&self, viewer: UserId, limit: Option<usize>) -> Vec<FeedPost>;
    async fn create(&self, form: PostForm, author: UserId) -> Result<Post, PostServiceError>;
    async fn toggle_like(&self, post_id: PostId, viewer: UserId) -> Result<LikeStatus, PostServiceError>;
}

pub struct PostServiceImpl {
    repository: PostRepositoryImpl,
    uploader: Arc<dyn ImageUploader>,
    invalidator: FeedInvalidator,
}

impl PostServiceImpl {
    pub fn new(repository: PostRepositoryImpl, uploader: Arc<dyn ImageUploader>, invalidator: FeedInvalidator) -> Self {
        PostServiceImpl { repository, uploader, invalidator }
    }

    pub fn invalidator(&self) -> &FeedInvalidator {
        &self.invalidator
    }
}

impl PostService for PostServiceImpl {

    async fn feed(&self, viewer: UserId, limit: Option<usize>) -> Vec<FeedPost> {
        self.repository.feed(viewer, limit).await
    }

    async fn create(&self, form: PostForm, author: UserId) -> Result<Post, PostServiceError> {
        let (title, content, image) = validate_form(form)?;
        let image_url = self.uploader.upload(image).await?;
        let post = self.repository.create(NewPost { image_url, title, content, author_id: author }).await?;
        self.invalidator.invalidate();
        Ok(post)
    }

    async fn toggle_like(&self, post_id: PostId, viewer: UserId) -> Result<LikeStatus, PostServiceError> {
        let status = self.repository.toggle_like(post_id, viewer).await?;
        self.invalidator.invalidate();
        Ok(status)
    }
}

fn validate_form(form: PostForm) -> Result<(String, String, ImageFile), PostServiceError> {
    let title = form.title.filter(|title| !title.trim().is_empty());
    let content = form.content.filter(|content| !content.trim().is_empty());
    let image = form.image.filter(|image| !image.bytes.is_empty());
    match (title, content, image) {
        (Some(title), Some(content), Some(image)) => Ok((title, content, image)),
        (title, content, image) => {
            let mut errors = Vec::new();
            if title.is_none() {
                errors.push("Title is required.".to_string());
            }
            if content.is_none() {
                errors.push("Content is required.".to_string());
            }
            if image.is_none() {
                errors.push("Image is required.".to_string());
            }
            Err(PostServiceError::Invalid(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::store::file_store::FileStore;
    use async_trait::async_trait;
    use axum::body::Bytes;
    use tempfile::TempDir;

    struct FixedUploader;

    #[async_trait]
    impl ImageUploader for FixedUploader {
        async fn upload(&self, _: ImageFile) -> Result<String, UploadError> {
            Ok("/uploads/fixed.png".to_string())
        }
    }

    struct BrokenUploader;

    #[async_trait]
    impl ImageUploader for BrokenUploader {
        async fn upload(&self, _: ImageFile) -> Result<String, UploadError> {
            Err(UploadError::UnsupportedType("text/plain".to_string()))
        }
    }

    fn service(dir: &TempDir, uploader: Arc<dyn ImageUploader>) -> PostServiceImpl {
        let store = Arc::new(FileStore::new(dir.path().join("posts.json")));
        PostServiceImpl::new(PostRepositoryImpl::new(store), uploader, FeedInvalidator::new())
    }

    fn full_form() -> PostForm {
        PostForm {
            title: Some("Sunset".to_string()),
            content: Some("Over the harbour".to_string()),
            image: Some(ImageFile {
                file_name: Some("sunset.png".to_string()),
                content_type: Some("image/png".to_string()),
                bytes: Bytes::from_static(b"png"),
            }),
        }
    }

    #[tokio::test]
    async fn collects_every_missing_field() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, Arc::new(FixedUploader));

        let form = PostForm { title: Some("   ".to_string()), ..PostForm::default() };
        let Err(PostServiceError::Invalid(errors)) = service.create(form, 1).await else {
            panic!("expected validation errors");
        };

        assert_eq!(errors, vec!["Title is required.", "Content is required.", "Image is required."]);
        assert_eq!(service.invalidator().revision(), 0);
    }

    #[tokio::test]
    async fn empty_image_counts_as_missing() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, Arc::new(FixedUploader));
        let mut form = full_form();
        if let Some(image) = form.image.as_mut() {
            image.bytes = Bytes::new();
        }

        let result = service.create(form, 1).await;

        assert!(matches!(result, Err(PostServiceError::Invalid(errors)) if errors == vec!["Image is required."]));
    }

    #[tokio::test]
    async fn upload_failure_stores_nothing() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, Arc::new(BrokenUploader));

        let result = service.create(full_form(), 1).await;

        assert!(matches!(result, Err(PostServiceError::Upload(_))));
        assert_eq!(service.feed(2, None).await.len(), 2);
        assert_eq!(service.invalidator().revision(), 0);
    }

    #[tokio::test]
    async fn create_uses_uploaded_url_and_invalidates() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, Arc::new(FixedUploader));

        let post = service.create(full_form(), 1).await.unwrap();

        assert_eq!(post.image_url, "/uploads/fixed.png");
        assert_eq!(post.user_id, 1);
        assert_eq!(service.invalidator().revision(), 1);
        assert_eq!(service.feed(2, Some(1)).await[0].id, post.id);
    }

    #[tokio::test]
    async fn toggle_like_invalidates_only_on_success() {
        let dir = TempDir::new().unwrap();
        let service = service(&dir, Arc::new(FixedUploader));

        assert!(service.toggle_like(0, 2).await.is_err());
        assert_eq!(service.invalidator().revision(), 0);

        assert_eq!(service.toggle_like(1, 2).await.unwrap(), LikeStatus::Liked);
        assert_eq!(service.invalidator().revision(), 1);
    }
}
