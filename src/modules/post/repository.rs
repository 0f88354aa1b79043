use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use log::info;
use thiserror::Error;

use crate::modules::post::model::{FeedPost, LikeStatus, NewPost, Post};
use crate::modules::store::file_store::{FileStore, StoreError};
use crate::modules::store::model::{Document, LikeRecord, PostId, UserId};

#[derive(Error, Debug)]
pub enum PostRepositoryError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StoreError),
}

pub trait PostRepository {
    async fn feed(&self, viewer: UserId, limit: Option<usize>) -> Vec<FeedPost>;
    async fn create(&self, new_post: NewPost) -> Result<Post, PostRepositoryError>;
    async fn toggle_like(&self, post_id: PostId, user_id: UserId) -> Result<LikeStatus, PostRepositoryError>;
}

pub struct PostRepositoryImpl {
    store: Arc<FileStore>,
    latency: Duration,
}

impl PostRepositoryImpl {
    pub fn new(store: Arc<FileStore>) -> Self {
        PostRepositoryImpl { store, latency: Duration::ZERO }
    }

    /// Delays every operation by `latency` to imitate a remote store.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

impl PostRepository for PostRepositoryImpl {

    async fn feed(&self, viewer: UserId, limit: Option<usize>) -> Vec<FeedPost> {
        let document = self.store.read().await;
        self.simulate_latency().await;
        build_feed(&document, viewer, limit)
    }

    async fn create(&self, new_post: NewPost) -> Result<Post, PostRepositoryError> {
        validate_new_post(&new_post)?;
        self.simulate_latency().await;
        let post = self.store.update(|document| {
            let id = document
                .next_post_id()
                .ok_or(StoreError::IdsExhausted(PostId::MAX))?;
            let post = Post {
                id,
                image_url: new_post.image_url,
                title: new_post.title,
                content: new_post.content,
                created_at: Utc::now(),
                user_id: new_post.author_id,
            };
            document.posts.push(post.to_record());
            Ok::<_, PostRepositoryError>(post)
        }).await?;
        info!("Post {} created by user {}", post.id, post.user_id);
        Ok(post)
    }

    async fn toggle_like(&self, post_id: PostId, user_id: UserId) -> Result<LikeStatus, PostRepositoryError> {
        if post_id <= 0 {
            return Err(PostRepositoryError::Validation("Post ID is required".to_string()));
        }
        if user_id <= 0 {
            return Err(PostRepositoryError::Validation("User ID is required".to_string()));
        }
        self.simulate_latency().await;
        let status = self.store.update(|document| {
            let existing = document
                .likes
                .iter()
                .position(|like| like.user_id == user_id && like.post_id == post_id);
            let status = match existing {
                Some(index) => {
                    document.likes.remove(index);
                    LikeStatus::Unliked
                }
                None => {
                    document.likes.push(LikeRecord { user_id, post_id });
                    LikeStatus::Liked
                }
            };
            Ok::<_, PostRepositoryError>(status)
        }).await?;
        info!("User {} toggled like on post {}: {:?}", user_id, post_id, status);
        Ok(status)
    }
}

/// Newest first; posts sharing a timestamp keep their stored order.
pub fn build_feed(document: &Document, viewer: UserId, limit: Option<usize>) -> Vec<FeedPost> {
    let mut feed: Vec<FeedPost> = document
        .posts
        .iter()
        .map(|record| FeedPost::project(document, record, viewer))
        .collect();
    feed.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    if let Some(limit) = limit {
        feed.truncate(limit);
    }
    feed
}

fn validate_new_post(new_post: &NewPost) -> Result<(), PostRepositoryError> {
    let missing: Vec<&str> = [
        ("imageUrl", &new_post.image_url),
        ("title", &new_post.title),
        ("content", &new_post.content),
    ]
    .into_iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name)
    .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(PostRepositoryError::Validation(format!("Missing required post data: {}", missing.join(", "))))
    }
}
