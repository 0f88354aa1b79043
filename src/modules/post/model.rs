use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::modules::store::model::{Document, PostId, PostRecord, UserId};

pub const FALLBACK_IMAGE: &str = "/sample-post1.jpg";
pub const FALLBACK_TITLE: &str = "Untitled Post";
pub const FALLBACK_CONTENT: &str = "No content available";
pub const FALLBACK_FIRST_NAME: &str = "Unknown";
pub const FALLBACK_LAST_NAME: &str = "User";

/// A stored post as returned to the author after creation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: PostId,
    pub image_url: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
}

#[derive(Debug, Clone)]
pub struct NewPost {
    pub image_url: String,
    pub title: String,
    pub content: String,
    pub author_id: UserId,
}

/// Post joined with its author's name and like data, as seen by one viewer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeedPost {
    pub id: PostId,
    pub image: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub user_first_name: String,
    pub user_last_name: String,
    pub likes: usize,
    pub is_liked: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LikeStatus {
    Liked,
    Unliked,
}

impl LikeStatus {
    pub fn is_liked(self) -> bool {
        self == LikeStatus::Liked
    }
}

impl Post {
    pub fn to_record(&self) -> PostRecord {
        PostRecord {
            id: self.id,
            image_url: Some(self.image_url.clone()),
            title: Some(self.title.clone()),
            content: Some(self.content.clone()),
            created_at: Some(self.created_at),
            user_id: self.user_id,
        }
    }
}

impl FeedPost {
    /// Projects a stored post for `viewer`, substituting placeholders for
    /// anything the record or its author is missing.
    pub fn project(document: &Document, record: &PostRecord, viewer: UserId) -> Self {
        let author = document.user(record.user_id);
        FeedPost {
            id: record.id,
            image: non_blank(&record.image_url).unwrap_or(FALLBACK_IMAGE).to_string(),
            title: non_blank(&record.title).unwrap_or(FALLBACK_TITLE).to_string(),
            content: non_blank(&record.content).unwrap_or(FALLBACK_CONTENT).to_string(),
            created_at: record.created_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH),
            user_first_name: author
                .and_then(|user| non_blank(&user.first_name))
                .unwrap_or(FALLBACK_FIRST_NAME)
                .to_string(),
            user_last_name: author
                .and_then(|user| non_blank(&user.last_name))
                .unwrap_or(FALLBACK_LAST_NAME)
                .to_string(),
            likes: document.like_count(record.id),
            is_liked: document.is_liked_by(record.id, viewer),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|text| !text.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::store::model::{LikeRecord, UserRecord};

    fn bare_post(id: PostId, user_id: UserId) -> PostRecord {
        PostRecord { id, image_url: None, title: None, content: None, created_at: None, user_id }
    }

    #[test]
    fn dangling_author_gets_placeholder_name() {
        let document = Document {
            users: vec![],
            posts: vec![bare_post(1, 42)],
            likes: vec![],
        };

        let feed_post = FeedPost::project(&document, &document.posts[0], 2);

        assert_eq!(feed_post.user_first_name, "Unknown");
        assert_eq!(feed_post.user_last_name, "User");
        assert_eq!(feed_post.image, FALLBACK_IMAGE);
        assert_eq!(feed_post.title, FALLBACK_TITLE);
        assert_eq!(feed_post.content, FALLBACK_CONTENT);
        assert_eq!(feed_post.created_at, DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn projects_author_and_like_data() {
        let document = Document {
            users: vec![UserRecord {
                id: 1,
                first_name: Some("Ada".to_string()),
                last_name: Some("Lovelace".to_string()),
                email: None,
            }],
            posts: vec![bare_post(5, 1)],
            likes: vec![
                LikeRecord { user_id: 1, post_id: 5 },
                LikeRecord { user_id: 3, post_id: 5 },
            ],
        };

        let for_three = FeedPost::project(&document, &document.posts[0], 3);
        let for_two = FeedPost::project(&document, &document.posts[0], 2);

        assert_eq!(for_three.user_first_name, "Ada");
        assert_eq!(for_three.likes, 2);
        assert!(for_three.is_liked);
        assert!(!for_two.is_liked);
    }

    #[test]
    fn feed_post_serializes_camel_case() {
        let document = Document { users: vec![], posts: vec![bare_post(1, 1)], likes: vec![] };
        let json = serde_json::to_value(FeedPost::project(&document, &document.posts[0], 1)).unwrap();

        assert!(json.get("isLiked").is_some());
        assert!(json.get("userFirstName").is_some());
        assert!(json.get("createdAt").is_some());
    }
}
