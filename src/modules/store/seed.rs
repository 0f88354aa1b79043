use chrono::{DateTime, Duration, Utc};

use crate::modules::store::model::{Document, LikeRecord, PostRecord, UserRecord};

/// Sample data written the first time the store file is created.
pub fn sample_document(now: DateTime<Utc>) -> Document {
    Document {
        users: vec![
            user(1, "John", "Doe", "john@example.com"),
            user(2, "Max", "Schwarz", "max@example.com"),
        ],
        posts: vec![
            PostRecord {
                id: 1,
                image_url: Some("/sample-post1.jpg".to_string()),
                title: Some("Sample Post 1".to_string()),
                content: Some("This is a sample post content for demonstration purposes.".to_string()),
                created_at: Some(now),
                user_id: 1,
            },
            PostRecord {
                id: 2,
                image_url: Some("/sample-post2.jpg".to_string()),
                title: Some("Sample Post 2".to_string()),
                content: Some("Another sample post to show how the application works.".to_string()),
                created_at: Some(now - Duration::days(1)),
                user_id: 2,
            },
        ],
        likes: vec![LikeRecord { user_id: 2, post_id: 2 }],
    }
}

fn user(id: i64, first_name: &str, last_name: &str, email: &str) -> UserRecord {
    UserRecord {
        id,
        first_name: Some(first_name.to_string()),
        last_name: Some(last_name.to_string()),
        email: Some(email.to_string()),
    }
}
