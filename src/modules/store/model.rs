use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use log::warn;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use serde_json::Value;

pub type UserId = i64;
pub type PostId = i64;

/// The whole persisted store. All three collections are required; a file
/// missing any of them is rejected at parse time. Inside a collection,
/// entries that are `null` or do not fit their record are dropped one by one.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Document {
    #[serde(deserialize_with = "lenient_records")]
    pub users: Vec<UserRecord>,
    #[serde(deserialize_with = "lenient_records")]
    pub posts: Vec<PostRecord>,
    #[serde(deserialize_with = "lenient_records")]
    pub likes: Vec<LikeRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserRecord {
    pub id: UserId,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PostRecord {
    pub id: PostId,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_timestamp", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    pub user_id: UserId,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct LikeRecord {
    pub user_id: UserId,
    pub post_id: PostId,
}

impl Document {
    pub fn user(&self, id: UserId) -> Option<&UserRecord> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn like_count(&self, post_id: PostId) -> usize {
        self.likes.iter().filter(|like| like.post_id == post_id).count()
    }

    pub fn is_liked_by(&self, post_id: PostId, user_id: UserId) -> bool {
        self.likes
            .iter()
            .any(|like| like.post_id == post_id && like.user_id == user_id)
    }

    /// Next post id: one past the largest id in use, starting at 1.
    /// `None` once the largest id is `PostId::MAX`.
    pub fn next_post_id(&self) -> Option<PostId> {
        self.posts.iter().map(|post| post.id).max().unwrap_or(0).max(0).checked_add(1)
    }
}

fn lenient_records<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let entries = Vec::<Value>::deserialize(deserializer)?;
    Ok(entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| {
            if entry.is_null() {
                warn!("Skipping null {} at index {}", std::any::type_name::<T>(), index);
                return None;
            }
            match serde_json::from_value(entry) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!("Skipping malformed {} at index {}: {}", std::any::type_name::<T>(), index, e);
                    None
                }
            }
        })
        .collect())
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        Value::Null => Ok(None),
        other => {
            warn!("Ignoring non-text value {}", other);
            Ok(None)
        }
    }
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => {
            let parsed = parse_timestamp(&text);
            if parsed.is_none() {
                warn!("Ignoring unreadable timestamp {:?}", text);
            }
            Ok(parsed)
        }
        Value::Null => Ok(None),
        other => {
            warn!("Ignoring non-text timestamp {}", other);
            Ok(None)
        }
    }
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` taken as UTC, or a
/// bare date taken as UTC midnight.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    DateTime::parse_from_rfc3339(text)
        .map(|timestamp| timestamp.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}
