use crate::models::Notice;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct PublishNoticeRequest {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 5000, message = "Body must be 1-5000 characters"))]
    pub body: String,
    /// Department to address; omitted means the whole hospital (admins) or
    /// the author's own department (heads).
    #[validate(length(min = 1, max = 100))]
    pub audience: Option<String>,
    #[serde(default)]
    pub pinned: bool,
    pub expires_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NoticeResponse {
    pub id: String,
    pub title: String,
    pub body: String,
    pub author_name: String,
    pub audience: Option<String>,
    pub pinned: bool,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Notice> for NoticeResponse {
    fn from(n: Notice) -> Self {
        Self {
            id: n.id,
            title: n.title,
            body: n.body,
            author_name: n.author_name,
            audience: n.audience,
            pinned: n.pinned,
            expires_at: n.expires_at,
            created_at: n.created_at,
        }
    }
}
