use crate::workflow::{RequestKind, RequestStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A message to the requester written when someone moves their request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    #[serde(rename = "_id")]
    pub id: String,
    pub recipient_id: String,
    pub kind: RequestKind,
    pub request_id: String,
    pub from: RequestStatus,
    pub to: RequestStatus,
    pub message: String,
    pub actor_id: String,
    pub actor_name: String,
    pub read: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl Notification {
    #[allow(clippy::too_many_arguments)]
    pub fn status_changed(
        recipient_id: String,
        kind: RequestKind,
        request_id: String,
        title: &str,
        from: RequestStatus,
        to: RequestStatus,
        actor_id: String,
        actor_name: String,
        note: Option<&str>,
    ) -> Self {
        let mut message = format!(
            "{} moved your {} request \"{}\" from {} to {}",
            actor_name,
            kind,
            title,
            from.label(),
            to.label()
        );
        if let Some(note) = note.filter(|n| !n.trim().is_empty()) {
            message.push_str(": ");
            message.push_str(note.trim());
        }

        Self {
            id: Uuid::new_v4().to_string(),
            recipient_id,
            kind,
            request_id,
            from,
            to,
            message,
            actor_id,
            actor_name,
            read: false,
            created_at: Utc::now(),
        }
    }
}
