use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An announcement on the portal's notice board.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    #[serde(rename = "_id")]
    pub id: String,
    pub title: String,
    pub body: String,
    pub author_id: String,
    pub author_name: String,
    /// Department the notice targets; `None` means the whole hospital.
    pub audience: Option<String>,
    pub pinned: bool,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "opt_chrono_datetime_as_bson_datetime"
    )]
    pub expires_at: Option<DateTime<Utc>>,
    pub archived: bool,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

// Helper module for optional DateTime<Utc> as BSON DateTime
mod opt_chrono_datetime_as_bson_datetime {
    use chrono::{DateTime, Utc};
    use mongodb::bson;
    use serde::{self, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(date: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(dt) => bson::DateTime::from_chrono(*dt).serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let opt: Option<bson::DateTime> = Option::deserialize(deserializer)?;
        Ok(opt.map(|dt| dt.to_chrono()))
    }
}

impl Notice {
    pub fn new(
        title: String,
        body: String,
        author_id: String,
        author_name: String,
        audience: Option<String>,
        pinned: bool,
        expires_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            body,
            author_id,
            author_name,
            audience,
            pinned,
            expires_at,
            archived: false,
            created_at: Utc::now(),
        }
    }

    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        !self.archived && self.expires_at.map_or(true, |at| at > now)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn notice(expires_at: Option<DateTime<Utc>>) -> Notice {
        Notice::new(
            "Fire drill".into(),
            "Thursday 10:00".into(),
            "a1".into(),
            "Admin".into(),
            None,
            false,
            expires_at,
        )
    }

    #[test]
    fn expired_and_archived_notices_are_not_live() {
        let now = Utc::now();
        assert!(notice(None).is_live(now));
        assert!(notice(Some(now + Duration::days(1))).is_live(now));
        assert!(!notice(Some(now - Duration::minutes(1))).is_live(now));

        let mut archived = notice(None);
        archived.archived = true;
        assert!(!archived.is_live(now));
    }

    #[test]
    fn missing_expiry_round_trips_through_bson() {
        let original = notice(None);
        let doc = mongodb::bson::to_document(&original).unwrap();
        assert!(!doc.contains_key("expires_at"));
        let back: Notice = mongodb::bson::from_document(doc).unwrap();
        assert!(back.expires_at.is_none());
    }
}
