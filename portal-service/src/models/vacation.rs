use super::{Staff, TrackedRequest};
use crate::workflow::{DepartmentScope, RequestKind, RequestStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VacationRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub requester_id: String,
    pub requester_name: String,
    pub department: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
    pub status: RequestStatus,
    pub handled_by: Option<String>,
    pub handled_by_name: Option<String>,
    pub handler_note: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl VacationRequest {
    pub fn new(
        requester: &Staff,
        department: String,
        start_date: NaiveDate,
        end_date: NaiveDate,
        reason: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            requester_id: requester.user_id.clone(),
            requester_name: requester.name.clone(),
            department,
            start_date,
            end_date,
            reason,
            status: RequestStatus::Pending,
            handled_by: None,
            handled_by_name: None,
            handler_note: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Calendar days covered, both ends included.
    pub fn days(&self) -> i64 {
        inclusive_days(self.start_date, self.end_date)
    }
}

pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

impl TrackedRequest for VacationRequest {
    const KIND: RequestKind = RequestKind::Vacation;
    const COLLECTION: &'static str = "vacations";

    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> RequestStatus {
        self.status
    }

    fn requester_id(&self) -> &str {
        &self.requester_id
    }

    fn requester_name(&self) -> &str {
        &self.requester_name
    }

    fn scope(&self) -> DepartmentScope<'_> {
        DepartmentScope::Owned {
            department: &self.department,
        }
    }

    fn title(&self) -> String {
        format!("{} ({} days)", self.requester_name, self.days())
    }

    fn subtitle(&self) -> String {
        format!("{} to {}", self.start_date, self.end_date)
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
