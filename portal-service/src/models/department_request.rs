use super::{Staff, TrackedRequest};
use crate::workflow::{DepartmentScope, RequestKind, RequestStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A request routed from one department to another (maintenance, IT,
/// laboratory and so on).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DepartmentRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub requester_id: String,
    pub requester_name: String,
    pub sender_department: String,
    pub receiver_department: String,
    pub subject: String,
    pub description: String,
    pub status: RequestStatus,
    pub handled_by: Option<String>,
    pub handled_by_name: Option<String>,
    pub handler_note: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl DepartmentRequest {
    pub fn new(
        requester: &Staff,
        receiver_department: String,
        subject: String,
        description: String,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            requester_id: requester.user_id.clone(),
            requester_name: requester.name.clone(),
            sender_department: requester.department.clone(),
            receiver_department,
            subject,
            description,
            status: RequestStatus::Pending,
            handled_by: None,
            handled_by_name: None,
            handler_note: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TrackedRequest for DepartmentRequest {
    const KIND: RequestKind = RequestKind::Department;
    const COLLECTION: &'static str = "department_requests";

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
        DepartmentScope::Routed {
            sender: &self.sender_department,
            receiver: &self.receiver_department,
        }
    }

    fn title(&self) -> String {
        self.subject.clone()
    }

    fn subtitle(&self) -> String {
        format!("{} -> {}", self.sender_department, self.receiver_department)
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
