use super::{Staff, TrackedRequest};
use crate::workflow::{DepartmentScope, RequestKind, RequestStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StockPriority {
    Low,
    #[default]
    Normal,
    Urgent,
}

impl std::fmt::Display for StockPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StockPriority::Low => write!(f, "low"),
            StockPriority::Normal => write!(f, "normal"),
            StockPriority::Urgent => write!(f, "urgent"),
        }
    }
}

/// A supply purchase request raised by a department.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockRequest {
    #[serde(rename = "_id")]
    pub id: String,
    pub requester_id: String,
    pub requester_name: String,
    pub department: String,
    pub item: String,
    pub quantity: u32,
    pub unit: Option<String>,
    pub justification: String,
    pub priority: StockPriority,
    pub status: RequestStatus,
    pub handled_by: Option<String>,
    pub handled_by_name: Option<String>,
    pub handler_note: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl StockRequest {
    pub fn new(
        requester: &Staff,
        department: String,
        item: String,
        quantity: u32,
        unit: Option<String>,
        justification: String,
        priority: StockPriority,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            requester_id: requester.user_id.clone(),
            requester_name: requester.name.clone(),
            department,
            item,
            quantity,
            unit,
            justification,
            priority,
            status: RequestStatus::Pending,
            handled_by: None,
            handled_by_name: None,
            handler_note: None,
            created_at: now,
            updated_at: now,
        }
    }
}

impl TrackedRequest for StockRequest {
    const KIND: RequestKind = RequestKind::Stock;
    const COLLECTION: &'static str = "stock_requests";

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
        match &self.unit {
            Some(unit) => format!("{} x {} {}", self.item, self.quantity, unit),
            None => format!("{} x {}", self.item, self.quantity),
        }
    }

    fn subtitle(&self) -> String {
        format!("{} priority, {}", self.priority, self.department)
    }

    fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
