use super::database::PortalDb;
use crate::models::Notification;
use crate::workflow::{DepartmentScope, RequestKind, RequestRef, RequestStatus};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use portal_core::error::AppError;
use serde::Serialize;
use tokio::sync::broadcast;

/// Delivery of status-change notifications to requesters.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, notification: &Notification) -> Result<(), AppError>;
}

/// Writes notifications into the `notifications` collection, where the
/// recipient's inbox reads them.
pub struct MongoNotifier {
    db: PortalDb,
}

impl MongoNotifier {
    pub fn new(db: PortalDb) -> Self {
        Self { db }
    }
}

#[async_trait]
impl Notifier for MongoNotifier {
    async fn notify(&self, notification: &Notification) -> Result<(), AppError> {
        self.db.insert_notification(notification).await?;
        tracing::debug!(
            notification_id = %notification.id,
            recipient_id = %notification.recipient_id,
            "Notification stored"
        );
        Ok(())
    }
}

/// A card moved on one of the boards.
#[derive(Debug, Clone, Serialize)]
pub struct BoardEvent {
    pub kind: RequestKind,
    pub id: String,
    pub from: RequestStatus,
    pub to: RequestStatus,
    pub actor_id: String,
    pub actor_name: String,
    pub at: DateTime<Utc>,
    #[serde(skip)]
    pub requester_id: String,
    #[serde(skip)]
    pub scope: OwnedScope,
}

/// Owned copy of a request's departmental fields, kept on events so
/// subscribers can be filtered after the request itself is gone.
#[derive(Debug, Clone)]
pub enum OwnedScope {
    Owned { department: String },
    Routed { sender: String, receiver: String },
}

impl From<DepartmentScope<'_>> for OwnedScope {
    fn from(scope: DepartmentScope<'_>) -> Self {
        match scope {
            DepartmentScope::Owned { department } => OwnedScope::Owned {
                department: department.to_string(),
            },
            DepartmentScope::Routed { sender, receiver } => OwnedScope::Routed {
                sender: sender.to_string(),
                receiver: receiver.to_string(),
            },
        }
    }
}

impl BoardEvent {
    pub fn policy_ref(&self) -> RequestRef<'_> {
        let scope = match &self.scope {
            OwnedScope::Owned { department } => DepartmentScope::Owned { department },
            OwnedScope::Routed { sender, receiver } => DepartmentScope::Routed { sender, receiver },
        };
        RequestRef {
            kind: self.kind,
            requester_id: &self.requester_id,
            scope,
        }
    }
}

/// In-process fan-out of board events to live subscribers.
#[derive(Clone)]
pub struct BoardEvents {
    sender: broadcast::Sender<BoardEvent>,
}

impl BoardEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn publish(&self, event: BoardEvent) {
        // No subscribers is not an error.
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<BoardEvent> {
        self.sender.subscribe()
    }
}
