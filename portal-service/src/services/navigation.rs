use crate::models::{Staff, StaffRole};
use crate::workflow::RequestKind;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NavEntry {
    pub key: String,
    pub label: String,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<u64>,
}

impl NavEntry {
    fn new(key: &str, label: &str, path: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            path: path.to_string(),
            badge: None,
        }
    }

    fn with_badge(mut self, count: u64) -> Self {
        self.badge = (count > 0).then_some(count);
        self
    }
}

/// Counts the sidebar shows as badges.
#[derive(Debug, Clone, Copy, Default)]
pub struct NavCounts {
    pub unread_notifications: u64,
    pub pending_vacations: u64,
    pub pending_stock: u64,
    pub pending_department: u64,
}

impl NavCounts {
    pub fn pending(&self, kind: RequestKind) -> u64 {
        match kind {
            RequestKind::Vacation => self.pending_vacations,
            RequestKind::Stock => self.pending_stock,
            RequestKind::Department => self.pending_department,
        }
    }
}

/// Boards that are worth a sidebar entry for this actor.
///
/// Heads and admins decide vacation and stock requests; purchasing staff work
/// the stock board; anyone may be on the receiving end of a department
/// request.
pub fn boards_for(staff: &Staff, is_purchasing: bool) -> Vec<RequestKind> {
    let decides = matches!(staff.role, StaffRole::Head | StaffRole::Admin);
    RequestKind::ALL
        .into_iter()
        .filter(|kind| match kind {
            RequestKind::Vacation => decides,
            RequestKind::Stock => decides || is_purchasing,
            RequestKind::Department => true,
        })
        .collect()
}

pub fn build_navigation(staff: &Staff, is_purchasing: bool, counts: &NavCounts) -> Vec<NavEntry> {
    let mut entries = vec![
        NavEntry::new("home", "Home", "/"),
        NavEntry::new("notices", "Notices", "/notices"),
        NavEntry::new("vacations", "My vacations", "/vacations"),
        NavEntry::new("stock", "My stock requests", "/stock-requests"),
        NavEntry::new("department", "Department requests", "/department-requests"),
        NavEntry::new("notifications", "Notifications", "/notifications")
            .with_badge(counts.unread_notifications),
    ];

    for kind in boards_for(staff, is_purchasing) {
        entries.push(
            NavEntry::new(
                &format!("board-{}", kind),
                &format!("{} board", kind.label()),
                &format!("/board/{}", kind),
            )
            .with_badge(counts.pending(kind)),
        );
    }

    entries
}
