//! Status sets and status flow for each kind of request.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    Vacation,
    Stock,
    Department,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Approved,
    Rejected,
    Ordered,
    Delivered,
    InProgress,
    Completed,
}

use RequestStatus::*;

const VACATION_COLUMNS: &[RequestStatus] = &[Pending, Approved, Rejected];
const STOCK_COLUMNS: &[RequestStatus] = &[Pending, Approved, Ordered, Delivered, Rejected];
const DEPARTMENT_COLUMNS: &[RequestStatus] = &[Pending, InProgress, Completed, Rejected];

impl RequestKind {
    pub const ALL: [RequestKind; 3] = [
        RequestKind::Vacation,
        RequestKind::Stock,
        RequestKind::Department,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::Vacation => "vacation",
            RequestKind::Stock => "stock",
            RequestKind::Department => "department",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RequestKind::Vacation => "Vacation requests",
            RequestKind::Stock => "Stock requests",
            RequestKind::Department => "Department requests",
        }
    }

    /// Board columns, left to right.
    pub fn statuses(&self) -> &'static [RequestStatus] {
        match self {
            RequestKind::Vacation => VACATION_COLUMNS,
            RequestKind::Stock => STOCK_COLUMNS,
            RequestKind::Department => DEPARTMENT_COLUMNS,
        }
    }

    pub fn allows(&self, status: RequestStatus) -> bool {
        self.statuses().contains(&status)
    }

    /// Whether `from -> to` is an edge of this kind's status flow.
    pub fn can_flow(&self, from: RequestStatus, to: RequestStatus) -> bool {
        if !self.allows(from) || !self.allows(to) {
            return false;
        }
        match self {
            RequestKind::Vacation => matches!(
                (from, to),
                (Pending, Approved)
                    | (Pending, Rejected)
                    | (Approved, Pending)
                    | (Approved, Rejected)
                    | (Rejected, Pending)
            ),
            RequestKind::Stock => matches!(
                (from, to),
                (Pending, Approved)
                    | (Pending, Rejected)
                    | (Approved, Ordered)
                    | (Approved, Rejected)
                    | (Approved, Pending)
                    | (Ordered, Delivered)
                    | (Rejected, Pending)
            ),
            RequestKind::Department => matches!(
                (from, to),
                (Pending, InProgress)
                    | (Pending, Rejected)
                    | (InProgress, Completed)
                    | (InProgress, Pending)
                    | (Completed, InProgress)
                    | (Rejected, Pending)
            ),
        }
    }
}

impl std::fmt::Display for RequestKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "vacation" | "vacations" => Ok(RequestKind::Vacation),
            "stock" | "stock-requests" => Ok(RequestKind::Stock),
            "department" | "department-requests" => Ok(RequestKind::Department),
            other => Err(anyhow::anyhow!("Unknown request kind '{}'", other)),
        }
    }
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pending => "pending",
            Approved => "approved",
            Rejected => "rejected",
            Ordered => "ordered",
            Delivered => "delivered",
            InProgress => "in_progress",
            Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Pending => "Pending",
            Approved => "Approved",
            Rejected => "Rejected",
            Ordered => "Ordered",
            Delivered => "Delivered",
            InProgress => "In progress",
            Completed => "Completed",
        }
    }

    /// Approving or rejecting is a decision and needs a role check.
    pub fn is_decision(&self) -> bool {
        matches!(self, Approved | Rejected)
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Pending),
            "approved" => Ok(Approved),
            "rejected" => Ok(Rejected),
            "ordered" => Ok(Ordered),
            "delivered" => Ok(Delivered),
            "in_progress" => Ok(InProgress),
            "completed" => Ok(Completed),
            other => Err(anyhow::anyhow!("Unknown status '{}'", other)),
        }
    }
}
