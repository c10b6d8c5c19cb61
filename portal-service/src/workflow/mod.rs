//! Status-board rules: fixed status sets per request kind, the allowed flow
//! between them, and the role/department checks gating each move.

pub mod policy;
pub mod status;

pub use policy::{DepartmentScope, Policy, RequestRef};
pub use status::{RequestKind, RequestStatus};

use portal_core::error::AppError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransitionError {
    #[error("Status '{status}' does not exist for {kind} requests")]
    UnknownStatus {
        kind: RequestKind,
        status: RequestStatus,
    },

    #[error("A {kind} request cannot move from {from} to {to}")]
    NotAllowed {
        kind: RequestKind,
        from: RequestStatus,
        to: RequestStatus,
    },

    #[error("Request is {actual}, not {expected}; reload the board")]
    Stale {
        expected: RequestStatus,
        actual: RequestStatus,
    },

    #[error("Forbidden transition: {0}")]
    Denied(String),
}

impl TransitionError {
    /// Label used on the denied-transition counter.
    pub fn reason(&self) -> &'static str {
        match self {
            TransitionError::UnknownStatus { .. } => "unknown_status",
            TransitionError::NotAllowed { .. } => "flow",
            TransitionError::Stale { .. } => "stale",
            TransitionError::Denied(_) => "permission",
        }
    }
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        match err {
            TransitionError::UnknownStatus { .. } => AppError::BadRequest(anyhow::Error::new(err)),
            TransitionError::NotAllowed { .. } | TransitionError::Stale { .. } => {
                AppError::Conflict(anyhow::Error::new(err))
            }
            TransitionError::Denied(_) => AppError::Forbidden(anyhow::Error::new(err)),
        }
    }
}
