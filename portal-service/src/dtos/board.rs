use crate::services::CardMove;
use crate::workflow::RequestStatus;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct MoveCardRequest {
    pub to: RequestStatus,
    /// Status the client's board showed before the drag.
    pub expected_status: Option<RequestStatus>,
    #[validate(length(max = 1000, message = "Note must be at most 1000 characters"))]
    pub note: Option<String>,
}

impl From<MoveCardRequest> for CardMove {
    fn from(req: MoveCardRequest) -> Self {
        Self {
            to: req.to,
            expected_status: req.expected_status,
            note: req.note,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MoveCardResponse<T> {
    pub changed: bool,
    pub request: T,
}
