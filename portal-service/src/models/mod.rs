pub mod department_request;
pub mod notice;
pub mod notification;
pub mod staff;
pub mod stock_request;
pub mod vacation;

pub use department_request::DepartmentRequest;
pub use notice::Notice;
pub use notification::Notification;
pub use staff::{normalize_department, Staff, StaffRole};
pub use stock_request::{StockPriority, StockRequest};
pub use vacation::VacationRequest;

use crate::workflow::{DepartmentScope, RequestKind, RequestRef, RequestStatus};
use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// A request that lives on the status board.
///
/// Every implementor is a flat document with a string `_id`, a `status`
/// field, and the `handled_by*` fields the board writes on each move.
pub trait TrackedRequest:
    Serialize + DeserializeOwned + Clone + Send + Sync + Unpin + 'static
{
    const KIND: RequestKind;
    const COLLECTION: &'static str;

    fn id(&self) -> &str;
    fn status(&self) -> RequestStatus;
    fn requester_id(&self) -> &str;
    fn requester_name(&self) -> &str;
    fn scope(&self) -> DepartmentScope<'_>;
    /// Headline shown on the board card.
    fn title(&self) -> String;
    fn subtitle(&self) -> String;
    fn updated_at(&self) -> DateTime<Utc>;

    fn policy_ref(&self) -> RequestRef<'_> {
        RequestRef {
            kind: Self::KIND,
            requester_id: self.requester_id(),
            scope: self.scope(),
        }
    }

    /// Department shown on the card: owner, or receiver for routed requests.
    fn department(&self) -> &str {
        match self.scope() {
            DepartmentScope::Owned { department } => department,
            DepartmentScope::Routed { receiver, .. } => receiver,
        }
    }
}
