//! Who may see a request and who may move it between statuses.

use super::status::{RequestKind, RequestStatus};
use super::TransitionError;
use crate::models::Staff;
use mongodb::bson::{doc, Document};

/// Departmental fields of a request that drive permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepartmentScope<'a> {
    /// Vacation and stock requests belong to the requester's department.
    Owned { department: &'a str },
    /// Department requests travel from one department to another.
    Routed { sender: &'a str, receiver: &'a str },
}

/// The parts of a stored request the policy looks at.
#[derive(Debug, Clone, Copy)]
pub struct RequestRef<'a> {
    pub kind: RequestKind,
    pub requester_id: &'a str,
    pub scope: DepartmentScope<'a>,
}

#[derive(Debug, Clone)]
pub struct Policy {
    purchasing_department: String,
}

impl Policy {
    pub fn new(purchasing_department: impl Into<String>) -> Self {
        Self {
            purchasing_department: purchasing_department.into().trim().to_string(),
        }
    }

    pub fn purchasing_department(&self) -> &str {
        &self.purchasing_department
    }

    pub fn is_purchasing(&self, actor: &Staff) -> bool {
        actor.belongs_to(&self.purchasing_department)
    }

    pub fn can_view(&self, actor: &Staff, item: &RequestRef<'_>) -> bool {
        if actor.is_admin() || actor.user_id == item.requester_id {
            return true;
        }
        match item.scope {
            DepartmentScope::Owned { department } => {
                actor.heads(department)
                    || (item.kind == RequestKind::Stock && self.is_purchasing(actor))
            }
            DepartmentScope::Routed { sender, receiver } => {
                actor.belongs_to(receiver) || actor.heads(sender)
            }
        }
    }

    /// MongoDB filter selecting exactly the documents `can_view` accepts.
    pub fn visibility_filter(&self, actor: &Staff, kind: RequestKind) -> Document {
        if actor.is_admin() {
            return doc! {};
        }
        let own = doc! { "requester_id": &actor.user_id };
        match kind {
            RequestKind::Vacation | RequestKind::Stock => {
                if kind == RequestKind::Stock && self.is_purchasing(actor) {
                    return doc! {};
                }
                match actor.role {
                    crate::models::StaffRole::Head => doc! {
                        "$or": [own, { "department": &actor.department }]
                    },
                    _ => own,
                }
            }
            RequestKind::Department => {
                let mut clauses = vec![own, doc! { "receiver_department": &actor.department }];
                if actor.role == crate::models::StaffRole::Head {
                    clauses.push(doc! { "sender_department": &actor.department });
                }
                doc! { "$or": clauses }
            }
        }
    }

    /// Full transition check: status set, flow edge, then permission.
    pub fn check_transition(
        &self,
        actor: &Staff,
        item: &RequestRef<'_>,
        from: RequestStatus,
        to: RequestStatus,
    ) -> Result<(), TransitionError> {
        let kind = item.kind;
        if !kind.allows(to) {
            return Err(TransitionError::UnknownStatus { kind, status: to });
        }
        if !kind.can_flow(from, to) {
            return Err(TransitionError::NotAllowed { kind, from, to });
        }
        if actor.is_admin() {
            return Ok(());
        }
        if to.is_decision() && actor.user_id == item.requester_id {
            return Err(TransitionError::Denied(
                "You cannot decide on your own request".to_string(),
            ));
        }

        let permitted = match (kind, item.scope) {
            (RequestKind::Vacation, DepartmentScope::Owned { department }) => {
                actor.heads(department)
            }
            (RequestKind::Stock, DepartmentScope::Owned { department }) => match to {
                RequestStatus::Ordered | RequestStatus::Delivered => self.is_purchasing(actor),
                _ => actor.heads(department),
            },
            (RequestKind::Department, DepartmentScope::Routed { receiver, .. }) => match to {
                RequestStatus::Rejected => actor.heads(receiver),
                _ => actor.belongs_to(receiver),
            },
            _ => false,
        };

        if permitted {
            Ok(())
        } else {
            Err(TransitionError::Denied(denial_reason(kind, to, &item.scope, self)))
        }
    }
}

fn denial_reason(
    kind: RequestKind,
    to: RequestStatus,
    scope: &DepartmentScope<'_>,
    policy: &Policy,
) -> String {
    match (kind, scope) {
        (RequestKind::Stock, _) if matches!(to, RequestStatus::Ordered | RequestStatus::Delivered) => {
            format!(
                "Only members of {} can mark stock as {}",
                policy.purchasing_department,
                to.label().to_lowercase()
            )
        }
        (_, DepartmentScope::Owned { department }) => {
            format!("Only the head of {} can move this request", department)
        }
        (_, DepartmentScope::Routed { receiver, .. }) if to == RequestStatus::Rejected => {
            format!("Only the head of {} can reject this request", receiver)
        }
        (_, DepartmentScope::Routed { receiver, .. }) => {
            format!("Only members of {} can work on this request", receiver)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StaffRole;
    use RequestStatus::*;

    fn policy() -> Policy {
        Policy::new("Purchasing")
    }

    fn vacation<'a>(requester: &'a str, department: &'a str) -> RequestRef<'a> {
        RequestRef {
            kind: RequestKind::Vacation,
            requester_id: requester,
            scope: DepartmentScope::Owned { department },
        }
    }

    fn stock<'a>(requester: &'a str, department: &'a str) -> RequestRef<'a> {
        RequestRef {
            kind: RequestKind::Stock,
            requester_id: requester,
            scope: DepartmentScope::Owned { department },
        }
    }

    fn routed<'a>(requester: &'a str, sender: &'a str, receiver: &'a str) -> RequestRef<'a> {
        RequestRef {
            kind: RequestKind::Department,
            requester_id: requester,
            scope: DepartmentScope::Routed { sender, receiver },
        }
    }

    #[test]
    fn head_of_department_approves_vacation() {
        let head = Staff::new("h1", "Head", StaffRole::Head, "Nursing");
        let item = vacation("n1", "Nursing");
        assert!(policy().check_transition(&head, &item, Pending, Approved).is_ok());
    }

    #[test]
    fn head_of_other_department_cannot_approve_vacation() {
        let head = Staff::new("h2", "Head", StaffRole::Head, "Radiology");
        let item = vacation("n1", "Nursing");
        let err = policy()
            .check_transition(&head, &item, Pending, Approved)
            .unwrap_err();
        assert!(matches!(err, TransitionError::Denied(_)));
    }

    #[test]
    fn staff_cannot_approve_even_in_their_department() {
        let nurse = Staff::new("n2", "Nurse", StaffRole::Staff, "Nursing");
        let item = vacation("n1", "Nursing");
        assert!(policy().check_transition(&nurse, &item, Pending, Rejected).is_err());
    }

    #[test]
    fn head_cannot_decide_own_request() {
        let head = Staff::new("h1", "Head", StaffRole::Head, "Nursing");
        let item = vacation("h1", "Nursing");
        let err = policy()
            .check_transition(&head, &item, Pending, Approved)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Forbidden transition: You cannot decide on your own request"
        );
    }

    #[test]
    fn admin_can_decide_anything_allowed_by_flow() {
        let admin = Staff::new("a1", "Admin", StaffRole::Admin, "Direction");
        let item = stock("a1", "Direction");
        assert!(policy().check_transition(&admin, &item, Pending, Approved).is_ok());
        let err = policy()
            .check_transition(&admin, &item, Pending, Delivered)
            .unwrap_err();
        assert!(matches!(err, TransitionError::NotAllowed { .. }));
    }

    #[test]
    fn purchasing_places_orders_but_heads_do_not() {
        let buyer = Staff::new("b1", "Buyer", StaffRole::Staff, "Purchasing");
        let head = Staff::new("h1", "Head", StaffRole::Head, "Nursing");
        let item = stock("n1", "Nursing");
        assert!(policy().check_transition(&buyer, &item, Approved, Ordered).is_ok());
        assert!(policy().check_transition(&buyer, &item, Ordered, Delivered).is_ok());
        assert!(policy().check_transition(&head, &item, Approved, Ordered).is_err());
        assert!(policy().check_transition(&buyer, &item, Pending, Approved).is_err());
    }

    #[test]
    fn receiver_department_works_routed_requests() {
        let tech = Staff::new("t1", "Tech", StaffRole::Staff, "Maintenance");
        let item = routed("n1", "Nursing", "Maintenance");
        assert!(policy().check_transition(&tech, &item, Pending, InProgress).is_ok());
        assert!(policy().check_transition(&tech, &item, InProgress, Completed).is_ok());
        assert!(policy().check_transition(&tech, &item, Pending, Rejected).is_err());

        let head = Staff::new("t2", "Chief", StaffRole::Head, "Maintenance");
        assert!(policy().check_transition(&head, &item, Pending, Rejected).is_ok());
    }

    #[test]
    fn sender_department_cannot_work_its_own_routed_request() {
        let head = Staff::new("h1", "Head", StaffRole::Head, "Nursing");
        let item = routed("n1", "Nursing", "Maintenance");
        assert!(policy().check_transition(&head, &item, Pending, InProgress).is_err());
    }

    #[test]
    fn status_outside_kind_is_reported_before_flow() {
        let admin = Staff::new("a1", "Admin", StaffRole::Admin, "Direction");
        let item = vacation("n1", "Nursing");
        let err = policy()
            .check_transition(&admin, &item, Pending, Ordered)
            .unwrap_err();
        assert!(matches!(err, TransitionError::UnknownStatus { .. }));
    }

    #[test]
    fn visibility_rules() {
        let p = policy();
        let nurse = Staff::new("n2", "Nurse", StaffRole::Staff, "Nursing");
        let head = Staff::new("h1", "Head", StaffRole::Head, "Nursing");
        let buyer = Staff::new("b1", "Buyer", StaffRole::Staff, "Purchasing");

        assert!(!p.can_view(&nurse, &vacation("n1", "Nursing")));
        assert!(p.can_view(&nurse, &vacation("n2", "Nursing")));
        assert!(p.can_view(&head, &vacation("n1", "Nursing")));
        assert!(!p.can_view(&buyer, &vacation("n1", "Nursing")));
        assert!(p.can_view(&buyer, &stock("n1", "Nursing")));

        let inbound = routed("x1", "Radiology", "Nursing");
        let outbound = routed("x2", "Nursing", "Radiology");
        assert!(p.can_view(&nurse, &inbound));
        assert!(!p.can_view(&nurse, &outbound));
        assert!(p.can_view(&head, &outbound));
    }

    #[test]
    fn visibility_filters_match_roles() {
        let p = policy();
        let admin = Staff::new("a1", "Admin", StaffRole::Admin, "Direction");
        let nurse = Staff::new("n2", "Nurse", StaffRole::Staff, "Nursing");
        let head = Staff::new("h1", "Head", StaffRole::Head, "Nursing");
        let buyer = Staff::new("b1", "Buyer", StaffRole::Staff, "Purchasing");

        assert!(p.visibility_filter(&admin, RequestKind::Vacation).is_empty());
        assert!(p.visibility_filter(&buyer, RequestKind::Stock).is_empty());
        assert_eq!(
            p.visibility_filter(&nurse, RequestKind::Vacation),
            doc! { "requester_id": "n2" }
        );
        assert_eq!(
            p.visibility_filter(&head, RequestKind::Stock),
            doc! { "$or": [{ "requester_id": "h1" }, { "department": "Nursing" }] }
        );
        assert_eq!(
            p.visibility_filter(&head, RequestKind::Department),
            doc! { "$or": [
                { "requester_id": "h1" },
                { "receiver_department": "Nursing" },
                { "sender_department": "Nursing" },
            ] }
        );
    }
}
