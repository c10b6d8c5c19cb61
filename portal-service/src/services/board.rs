//! Kanban board: column assembly and the guarded status move.

use super::database::{PortalDb, StatusChange};
use super::metrics::{record_denied_transition, record_transition};
use super::notifier::{BoardEvent, BoardEvents, Notifier};
use crate::models::{Notification, Staff, TrackedRequest};
use crate::workflow::{Policy, RequestKind, RequestStatus, TransitionError};
use chrono::{DateTime, Utc};
use portal_core::error::AppError;
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub struct Board {
    pub kind: RequestKind,
    pub columns: Vec<BoardColumn>,
}

#[derive(Debug, Serialize)]
pub struct BoardColumn {
    pub status: RequestStatus,
    pub label: &'static str,
    /// Every visible request in this status, including cards past the board cap.
    pub count: u64,
    pub cards: Vec<BoardCard>,
}

#[derive(Debug, Serialize)]
pub struct BoardCard {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub requester_name: String,
    pub department: String,
    pub status: RequestStatus,
    pub updated_at: DateTime<Utc>,
}

impl BoardCard {
    fn from_request<T: TrackedRequest>(item: &T) -> Self {
        Self {
            id: item.id().to_string(),
            title: item.title(),
            subtitle: item.subtitle(),
            requester_name: item.requester_name().to_string(),
            department: item.department().to_string(),
            status: item.status(),
            updated_at: item.updated_at(),
        }
    }
}

/// A requested move of one card.
#[derive(Debug, Clone)]
pub struct CardMove {
    pub to: RequestStatus,
    /// Status the caller's board showed; a mismatch means the view is stale.
    pub expected_status: Option<RequestStatus>,
    pub note: Option<String>,
}

#[derive(Debug)]
pub struct MoveOutcome<T> {
    pub item: T,
    /// False when the card was already in the target column.
    pub changed: bool,
}

#[derive(Clone)]
pub struct BoardService {
    db: PortalDb,
    policy: Policy,
    notifier: Arc<dyn Notifier>,
    events: BoardEvents,
}

impl BoardService {
    pub fn new(
        db: PortalDb,
        policy: Policy,
        notifier: Arc<dyn Notifier>,
        events: BoardEvents,
    ) -> Self {
        Self {
            db,
            policy,
            notifier,
            events,
        }
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn events(&self) -> &BoardEvents {
        &self.events
    }

    pub async fn board<T: TrackedRequest>(&self, actor: &Staff) -> Result<Board, AppError> {
        let filter = self.policy.visibility_filter(actor, T::KIND);
        let items: Vec<T> = self.db.board_requests(filter.clone()).await?;
        let mut board = assemble_board(T::KIND, &items);

        for column in &mut board.columns {
            let mut in_column = filter.clone();
            in_column.insert("status", column.status.as_str());
            column.count = self.db.count_requests::<T>(in_column).await?;
        }
        Ok(board)
    }

    /// Load a request the actor is allowed to see; anything else is 404.
    pub async fn visible_request<T: TrackedRequest>(
        &self,
        actor: &Staff,
        id: &str,
    ) -> Result<T, AppError> {
        self.db
            .find_request::<T>(id)
            .await?
            .filter(|item| self.policy.can_view(actor, &item.policy_ref()))
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("{} request not found", T::KIND)))
    }

    pub async fn move_card<T: TrackedRequest>(
        &self,
        actor: &Staff,
        id: &str,
        card_move: &CardMove,
    ) -> Result<MoveOutcome<T>, AppError> {
        let kind = T::KIND;
        if !kind.allows(card_move.to) {
            let err = TransitionError::UnknownStatus {
                kind,
                status: card_move.to,
            };
            record_denied_transition(kind, err.reason());
            return Err(err.into());
        }

        let current: T = self.visible_request(actor, id).await?;
        let from = current.status();

        if let Some(expected) = card_move.expected_status {
            if expected != from {
                let err = TransitionError::Stale {
                    expected,
                    actual: from,
                };
                record_denied_transition(kind, err.reason());
                return Err(err.into());
            }
        }

        if from == card_move.to {
            return Ok(MoveOutcome {
                item: current,
                changed: false,
            });
        }

        if let Err(err) = self
            .policy
            .check_transition(actor, &current.policy_ref(), from, card_move.to)
        {
            tracing::info!(
                kind = %kind,
                request_id = %id,
                actor_id = %actor.user_id,
                from = %from,
                to = %card_move.to,
                reason = err.reason(),
                "Status transition refused"
            );
            record_denied_transition(kind, err.reason());
            return Err(err.into());
        }

        let note = card_move
            .note
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty());
        let change = StatusChange {
            from,
            to: card_move.to,
            actor_id: &actor.user_id,
            actor_name: &actor.name,
            note,
        };

        let updated: T = match self.db.compare_and_set_status(id, &change).await? {
            Some(updated) => updated,
            None => {
                let actual = self
                    .db
                    .find_request::<T>(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("{} request not found", kind)))?
                    .status();
                let err = TransitionError::Stale {
                    expected: from,
                    actual,
                };
                record_denied_transition(kind, err.reason());
                return Err(err.into());
            }
        };

        record_transition(kind, card_move.to);
        tracing::info!(
            kind = %kind,
            request_id = %id,
            actor_id = %actor.user_id,
            from = %from,
            to = %card_move.to,
            "Status transition applied"
        );

        if updated.requester_id() != actor.user_id {
            let notification = Notification::status_changed(
                updated.requester_id().to_string(),
                kind,
                id.to_string(),
                &updated.title(),
                from,
                card_move.to,
                actor.user_id.clone(),
                actor.name.clone(),
                note,
            );
            if let Err(e) = self.notifier.notify(&notification).await {
                tracing::warn!(
                    kind = %kind,
                    request_id = %id,
                    "Failed to write status notification: {}",
                    e
                );
            }
        }

        self.events.publish(BoardEvent {
            kind,
            id: id.to_string(),
            from,
            to: card_move.to,
            actor_id: actor.user_id.clone(),
            actor_name: actor.name.clone(),
            at: updated.updated_at(),
            requester_id: updated.requester_id().to_string(),
            scope: updated.scope().into(),
        });

        Ok(MoveOutcome {
            item: updated,
            changed: true,
        })
    }
}

/// Group items into the kind's columns, preserving input order per column.
pub fn assemble_board<T: TrackedRequest>(kind: RequestKind, items: &[T]) -> Board {
    let mut columns: Vec<BoardColumn> = kind
        .statuses()
        .iter()
        .map(|&status| BoardColumn {
            status,
            label: status.label(),
            count: 0,
            cards: Vec::new(),
        })
        .collect();

    for item in items {
        match columns.iter_mut().find(|c| c.status == item.status()) {
            Some(column) => {
                column.cards.push(BoardCard::from_request(item));
                column.count += 1;
            }
            None => tracing::warn!(
                kind = %kind,
                request_id = %item.id(),
                status = %item.status(),
                "Request has a status outside its board; skipped"
            ),
        }
    }

    Board { kind, columns }
}
