use crate::dtos::{
    DepartmentRequestResponse, MoveCardRequest, MoveCardResponse, StockRequestResponse,
    VacationResponse,
};
use crate::middleware::CurrentStaff;
use crate::models::{DepartmentRequest, Staff, StockRequest, TrackedRequest, VacationRequest};
use crate::services::{Board, BoardEvent, CardMove};
use crate::startup::AppState;
use crate::workflow::{Policy, RequestKind};
use axum::{
    extract::{Path, Query, State},
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    Json,
};
use futures::Stream;
use portal_core::error::AppError;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use tokio::sync::broadcast;
use tokio_stream::wrappers::{errors::BroadcastStreamRecvError, BroadcastStream};
use tokio_stream::StreamExt;
use validator::Validate;

fn parse_kind(raw: &str) -> Result<RequestKind, AppError> {
    raw.parse().map_err(AppError::NotFound)
}

pub async fn get_board(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
    Path(kind): Path<String>,
) -> Result<Json<Board>, AppError> {
    let board = match parse_kind(&kind)? {
        RequestKind::Vacation => state.board.board::<VacationRequest>(&actor).await?,
        RequestKind::Stock => state.board.board::<StockRequest>(&actor).await?,
        RequestKind::Department => state.board.board::<DepartmentRequest>(&actor).await?,
    };
    Ok(Json(board))
}

async fn move_and_respond<T, R>(
    state: &AppState,
    actor: &Staff,
    id: &str,
    card_move: &CardMove,
) -> Result<Response, AppError>
where
    T: TrackedRequest,
    R: From<T> + Serialize,
{
    let outcome = state.board.move_card::<T>(actor, id, card_move).await?;
    Ok(Json(MoveCardResponse {
        changed: outcome.changed,
        request: R::from(outcome.item),
    })
    .into_response())
}

/// Drop a card into another column.
pub async fn move_card(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
    Path((kind, id)): Path<(String, String)>,
    Json(payload): Json<MoveCardRequest>,
) -> Result<Response, AppError> {
    payload.validate()?;
    let card_move = CardMove::from(payload);

    match parse_kind(&kind)? {
        RequestKind::Vacation => {
            move_and_respond::<VacationRequest, VacationResponse>(&state, &actor, &id, &card_move)
                .await
        }
        RequestKind::Stock => {
            move_and_respond::<StockRequest, StockRequestResponse>(&state, &actor, &id, &card_move)
                .await
        }
        RequestKind::Department => {
            move_and_respond::<DepartmentRequest, DepartmentRequestResponse>(
                &state, &actor, &id, &card_move,
            )
            .await
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct BoardEventParams {
    /// Restrict the feed to one board.
    pub kind: Option<String>,
}

/// One item of a subscriber's change feed.
#[derive(Debug)]
pub enum FeedItem {
    Change(BoardEvent),
    /// The subscriber fell behind and this many changes were dropped.
    Lagged(u64),
}

impl FeedItem {
    fn into_event(self) -> Option<Event> {
        match self {
            FeedItem::Change(change) => {
                match Event::default().event("status_changed").json_data(&change) {
                    Ok(event) => Some(event),
                    Err(e) => {
                        tracing::warn!("Failed to encode board event: {}", e);
                        None
                    }
                }
            }
            FeedItem::Lagged(skipped) => {
                Some(Event::default().event("lagged").data(skipped.to_string()))
            }
        }
    }
}

/// Changes from `receiver` that `actor` may see, optionally restricted to
/// one board. Lag is always passed through.
pub fn board_feed(
    receiver: broadcast::Receiver<BoardEvent>,
    policy: Policy,
    actor: Staff,
    only: Option<RequestKind>,
) -> impl Stream<Item = FeedItem> {
    BroadcastStream::new(receiver).filter_map(move |message| match message {
        Ok(change) => {
            let wanted = only.map_or(true, |kind| kind == change.kind);
            (wanted && policy.can_view(&actor, &change.policy_ref()))
                .then(|| FeedItem::Change(change))
        }
        Err(BroadcastStreamRecvError::Lagged(skipped)) => Some(FeedItem::Lagged(skipped)),
    })
}

/// Server-sent feed of status changes the caller is allowed to see.
///
/// A subscriber that falls behind gets a `lagged` event carrying the number
/// of skipped changes and should reload its boards.
pub async fn board_events(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
    Query(params): Query<BoardEventParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let only = params.kind.as_deref().map(parse_kind).transpose()?;

    tracing::debug!(
        user_id = %actor.user_id,
        kind = ?only,
        "Board event subscriber connected"
    );

    let receiver = state.board.events().subscribe();
    let stream = board_feed(receiver, state.board.policy().clone(), actor, only)
        .filter_map(|item| item.into_event().map(Ok));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
