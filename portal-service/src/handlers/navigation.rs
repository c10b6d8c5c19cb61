use crate::middleware::CurrentStaff;
use crate::models::{DepartmentRequest, Staff, StockRequest, TrackedRequest, VacationRequest};
use crate::services::{boards_for, build_navigation, NavCounts, NavEntry};
use crate::startup::AppState;
use crate::workflow::{RequestKind, RequestStatus};
use axum::{extract::State, Json};
use portal_core::error::AppError;

async fn pending_count<T: TrackedRequest>(state: &AppState, actor: &Staff) -> Result<u64, AppError> {
    let mut filter = state.board.policy().visibility_filter(actor, T::KIND);
    filter.insert("status", RequestStatus::Pending.as_str());
    state.db.count_requests::<T>(filter).await
}

/// Sidebar entries for the caller, with badge counts.
pub async fn get_navigation(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
) -> Result<Json<Vec<NavEntry>>, AppError> {
    let is_purchasing = state.board.policy().is_purchasing(&actor);
    let mut counts = NavCounts {
        unread_notifications: state.db.unread_count(&actor.user_id).await?,
        ..NavCounts::default()
    };

    for kind in boards_for(&actor, is_purchasing) {
        match kind {
            RequestKind::Vacation => {
                counts.pending_vacations = pending_count::<VacationRequest>(&state, &actor).await?
            }
            RequestKind::Stock => {
                counts.pending_stock = pending_count::<StockRequest>(&state, &actor).await?
            }
            RequestKind::Department => {
                counts.pending_department =
                    pending_count::<DepartmentRequest>(&state, &actor).await?
            }
        }
    }

    Ok(Json(build_navigation(&actor, is_purchasing, &counts)))
}
