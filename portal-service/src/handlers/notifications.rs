use crate::dtos::{
    MarkAllReadResponse, NotificationListParams, NotificationResponse, UnreadCountResponse,
};
use crate::middleware::CurrentStaff;
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use portal_core::error::AppError;

pub async fn list_notifications(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
    Query(params): Query<NotificationListParams>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let notifications = state
        .db
        .list_notifications(&actor.user_id, params.unread_only, params.limit())
        .await?;
    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    ))
}

pub async fn unread_count(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let unread = state.db.unread_count(&actor.user_id).await?;
    Ok(Json(UnreadCountResponse { unread }))
}

/// Another user's notification is reported as missing.
pub async fn mark_read(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    if state.db.mark_notification_read(&id, &actor.user_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(anyhow::anyhow!(
            "Notification {} not found",
            id
        )))
    }
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
) -> Result<Json<MarkAllReadResponse>, AppError> {
    let updated = state.db.mark_all_notifications_read(&actor.user_id).await?;
    tracing::debug!(user_id = %actor.user_id, updated, "Notifications marked read");
    Ok(Json(MarkAllReadResponse { updated }))
}
