use crate::dtos::{optional, required, NoticeResponse, PublishNoticeRequest};
use crate::middleware::CurrentStaff;
use crate::models::{normalize_department, Notice, Staff, StaffRole};
use crate::startup::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use portal_core::error::AppError;
use validator::Validate;

/// Audience a notice is published to, or why the author may not publish it.
///
/// Admins address the whole hospital (`None`) or any department. Heads
/// address their own department only. Staff cannot publish.
fn notice_audience(actor: &Staff, requested: Option<String>) -> Result<Option<String>, AppError> {
    let requested = optional(requested).map(|d| normalize_department(&d));
    match actor.role {
        StaffRole::Admin => Ok(requested),
        StaffRole::Head => match requested {
            Some(department) if !actor.belongs_to(&department) => Err(AppError::Forbidden(
                anyhow::anyhow!("Heads can only address notices to {}", actor.department),
            )),
            _ => Ok(Some(actor.department.clone())),
        },
        StaffRole::Staff => Err(AppError::Forbidden(anyhow::anyhow!(
            "Only heads of department and administrators can publish notices"
        ))),
    }
}

pub async fn publish_notice(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
    Json(payload): Json<PublishNoticeRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let audience = notice_audience(&actor, payload.audience)?;
    let title = required("title", &payload.title)?;
    let body = required("body", &payload.body)?;

    if let Some(expires_at) = payload.expires_at {
        if expires_at <= Utc::now() {
            return Err(AppError::InvalidInput(anyhow::anyhow!(
                "expires_at must be in the future"
            )));
        }
    }

    let notice = Notice::new(
        title,
        body,
        actor.user_id.clone(),
        actor.name.clone(),
        audience,
        payload.pinned,
        payload.expires_at,
    );
    state.db.insert_notice(&notice).await?;

    tracing::info!(
        notice_id = %notice.id,
        author_id = %actor.user_id,
        audience = notice.audience.as_deref().unwrap_or("all"),
        "Notice published"
    );

    Ok((StatusCode::CREATED, Json(NoticeResponse::from(notice))))
}

/// Live notices for the caller's department and the whole hospital.
pub async fn list_notices(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
) -> Result<Json<Vec<NoticeResponse>>, AppError> {
    let notices = state.db.live_notices(&actor.department, Utc::now()).await?;
    Ok(Json(notices.into_iter().map(NoticeResponse::from).collect()))
}

pub async fn archive_notice(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let notice = state
        .db
        .find_notice(&id)
        .await?
        .filter(|n| !n.archived)
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Notice {} not found", id)))?;

    if !actor.is_admin() && notice.author_id != actor.user_id {
        return Err(AppError::Forbidden(anyhow::anyhow!(
            "Only the author or an administrator can archive a notice"
        )));
    }

    state.db.archive_notice(&id).await?;
    tracing::info!(notice_id = %id, actor_id = %actor.user_id, "Notice archived");
    Ok(StatusCode::NO_CONTENT)
}
