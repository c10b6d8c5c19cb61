use crate::dtos::{
    optional, required, DepartmentRequestResponse, RequestListParams, RequestListResponse,
    StockRequestResponse, SubmitDepartmentRequest, SubmitStockRequest, SubmitVacationRequest,
    VacationResponse,
};
use crate::middleware::CurrentStaff;
use crate::models::{
    normalize_department, DepartmentRequest, Staff, StockRequest, TrackedRequest, VacationRequest,
};
use crate::services::record_submission;
use crate::startup::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use mongodb::bson::doc;
use portal_core::error::AppError;
use validator::Validate;

/// Department a vacation or stock request is filed under.
///
/// Staff file for their own department; only admins may name another one.
fn owning_department(actor: &Staff, requested: Option<String>) -> Result<String, AppError> {
    match optional(requested) {
        Some(department) if actor.is_admin() => Ok(normalize_department(&department)),
        Some(department) if !actor.belongs_to(&department) => Err(AppError::Forbidden(
            anyhow::anyhow!("You can only file requests for {}", actor.department),
        )),
        _ if actor.department.is_empty() => Err(AppError::InvalidInput(anyhow::anyhow!(
            "Your account has no department; name one explicitly"
        ))),
        _ => Ok(actor.department.clone()),
    }
}

async fn list_visible<T, R>(
    state: &AppState,
    actor: &Staff,
    params: &RequestListParams,
) -> Result<RequestListResponse<R>, AppError>
where
    T: TrackedRequest,
    R: From<T>,
{
    let mut filter = if params.mine {
        doc! { "requester_id": &actor.user_id }
    } else {
        state.board.policy().visibility_filter(actor, T::KIND)
    };

    if let Some(status) = params.status {
        if !T::KIND.allows(status) {
            return Err(AppError::BadRequest(anyhow::anyhow!(
                "'{}' is not a status of {} requests",
                status,
                T::KIND
            )));
        }
        filter.insert("status", status.as_str());
    }

    let page = params.page();
    let page_size = params.page_size();
    let (items, total) = state
        .db
        .list_requests::<T>(filter, params.skip(), page_size)
        .await?;

    Ok(RequestListResponse::new(
        items.into_iter().map(R::from).collect(),
        total,
        page,
        page_size,
    ))
}

async fn submit<T: TrackedRequest>(state: &AppState, request: &T) -> Result<(), AppError> {
    state.db.insert_request(request).await?;
    record_submission(T::KIND);
    tracing::info!(
        kind = %T::KIND,
        request_id = %request.id(),
        requester_id = %request.requester_id(),
        department = %request.department(),
        "Request submitted"
    );
    Ok(())
}

// ----------------------------------------------------------------------
// Vacations
// ----------------------------------------------------------------------

pub async fn submit_vacation(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
    Json(payload): Json<SubmitVacationRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    payload.check_dates()?;
    let department = owning_department(&actor, payload.department)?;

    let request = VacationRequest::new(
        &actor,
        department,
        payload.start_date,
        payload.end_date,
        optional(payload.reason),
    );
    submit(&state, &request).await?;

    Ok((StatusCode::CREATED, Json(VacationResponse::from(request))))
}

pub async fn list_vacations(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
    Query(params): Query<RequestListParams>,
) -> Result<Json<RequestListResponse<VacationResponse>>, AppError> {
    let page = list_visible::<VacationRequest, VacationResponse>(&state, &actor, &params).await?;
    Ok(Json(page))
}

pub async fn get_vacation(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
    Path(id): Path<String>,
) -> Result<Json<VacationResponse>, AppError> {
    let request: VacationRequest = state.board.visible_request(&actor, &id).await?;
    Ok(Json(request.into()))
}

// ----------------------------------------------------------------------
// Stock
// ----------------------------------------------------------------------

pub async fn submit_stock_request(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
    Json(payload): Json<SubmitStockRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let item = required("item", &payload.item)?;
    let justification = required("justification", &payload.justification)?;
    let department = owning_department(&actor, payload.department)?;

    let request = StockRequest::new(
        &actor,
        department,
        item,
        payload.quantity,
        optional(payload.unit),
        justification,
        payload.priority,
    );
    submit(&state, &request).await?;

    Ok((StatusCode::CREATED, Json(StockRequestResponse::from(request))))
}

pub async fn list_stock_requests(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
    Query(params): Query<RequestListParams>,
) -> Result<Json<RequestListResponse<StockRequestResponse>>, AppError> {
    let page = list_visible::<StockRequest, StockRequestResponse>(&state, &actor, &params).await?;
    Ok(Json(page))
}

pub async fn get_stock_request(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
    Path(id): Path<String>,
) -> Result<Json<StockRequestResponse>, AppError> {
    let request: StockRequest = state.board.visible_request(&actor, &id).await?;
    Ok(Json(request.into()))
}

// ----------------------------------------------------------------------
// Department requests
// ----------------------------------------------------------------------

pub async fn submit_department_request(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
    Json(payload): Json<SubmitDepartmentRequest>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;
    let receiver = normalize_department(&required("receiver_department", &payload.receiver_department)?);
    let subject = required("subject", &payload.subject)?;
    let description = required("description", &payload.description)?;

    if actor.department.is_empty() {
        return Err(AppError::InvalidInput(anyhow::anyhow!(
            "Your account has no department to send from"
        )));
    }
    if actor.belongs_to(&receiver) {
        return Err(AppError::InvalidInput(anyhow::anyhow!(
            "A department request must go to another department"
        )));
    }

    let request = DepartmentRequest::new(&actor, receiver, subject, description);
    submit(&state, &request).await?;

    Ok((
        StatusCode::CREATED,
        Json(DepartmentRequestResponse::from(request)),
    ))
}

pub async fn list_department_requests(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
    Query(params): Query<RequestListParams>,
) -> Result<Json<RequestListResponse<DepartmentRequestResponse>>, AppError> {
    let page =
        list_visible::<DepartmentRequest, DepartmentRequestResponse>(&state, &actor, &params)
            .await?;
    Ok(Json(page))
}

pub async fn get_department_request(
    State(state): State<AppState>,
    CurrentStaff(actor): CurrentStaff,
    Path(id): Path<String>,
) -> Result<Json<DepartmentRequestResponse>, AppError> {
    let request: DepartmentRequest = state.board.visible_request(&actor, &id).await?;
    Ok(Json(request.into()))
}
