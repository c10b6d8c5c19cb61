use crate::models::{
    vacation::inclusive_days, DepartmentRequest, StockPriority, StockRequest, VacationRequest,
};
use crate::workflow::RequestStatus;
use chrono::{DateTime, NaiveDate, Utc};
use portal_core::error::AppError;
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const MAX_VACATION_DAYS: i64 = 60;

/// Trim `value` and refuse it when nothing is left.
pub fn required(field: &str, value: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput(anyhow::anyhow!(
            "{} must not be blank",
            field
        )));
    }
    Ok(trimmed.to_string())
}

/// Trim an optional free-text field, dropping it when blank.
pub fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitVacationRequest {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[validate(length(max = 500, message = "Reason must be at most 500 characters"))]
    pub reason: Option<String>,
    /// Admins may file on behalf of another department.
    #[validate(length(min = 1, max = 100))]
    pub department: Option<String>,
}

impl SubmitVacationRequest {
    pub fn check_dates(&self) -> Result<(), AppError> {
        if self.end_date < self.start_date {
            return Err(AppError::InvalidInput(anyhow::anyhow!(
                "end_date must not be before start_date"
            )));
        }
        let days = inclusive_days(self.start_date, self.end_date);
        if days > MAX_VACATION_DAYS {
            return Err(AppError::InvalidInput(anyhow::anyhow!(
                "A single request may cover at most {} days (got {})",
                MAX_VACATION_DAYS,
                days
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitStockRequest {
    #[validate(length(min = 1, max = 200, message = "Item must be 1-200 characters"))]
    pub item: String,
    #[validate(range(min = 1, max = 10000, message = "Quantity must be between 1 and 10000"))]
    pub quantity: u32,
    #[validate(length(max = 30))]
    pub unit: Option<String>,
    #[validate(length(min = 1, max = 1000, message = "Justification must be 1-1000 characters"))]
    pub justification: String,
    #[serde(default)]
    pub priority: StockPriority,
    #[validate(length(min = 1, max = 100))]
    pub department: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct SubmitDepartmentRequest {
    #[validate(length(min = 1, max = 100, message = "Receiver department must be 1-100 characters"))]
    pub receiver_department: String,
    #[validate(length(min = 1, max = 200, message = "Subject must be 1-200 characters"))]
    pub subject: String,
    #[validate(length(min = 1, max = 5000, message = "Description must be 1-5000 characters"))]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub struct RequestListParams {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub status: Option<RequestStatus>,
    /// Only requests the caller submitted.
    #[serde(default)]
    pub mine: bool,
}

impl RequestListParams {
    pub fn page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn page_size(&self) -> u64 {
        self.page_size.unwrap_or(20).clamp(1, 100)
    }

    /// Documents to skip; saturates at the largest skip MongoDB accepts.
    pub fn skip(&self) -> u64 {
        (self.page() - 1)
            .saturating_mul(self.page_size())
            .min(i64::MAX as u64)
    }
}

#[derive(Debug, Serialize)]
pub struct RequestListResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl<T> RequestListResponse<T> {
    pub fn new(items: Vec<T>, total: u64, page: u64, page_size: u64) -> Self {
        Self {
            items,
            total,
            page,
            page_size,
            total_pages: total.div_ceil(page_size),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VacationResponse {
    pub id: String,
    pub requester_id: String,
    pub requester_name: String,
    pub department: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub days: i64,
    pub reason: Option<String>,
    pub status: RequestStatus,
    pub handled_by_name: Option<String>,
    pub handler_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<VacationRequest> for VacationResponse {
    fn from(v: VacationRequest) -> Self {
        Self {
            days: v.days(),
            id: v.id,
            requester_id: v.requester_id,
            requester_name: v.requester_name,
            department: v.department,
            start_date: v.start_date,
            end_date: v.end_date,
            reason: v.reason,
            status: v.status,
            handled_by_name: v.handled_by_name,
            handler_note: v.handler_note,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StockRequestResponse {
    pub id: String,
    pub requester_id: String,
    pub requester_name: String,
    pub department: String,
    pub item: String,
    pub quantity: u32,
    pub unit: Option<String>,
    pub justification: String,
    pub priority: StockPriority,
    pub status: RequestStatus,
    pub handled_by_name: Option<String>,
    pub handler_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<StockRequest> for StockRequestResponse {
    fn from(s: StockRequest) -> Self {
        Self {
            id: s.id,
            requester_id: s.requester_id,
            requester_name: s.requester_name,
            department: s.department,
            item: s.item,
            quantity: s.quantity,
            unit: s.unit,
            justification: s.justification,
            priority: s.priority,
            status: s.status,
            handled_by_name: s.handled_by_name,
            handler_note: s.handler_note,
            created_at: s.created_at,
            updated_at: s.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DepartmentRequestResponse {
    pub id: String,
    pub requester_id: String,
    pub requester_name: String,
    pub sender_department: String,
    pub receiver_department: String,
    pub subject: String,
    pub description: String,
    pub status: RequestStatus,
    pub handled_by_name: Option<String>,
    pub handler_note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<DepartmentRequest> for DepartmentRequestResponse {
    fn from(d: DepartmentRequest) -> Self {
        Self {
            id: d.id,
            requester_id: d.requester_id,
            requester_name: d.requester_name,
            sender_department: d.sender_department,
            receiver_department: d.receiver_department,
            subject: d.subject,
            description: d.description,
            status: d.status,
            handled_by_name: d.handled_by_name,
            handler_note: d.handler_note,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}
