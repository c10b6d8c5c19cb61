//! Staff identity from `Authorization: Bearer <jwt>`.

use crate::models::Staff;
use crate::startup::AppState;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::headers::authorization::Bearer;
use axum_extra::headers::Authorization;
use axum_extra::TypedHeader;
use portal_core::error::AppError;

/// The member of staff making the request.
#[derive(Debug, Clone)]
pub struct CurrentStaff(pub Staff);

#[async_trait]
impl FromRequestParts<AppState> for CurrentStaff {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| {
                    AppError::Unauthorized(anyhow::anyhow!(
                        "Missing or invalid Authorization header"
                    ))
                })?;

        let claims = state.tokens.validate(bearer.token()).map_err(|e| {
            tracing::debug!("Rejected staff token: {}", e);
            AppError::Unauthorized(anyhow::anyhow!("Invalid or expired token"))
        })?;

        let staff = Staff::from(claims);

        // Add to tracing span for observability
        let span = tracing::Span::current();
        span.record("user_id", staff.user_id.as_str());
        span.record("department", staff.department.as_str());

        Ok(CurrentStaff(staff))
    }
}
