//! Weight record routes: admin entry and per-worker listings.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::{ensure_self_or_admin, RequireAdmin};
use crate::models::weight_record::{CreateWeightRecord, WeightRecord};
use crate::services::weight::{self as weight_service, DateRange};
use crate::AppState;

/// Optional inclusive date window; both bounds or neither.
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// POST /api/v1/weights — admin-only record entry. The record's work type is
/// copied from the target worker's profile; createdBy is the caller.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(body): Json<CreateWeightRecord>,
) -> Result<Json<ApiResponse<WeightRecord>>, AppError> {
    body.validate()?;
    let record = weight_service::create(&state.db, &body, admin.id).await?;
    Ok(ApiResponse::success(record))
}

/// GET /api/v1/weights — every worker's records, admin only. `start` and
/// `end` must be supplied together.
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ApiResponse<Vec<WeightRecord>>>, AppError> {
    let range = DateRange::from_bounds(query.start, query.end)?;
    let records = weight_service::list_all(&state.db, range).await?;
    Ok(ApiResponse::success(records))
}

/// GET /api/v1/weights/user/{id} — one worker's records, self or admin.
/// `start` and `end` must be supplied together.
pub async fn list_for_user(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(user_id): Path<i64>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ApiResponse<Vec<WeightRecord>>>, AppError> {
    ensure_self_or_admin(&user, user_id)?;
    let range = DateRange::from_bounds(query.start, query.end)?;
    let records = weight_service::list_for_user(&state.db, user_id, range).await?;
    Ok(ApiResponse::success(records))
}
