//! Statistics routes: daily, monthly, per-worker summary, and dashboard.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::{ensure_self_or_admin, RequireAdmin};
use crate::services::stats::{self, DailyStats, DashboardStats, MonthlyStats, SummaryStats};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct DailyQuery {
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: i32,
    pub month: u32,
}

/// GET /api/v1/stats/daily/{id}?date=YYYY-MM-DD — self or admin.
pub async fn daily(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(user_id): Path<i64>,
    Query(query): Query<DailyQuery>,
) -> Result<Json<ApiResponse<DailyStats>>, AppError> {
    ensure_self_or_admin(&user, user_id)?;
    let report = stats::daily(&state.db, user_id, query.date).await?;
    Ok(ApiResponse::success(report))
}

/// GET /api/v1/stats/monthly/{id}?year=YYYY&month=M — self or admin.
pub async fn monthly(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(user_id): Path<i64>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<ApiResponse<MonthlyStats>>, AppError> {
    ensure_self_or_admin(&user, user_id)?;
    let report = stats::monthly(&state.db, user_id, query.year, query.month).await?;
    Ok(ApiResponse::success(report))
}

/// GET /api/v1/stats/summary/{id} — today/month/average for one worker,
/// self or admin.
pub async fn summary(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(user_id): Path<i64>,
) -> Result<Json<ApiResponse<SummaryStats>>, AppError> {
    ensure_self_or_admin(&user, user_id)?;
    let report = stats::summary(&state.db, user_id, Utc::now().date_naive()).await?;
    Ok(ApiResponse::success(report))
}

/// GET /api/v1/stats/dashboard — org-wide aggregation, admin only.
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<DashboardStats>>, AppError> {
    let report = stats::dashboard(&state.db, Utc::now().date_naive()).await?;
    Ok(ApiResponse::success(report))
}
