//! User management routes: listings, creation, update.

use axum::{
    extract::{Path, State},
    Json,
};
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::middleware::rbac::RequireAdmin;
use crate::models::user::{CreateUser, PublicUser, UpdateUser, UserResponse};
use crate::services::user as user_service;
use crate::AppState;

/// GET /api/v1/users — every user, admin only.
pub async fn list_all(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let users = user_service::list_all(&state.db).await?;
    Ok(ApiResponse::success(
        users.into_iter().map(UserResponse::from).collect(),
    ))
}

/// GET /api/v1/users/workers — active, non-admin workers.
pub async fn list_workers(
    State(state): State<AppState>,
    _user: CurrentUser,
) -> Result<Json<ApiResponse<Vec<UserResponse>>>, AppError> {
    let users = user_service::list_active_workers(&state.db).await?;
    Ok(ApiResponse::success(
        users.into_iter().map(UserResponse::from).collect(),
    ))
}

/// GET /api/v1/users/public — public-safe roster, no authentication.
pub async fn list_public(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<PublicUser>>>, AppError> {
    let users = user_service::list_public(&state.db).await?;
    Ok(ApiResponse::success(users))
}

/// POST /api/v1/users — admin-only user creation.
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Json(body): Json<CreateUser>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    body.validate()?;
    let user = user_service::create(&state.db, &body).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}

/// PUT /api/v1/users/{id} — admin-only partial update; id and cpf immutable.
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<i64>,
    Json(body): Json<UpdateUser>,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    body.validate()?;
    let user = user_service::update(&state.db, id, &body).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}
