//! Authentication routes: login, logout, current-user profile.

use axum::{extract::State, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use validator::Validate;

use crate::errors::{ApiResponse, AppError};
use crate::middleware::auth::CurrentUser;
use crate::models::user::UserResponse;
use crate::services::auth as auth_service;
use crate::services::session::SESSION_COOKIE;
use crate::services::user as user_service;
use crate::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(equal = 11))]
    pub cpf: String,
    #[validate(length(min = 1))]
    pub password: String,
}

/// POST /api/v1/auth/login — validate credentials and set the session cookie.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<UserResponse>>), AppError> {
    body.validate()?;

    let (user, session_id) =
        auth_service::login(&state.db, state.sessions.as_ref(), &body.cpf, &body.password).await?;

    let cookie = Cookie::build((SESSION_COOKIE, session_id))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax);

    Ok((
        jar.add(cookie),
        ApiResponse::success(UserResponse::from(user)),
    ))
}

/// POST /api/v1/auth/logout — close the session and clear the cookie.
pub async fn logout(
    State(state): State<AppState>,
    _user: CurrentUser,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiResponse<&'static str>>), AppError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        auth_service::logout(state.sessions.as_ref(), cookie.value()).await?;
    }
    let jar = jar.remove(Cookie::build(SESSION_COOKIE).path("/"));

    Ok((jar, ApiResponse::success("Logged out successfully")))
}

/// GET /api/v1/auth/me — current user profile.
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> Result<Json<ApiResponse<UserResponse>>, AppError> {
    let user = user_service::find_by_id(&state.db, current_user.id).await?;
    Ok(ApiResponse::success(UserResponse::from(user)))
}
