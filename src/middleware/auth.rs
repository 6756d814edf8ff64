//! Session-cookie authentication extractor for Axum handlers.

use axum::{extract::FromRequestParts, http::request::Parts};
use axum_extra::extract::cookie::CookieJar;

use crate::errors::AppError;
use crate::services::session::SESSION_COOKIE;
use crate::services::user as user_service;
use crate::AppState;

/// Authenticated caller resolved from the session cookie.
///
/// Use as an Axum extractor in handlers that require authentication:
/// ```ignore
/// async fn handler(current_user: CurrentUser) -> impl IntoResponse { ... }
/// ```
///
/// A missing or expired session, an unknown user, or a deactivated user all
/// reject with `Unauthorized` before the handler body runs.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub first_name: String,
    pub is_admin: bool,
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::Unauthorized)?;

        let session_id = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(AppError::Unauthorized)?;

        let user_id = state
            .sessions
            .get(&session_id)
            .await?
            .ok_or(AppError::Unauthorized)?;

        // A session can outlive its user's account state; re-check both.
        let user = match user_service::find_by_id(&state.db, user_id).await {
            Ok(user) => user,
            Err(e) if e.is_not_found() => return Err(AppError::Unauthorized),
            Err(e) => return Err(e),
        };

        if !user.is_active {
            return Err(AppError::Unauthorized);
        }

        Ok(CurrentUser {
            id: user.id,
            first_name: user.first_name,
            is_admin: user.is_admin,
        })
    }
}
