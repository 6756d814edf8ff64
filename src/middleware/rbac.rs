//! Access policy for Axum handlers: admin gate and self-or-admin checks.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::errors::AppError;
use crate::middleware::auth::CurrentUser;
use crate::AppState;

/// Extractor that requires the caller to hold the admin flag.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub CurrentUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin {
            return Err(AppError::Forbidden(
                "Administrator access required".to_string(),
            ));
        }
        Ok(RequireAdmin(user))
    }
}

/// Allow a caller to act on a target user's data only when the target is
/// themselves, unless the caller is an admin. Binary allow/deny, evaluated
/// before the persistence gateway is touched.
pub fn ensure_self_or_admin(user: &CurrentUser, target_user_id: i64) -> Result<(), AppError> {
    if user.id == target_user_id || user.is_admin {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Cannot access another worker's data".to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn caller(id: i64, is_admin: bool) -> CurrentUser {
        CurrentUser {
            id,
            first_name: "Maria".to_string(),
            is_admin,
        }
    }

    #[test]
    fn self_access_is_allowed() {
        assert!(ensure_self_or_admin(&caller(3, false), 3).is_ok());
    }

    #[test]
    fn cross_access_is_forbidden_for_non_admins() {
        let err = ensure_self_or_admin(&caller(3, false), 4).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn admins_may_access_anyone() {
        assert!(ensure_self_or_admin(&caller(1, true), 4).is_ok());
        assert!(ensure_self_or_admin(&caller(1, true), 1).is_ok());
    }
}
