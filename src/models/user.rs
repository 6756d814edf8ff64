//! Worker model with admin flag and work-type classifier.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Exactly 11 digits, the Brazilian CPF format workers register with.
static CPF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{11}$").unwrap());

/// The two categories of plant labor a worker performs.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq)]
#[sqlx(type_name = "work_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum WorkType {
    Filetagem,
    Descascamento,
}

/// Full user row from database (includes password_hash — never serialize to API).
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub cpf: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub work_type: Option<WorkType>,
    pub is_active: bool,
    pub failed_login_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User response DTO — excludes password_hash and lockout bookkeeping.
///
/// Wire names are camelCase to match the front end's existing contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub cpf: String,
    pub first_name: String,
    pub last_name: String,
    pub is_admin: bool,
    pub work_type: Option<WorkType>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            cpf: u.cpf,
            first_name: u.first_name,
            last_name: u.last_name,
            is_admin: u.is_admin,
            work_type: u.work_type,
            is_active: u.is_active,
            created_at: u.created_at,
        }
    }
}

/// Public-safe user row for the unauthenticated roster listing.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub work_type: Option<WorkType>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUser {
    #[validate(regex(path = *CPF_RE, message = "must be exactly 11 digits"))]
    pub cpf: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(length(min = 1))]
    pub first_name: String,
    #[validate(length(min = 1))]
    pub last_name: String,
    #[serde(default)]
    pub is_admin: bool,
    pub work_type: Option<WorkType>,
}

/// Partial update — id and cpf are immutable.
#[derive(Debug, Clone, Deserialize, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUser {
    #[validate(length(min = 6))]
    pub password: Option<String>,
    #[validate(length(min = 1))]
    pub first_name: Option<String>,
    #[validate(length(min = 1))]
    pub last_name: Option<String>,
    pub is_admin: Option<bool>,
    pub work_type: Option<WorkType>,
    pub is_active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            cpf: "12345678901".to_string(),
            password_hash: "secret_hash".to_string(),
            first_name: "Maria".to_string(),
            last_name: "Silva".to_string(),
            is_admin: false,
            work_type: Some(WorkType::Filetagem),
            is_active: true,
            failed_login_attempts: 0,
            locked_until: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn work_type_serialization() {
        assert_eq!(
            serde_json::to_string(&WorkType::Filetagem).unwrap(),
            "\"filetagem\""
        );
        assert_eq!(
            serde_json::to_string(&WorkType::Descascamento).unwrap(),
            "\"descascamento\""
        );
        let parsed: WorkType = serde_json::from_str("\"filetagem\"").unwrap();
        assert_eq!(parsed, WorkType::Filetagem);
    }

    #[test]
    fn user_response_excludes_password() {
        let json = serde_json::to_string(&UserResponse::from(sample_user())).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("hash"));
    }

    #[test]
    fn user_response_uses_camel_case() {
        let json = serde_json::to_value(UserResponse::from(sample_user())).unwrap();
        assert_eq!(json["firstName"], "Maria");
        assert_eq!(json["workType"], "filetagem");
        assert_eq!(json["isAdmin"], false);
    }

    #[test]
    fn create_user_rejects_short_cpf() {
        let input = CreateUser {
            cpf: "123".to_string(),
            password: "secret1".to_string(),
            first_name: "Maria".to_string(),
            last_name: "Silva".to_string(),
            is_admin: false,
            work_type: None,
        };
        let errors = input.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("cpf"));
    }

    #[test]
    fn create_user_rejects_non_numeric_cpf() {
        let input = CreateUser {
            cpf: "1234567890a".to_string(),
            password: "secret1".to_string(),
            first_name: "Maria".to_string(),
            last_name: "Silva".to_string(),
            is_admin: false,
            work_type: None,
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn create_user_accepts_valid_input() {
        let input = CreateUser {
            cpf: "12345678901".to_string(),
            password: "secret1".to_string(),
            first_name: "Maria".to_string(),
            last_name: "Silva".to_string(),
            is_admin: false,
            work_type: Some(WorkType::Descascamento),
        };
        assert!(input.validate().is_ok());
    }

    #[test]
    fn update_user_empty_is_valid() {
        assert!(UpdateUser::default().validate().is_ok());
    }
}
