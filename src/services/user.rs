//! Worker registry service: CRUD and listings over the users table.
//!
//! Users are never hard-deleted; deactivation flips `is_active`. The CPF and
//! id are immutable after creation.

use sqlx::PgPool;

use crate::errors::AppError;
use crate::models::user::{CreateUser, PublicUser, UpdateUser, User};
use crate::services::auth;

/// Find a user by ID.
pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<User, AppError> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Find a user by CPF.
pub async fn find_by_cpf(pool: &PgPool, cpf: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE cpf = $1")
        .bind(cpf)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Create a new user with hashed password.
///
/// A duplicate CPF surfaces as `Conflict` from the storage layer's unique
/// constraint; it is not pre-checked.
pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, AppError> {
    let password_hash = auth::hash_password(&input.password)?;

    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (cpf, password_hash, first_name, last_name, is_admin, work_type)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(&input.cpf)
    .bind(&password_hash)
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(input.is_admin)
    .bind(input.work_type)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
            AppError::Conflict("A user with this CPF already exists".to_string())
        }
        _ => AppError::Database(e),
    })?;

    Ok(user)
}

/// Update user fields by ID. A supplied password is re-hashed before storage.
pub async fn update(pool: &PgPool, id: i64, input: &UpdateUser) -> Result<User, AppError> {
    // Verify user exists
    let existing = find_by_id(pool, id).await?;

    let password_hash = match &input.password {
        Some(password) => Some(auth::hash_password(password)?),
        None => None,
    };

    let user = sqlx::query_as::<_, User>(
        r#"
        UPDATE users SET
            password_hash = COALESCE($2, password_hash),
            first_name = COALESCE($3, first_name),
            last_name = COALESCE($4, last_name),
            is_admin = COALESCE($5, is_admin),
            work_type = COALESCE($6, work_type),
            is_active = COALESCE($7, is_active),
            updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(existing.id)
    .bind(password_hash)
    .bind(&input.first_name)
    .bind(&input.last_name)
    .bind(input.is_admin)
    .bind(input.work_type)
    .bind(input.is_active)
    .fetch_one(pool)
    .await?;

    Ok(user)
}

/// List all users, ordered by first name.
pub async fn list_all(pool: &PgPool) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY first_name ASC, id ASC")
        .fetch_all(pool)
        .await?;
    Ok(users)
}

/// List active, non-admin workers, ordered by first name.
pub async fn list_active_workers(pool: &PgPool) -> Result<Vec<User>, AppError> {
    let users = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE is_active = true AND is_admin = false \
         ORDER BY first_name ASC, id ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(users)
}

/// Public-safe roster of active users: no CPF, no flags, no timestamps.
pub async fn list_public(pool: &PgPool) -> Result<Vec<PublicUser>, AppError> {
    let users = sqlx::query_as::<_, PublicUser>(
        "SELECT id, first_name, last_name, work_type FROM users WHERE is_active = true \
         ORDER BY first_name ASC, id ASC",
    )
    .fetch_all(pool)
    .await?;
    Ok(users)
}
