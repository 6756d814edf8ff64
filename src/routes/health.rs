//! Health check endpoints for liveness and readiness probes.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::errors::ApiResponse;
use crate::AppState;

/// Readiness probe detail: the record store and the session store.
#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: String,
    pub database: String,
    pub session_store: String,
}

/// Liveness probe — always returns OK if the process is running.
pub async fn live() -> &'static str {
    "OK"
}

/// Readiness probe — checks database and session-store connectivity and
/// reports `degraded` if either is unreachable.
pub async fn ready(State(state): State<AppState>) -> Json<ApiResponse<HealthStatus>> {
    let database = match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => "connected".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Database health check failed");
            format!("error: {e}")
        }
    };

    let session_store = match redis::Client::open(state.config.redis_url.as_str()) {
        Ok(client) => match client.get_multiplexed_async_connection().await {
            Ok(_) => "connected".to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "Session store health check failed");
                format!("error: {e}")
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "Redis client creation failed");
            format!("error: {e}")
        }
    };

    let status = if database == "connected" && session_store == "connected" {
        "ok".to_string()
    } else {
        "degraded".to_string()
    };

    ApiResponse::success(HealthStatus {
        status,
        database,
        session_store,
    })
}
