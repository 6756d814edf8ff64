pub mod config;
pub mod db;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use std::sync::Arc;

use sqlx::PgPool;

use crate::services::session::SessionStore;

/// Shared application state passed to all Axum handlers.
///
/// The session store is an injected trait object so request handlers never
/// touch a process-wide session singleton.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: PgPool,
    pub config: config::AppConfig,
    pub sessions: Arc<dyn SessionStore>,
}
