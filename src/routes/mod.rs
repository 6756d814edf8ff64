//! Route definitions and router assembly for the pesagem API.

pub mod auth;
pub mod health;
pub mod stats;
pub mod users;
pub mod weights;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::AppState;

/// Build the full application router. Shared by `main` and the integration
/// tests so both serve the same route table.
pub fn router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me));

    let user_routes = Router::new()
        .route("/users", get(users::list_all).post(users::create))
        .route("/users/workers", get(users::list_workers))
        .route("/users/public", get(users::list_public))
        .route("/users/{id}", put(users::update));

    let weight_routes = Router::new()
        .route("/weights", get(weights::list_all).post(weights::create))
        .route("/weights/user/{id}", get(weights::list_for_user));

    let stats_routes = Router::new()
        .route("/stats/daily/{id}", get(stats::daily))
        .route("/stats/monthly/{id}", get(stats::monthly))
        .route("/stats/summary/{id}", get(stats::summary))
        .route("/stats/dashboard", get(stats::dashboard));

    Router::new()
        .route("/health/live", get(health::live))
        .route("/health/ready", get(health::ready))
        .nest("/api/v1", auth_routes)
        .nest("/api/v1", user_routes)
        .nest("/api/v1", weight_routes)
        .nest("/api/v1", stats_routes)
        .with_state(state)
}
