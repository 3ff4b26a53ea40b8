//! HTTP routes
//!
//! Handlers for the JSON API under `/api/v1` plus the health probe.

pub mod agents;
pub mod health;
pub mod leaderboard;
pub mod notifications;
pub mod projects;
pub mod respond;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;

use crate::db::Database;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<Database>,
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/agents", post(agents::register))
        .route("/agents/login", post(agents::login))
        .route("/agents/me", get(agents::me))
        .route("/agents/api-key", post(agents::rotate_key))
        .route("/projects", post(projects::create).get(projects::list))
        .route("/projects/:slug", get(projects::detail))
        .route("/projects/:slug/launch", post(projects::launch))
        .route(
            "/projects/:slug/vote",
            post(projects::vote).delete(projects::unvote),
        )
        .route("/leaderboard/curators", get(leaderboard::curators))
        .route("/notifications", get(notifications::list))
        .route("/notifications/mark-read", post(notifications::mark_read))
        .with_state(state.clone());

    Router::new()
        .route("/health", get(health::health))
        .nest("/api/v1", api)
}
