//! Notification endpoints

use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use serde::Deserialize;
use serde_json::json;

use super::respond::success;
use super::AppState;
use crate::auth::authenticate;
use crate::db::notifications::{list_for_agent, mark_all_read};
use crate::error::Error;

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub unread: bool,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    50
}

/// GET /api/v1/notifications?unread=true
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Response, Error> {
    let agent = authenticate(&state.db, &headers)?;
    let limit = query.limit.clamp(1, 100);

    let notifications = state
        .db
        .with_conn(|conn| list_for_agent(conn, &agent.id, query.unread, limit))?;

    Ok(success(notifications))
}

/// POST /api/v1/notifications/mark-read - mark all unread as read
pub async fn mark_read(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, Error> {
    let agent = authenticate(&state.db, &headers)?;

    let marked = state
        .db
        .with_conn(|conn| mark_all_read(conn, &agent.id))?;

    Ok(success(json!({ "marked": marked })))
}
