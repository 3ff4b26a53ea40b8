//! Curator leaderboard endpoint

use axum::extract::{Query, State};
use axum::response::Response;
use serde::Deserialize;
use serde_json::json;

use super::respond::success;
use super::AppState;
use crate::curator::week::current_week_start;
use crate::curator::{top_curators, Period};
use crate::error::Error;

#[derive(Deserialize)]
pub struct CuratorQuery {
    #[serde(default)]
    pub period: Period,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    50
}

/// GET /api/v1/leaderboard/curators?period={week|last_week|all}&limit=N
pub async fn curators(
    State(state): State<AppState>,
    Query(query): Query<CuratorQuery>,
) -> Result<Response, Error> {
    let limit = query.limit.clamp(1, 100);
    let week_start = current_week_start();

    let entries = state
        .db
        .with_conn(|conn| top_curators(conn, query.period, limit, week_start))?;

    Ok(success(json!({
        "period": query.period,
        "leaderboard": entries,
    })))
}
