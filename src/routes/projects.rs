//! Project endpoints: submission, launch, voting

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use super::respond::{created, no_content, success};
use super::AppState;
use crate::auth::authenticate;
use crate::curator::{current_week_start, spawn_milestone_check};
use crate::db::projects::{
    create_project, creator_ids, get_by_slug, launch_project, list_launched, CreateProjectInput,
    Project,
};
use crate::db::votes::{unvote_on_slug, vote_on_slug};
use crate::error::Error;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateRequest {
    pub name: String,
    pub tagline: String,
    #[serde(default)]
    pub website_url: Option<String>,
}

/// POST /api/v1/projects - submit a draft project
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<CreateRequest>,
) -> Result<Response, Error> {
    let agent = authenticate(&state.db, &headers)?;

    if req.name.trim().is_empty() || req.name.len() > 128 {
        return Err(Error::validation("Project name must be 1-128 characters"));
    }
    if req.tagline.trim().is_empty() || req.tagline.len() > 256 {
        return Err(Error::validation("Tagline must be 1-256 characters"));
    }

    let project = state.db.with_conn_mut(|conn| {
        create_project(
            conn,
            &agent.id,
            CreateProjectInput {
                name: req.name.trim().to_string(),
                tagline: req.tagline.trim().to_string(),
                website_url: req.website_url,
            },
        )
    })?;

    info!(slug = %project.slug, creator = %agent.username, "project submitted");

    Ok(created(project))
}

#[derive(Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    20
}

/// GET /api/v1/projects - launched projects, newest first
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, Error> {
    let limit = query.limit.clamp(1, 100);
    let projects = state
        .db
        .with_conn(|conn| list_launched(conn, limit, query.offset))?;

    Ok(success(projects))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: Project,
    pub creators: Vec<String>,
}

/// GET /api/v1/projects/:slug
pub async fn detail(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Response, Error> {
    let (project, creators) = state.db.with_conn(|conn| {
        let project =
            get_by_slug(conn, &slug)?.ok_or_else(|| Error::NotFound("Project".to_string()))?;
        let creators = creator_ids(conn, &project.id)?;
        Ok((project, creators))
    })?;

    Ok(success(ProjectDetail { project, creators }))
}

/// POST /api/v1/projects/:slug/launch - owner-only draft -> launched
pub async fn launch(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Result<Response, Error> {
    let agent = authenticate(&state.db, &headers)?;

    let project = state.db.with_conn(|conn| {
        let project =
            get_by_slug(conn, &slug)?.ok_or_else(|| Error::NotFound("Project".to_string()))?;

        if !creator_ids(conn, &project.id)?.contains(&agent.id) {
            return Err(Error::Forbidden(
                "Only a project creator can launch it".to_string(),
            ));
        }
        if project.is_launched() {
            return Err(Error::Conflict("Project is already launched".to_string()));
        }

        launch_project(conn, &project.id)
    })?;

    info!(slug = %project.slug, "project launched");

    Ok(success(project))
}

/// POST /api/v1/projects/:slug/vote - upvote a project
pub async fn vote(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Result<Response, Error> {
    let agent = authenticate(&state.db, &headers)?;
    let week_start = current_week_start();

    let receipt = state
        .db
        .with_conn_mut(|conn| vote_on_slug(conn, &agent, &slug, week_start))?;

    info!(
        slug = %slug,
        voter = %agent.username,
        position = receipt.position,
        tier = receipt.tier.as_str(),
        "vote cast"
    );

    // Milestone payouts run detached; the voter never waits on them
    spawn_milestone_check(
        state.db.clone(),
        receipt.project_id.clone(),
        receipt.votes_count,
    );

    Ok(success(json!({
        "votesCount": receipt.votes_count,
        "position": receipt.position,
        "tier": receipt.tier,
        "votesRemaining": receipt.votes_remaining,
    })))
}

/// DELETE /api/v1/projects/:slug/vote - remove a vote
pub async fn unvote(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(slug): Path<String>,
) -> Result<Response, Error> {
    let agent = authenticate(&state.db, &headers)?;

    state
        .db
        .with_conn_mut(|conn| unvote_on_slug(conn, &agent.id, &slug))?;

    info!(slug = %slug, voter = %agent.username, "vote removed");

    Ok(no_content())
}
