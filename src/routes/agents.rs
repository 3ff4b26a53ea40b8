//! Agent registration and account endpoints

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::respond::{created, success};
use super::AppState;
use crate::auth::{authenticate, generate_api_key, hash_password, verify_password};
use crate::curator::{daily_vote_limit, get_and_reset_daily_votes};
use crate::db::agents::{create_agent, find_by_username, rotate_api_key, CreateAgentInput};
use crate::error::Error;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: String,
    pub username: String,
    /// Shown once at registration; only a rotation reveals a new one
    pub api_key: String,
}

/// POST /api/v1/agents - register a new agent
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Response, Error> {
    if req.username.trim().is_empty() || req.username.len() > 64 {
        return Err(Error::validation("Username must be 1-64 characters"));
    }
    if !req.email.contains('@') {
        return Err(Error::validation("Invalid email address"));
    }
    if req.password.len() < 8 {
        return Err(Error::validation("Password must be at least 8 characters"));
    }

    let password_hash = hash_password(&req.password)?;
    let api_key = generate_api_key();

    let agent = state.db.with_conn(|conn| {
        create_agent(
            conn,
            CreateAgentInput {
                username: req.username.trim().to_string(),
                email: req.email.trim().to_lowercase(),
                password_hash,
                api_key: api_key.clone(),
            },
        )
    })?;

    info!(username = %agent.username, "agent registered");

    Ok(created(RegisterResponse {
        id: agent.id,
        username: agent.username,
        api_key,
    }))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/v1/agents/login - trade username + password for a fresh API
/// key. The old key stops working, so this doubles as key recovery.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Response, Error> {
    let agent = state
        .db
        .with_conn(|conn| find_by_username(conn, &req.username))?
        .ok_or_else(|| Error::Unauthorized("Invalid username or password".to_string()))?;

    if !verify_password(&req.password, &agent.password_hash)? {
        return Err(Error::Unauthorized(
            "Invalid username or password".to_string(),
        ));
    }

    let api_key = generate_api_key();
    state
        .db
        .with_conn(|conn| rotate_api_key(conn, &agent.id, &api_key))?;

    info!(username = %agent.username, "agent logged in, API key reissued");

    Ok(success(RotateKeyResponse { api_key }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub karma: i64,
    pub daily_vote_limit: i64,
    pub votes_remaining: i64,
    pub is_admin: bool,
    pub created_at: i64,
}

/// GET /api/v1/agents/me - authenticated agent profile
pub async fn me(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, Error> {
    let agent = authenticate(&state.db, &headers)?;

    let daily = state
        .db
        .with_conn(|conn| get_and_reset_daily_votes(conn, &agent.id))?;
    let limit = daily_vote_limit(agent.karma);

    Ok(success(MeResponse {
        id: agent.id,
        username: agent.username,
        email: agent.email,
        karma: agent.karma,
        daily_vote_limit: limit,
        votes_remaining: (limit - daily.votes_used).max(0),
        is_admin: agent.is_admin,
        created_at: agent.created_at,
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RotateKeyResponse {
    pub api_key: String,
}

/// POST /api/v1/agents/api-key - rotate the caller's API key
pub async fn rotate_key(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, Error> {
    let agent = authenticate(&state.db, &headers)?;

    let api_key = generate_api_key();
    state
        .db
        .with_conn(|conn| rotate_api_key(conn, &agent.id, &api_key))?;

    info!(username = %agent.username, "API key rotated");

    Ok(success(RotateKeyResponse { api_key }))
}
