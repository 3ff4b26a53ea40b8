//! Agent rows: registration, lookup, karma and daily-vote counters

use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::Serialize;

use crate::db::{is_unique_violation, new_id, now_secs};
use crate::error::Error;

/// Agent row from the database
#[derive(Debug, Clone)]
pub struct Agent {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub api_key: Option<String>,
    pub karma: i64,
    pub daily_votes_used: i64,
    pub daily_votes_reset_at: Option<i64>,
    pub is_admin: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Agent {
    fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            username: row.get("username")?,
            email: row.get("email")?,
            password_hash: row.get("password_hash")?,
            api_key: row.get("api_key")?,
            karma: row.get("karma")?,
            daily_votes_used: row.get("daily_votes_used")?,
            daily_votes_reset_at: row.get("daily_votes_reset_at")?,
            is_admin: row.get::<_, i64>("is_admin")? != 0,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    pub fn summary(&self) -> AgentSummary {
        AgentSummary {
            id: self.id.clone(),
            username: self.username.clone(),
            karma: self.karma,
        }
    }
}

/// Public agent fields embedded in API payloads
#[derive(Debug, Clone, Serialize)]
pub struct AgentSummary {
    pub id: String,
    pub username: String,
    pub karma: i64,
}

/// Input for registering an agent
pub struct CreateAgentInput {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub api_key: String,
}

/// Insert a new agent. Duplicate username or email surfaces as a conflict.
pub fn create_agent(conn: &Connection, input: CreateAgentInput) -> Result<Agent, Error> {
    let id = new_id();
    let now = now_secs();

    let result = conn.execute(
        "INSERT INTO agents (id, username, email, password_hash, api_key, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?)",
        params![
            id,
            input.username,
            input.email,
            input.password_hash,
            input.api_key,
            now,
            now
        ],
    );

    match result {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(Error::Conflict(
                "Username or email already registered".to_string(),
            ))
        }
        Err(e) => return Err(e.into()),
    }

    get_agent(conn, &id)?.ok_or_else(|| Error::Internal("Agent not found after insert".to_string()))
}

/// Get an agent by id
pub fn get_agent(conn: &Connection, id: &str) -> Result<Option<Agent>, Error> {
    let agent = conn
        .query_row("SELECT * FROM agents WHERE id = ?", params![id], |row| {
            Agent::from_row(row)
        })
        .optional()?;

    Ok(agent)
}

/// Look up an agent by username
pub fn find_by_username(conn: &Connection, username: &str) -> Result<Option<Agent>, Error> {
    let agent = conn
        .query_row(
            "SELECT * FROM agents WHERE username = ?",
            params![username],
            |row| Agent::from_row(row),
        )
        .optional()?;

    Ok(agent)
}

/// Look up an agent by API key
pub fn find_by_api_key(conn: &Connection, api_key: &str) -> Result<Option<Agent>, Error> {
    let agent = conn
        .query_row(
            "SELECT * FROM agents WHERE api_key = ?",
            params![api_key],
            |row| Agent::from_row(row),
        )
        .optional()?;

    Ok(agent)
}

/// Replace the agent's API key
pub fn rotate_api_key(conn: &Connection, agent_id: &str, api_key: &str) -> Result<(), Error> {
    let changes = conn.execute(
        "UPDATE agents SET api_key = ?, updated_at = ? WHERE id = ?",
        params![api_key, now_secs(), agent_id],
    )?;

    if changes == 0 {
        return Err(Error::NotFound("Agent".to_string()));
    }
    Ok(())
}

/// Zero the daily vote counter and stamp the reset time
pub fn reset_daily_votes(conn: &Connection, agent_id: &str, now: i64) -> Result<(), Error> {
    conn.execute(
        "UPDATE agents SET daily_votes_used = 0, daily_votes_reset_at = ? WHERE id = ?",
        params![now, agent_id],
    )?;
    Ok(())
}
