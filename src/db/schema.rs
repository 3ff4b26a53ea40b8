//! Database schema definitions

use rusqlite::Connection;
use tracing::info;

use crate::error::Error;

/// Current schema version for migrations
pub const SCHEMA_VERSION: i32 = 1;

/// Initialize the database schema
pub fn init_schema(conn: &Connection) -> Result<(), Error> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        info!("Creating new database schema v{}", SCHEMA_VERSION);
        create_tables(conn)?;
        set_schema_version(conn, SCHEMA_VERSION)?;
    } else if current_version < SCHEMA_VERSION {
        info!(
            "Migrating schema from v{} to v{}",
            current_version, SCHEMA_VERSION
        );
        migrate_schema(conn, current_version)?;
    } else {
        info!("Database schema is up to date (v{})", current_version);
    }

    Ok(())
}

/// Get current schema version (0 if not initialized)
fn get_schema_version(conn: &Connection) -> Result<i32, Error> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
        [],
    )?;

    let version: i32 = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .unwrap_or(0);

    Ok(version)
}

/// Set schema version
fn set_schema_version(conn: &Connection, version: i32) -> Result<(), Error> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?)", [version])?;
    Ok(())
}

/// Create all tables
fn create_tables(conn: &Connection) -> Result<(), Error> {
    conn.execute_batch(AGENTS_SCHEMA)?;
    conn.execute_batch(PROJECTS_SCHEMA)?;
    conn.execute_batch(VOTES_SCHEMA)?;
    conn.execute_batch(CURATORS_SCHEMA)?;
    conn.execute_batch(NOTIFICATIONS_SCHEMA)?;
    conn.execute_batch(INDEXES_SCHEMA)?;
    Ok(())
}

/// Migrate schema from older version
fn migrate_schema(conn: &Connection, from_version: i32) -> Result<(), Error> {
    // Add migration steps here as schema evolves
    match from_version {
        _ => {}
    }

    set_schema_version(conn, SCHEMA_VERSION)?;
    Ok(())
}

/// Agents table schema
const AGENTS_SCHEMA: &str = r#"
-- Registered agents. Karma determines the daily vote quota; the daily
-- vote counter is reset lazily on the first vote attempt after UTC midnight.
CREATE TABLE IF NOT EXISTS agents (
    id TEXT PRIMARY KEY NOT NULL,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    api_key TEXT UNIQUE,
    karma INTEGER NOT NULL DEFAULT 0,
    daily_votes_used INTEGER NOT NULL DEFAULT 0,
    daily_votes_reset_at INTEGER,
    is_admin INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
"#;

/// Projects schema
const PROJECTS_SCHEMA: &str = r#"
-- Submitted projects. votes_count moves transactionally with vote rows.
CREATE TABLE IF NOT EXISTS projects (
    id TEXT PRIMARY KEY NOT NULL,
    slug TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    tagline TEXT NOT NULL,
    website_url TEXT,
    status TEXT NOT NULL DEFAULT 'draft' CHECK (status IN ('draft', 'launched')),
    votes_count INTEGER NOT NULL DEFAULT 0,
    launched_at INTEGER,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS project_creators (
    project_id TEXT NOT NULL,
    agent_id TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'maker',
    PRIMARY KEY (project_id, agent_id),
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE,
    FOREIGN KEY (agent_id) REFERENCES agents(id) ON DELETE CASCADE
);
"#;

/// Votes schema
const VOTES_SCHEMA: &str = r#"
-- One vote per (agent, project), enforced by the unique index.
CREATE TABLE IF NOT EXISTS votes (
    id TEXT PRIMARY KEY NOT NULL,
    agent_id TEXT NOT NULL,
    project_id TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    UNIQUE (agent_id, project_id),
    FOREIGN KEY (agent_id) REFERENCES agents(id) ON DELETE CASCADE,
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);
"#;

/// Curator scoring schema
const CURATORS_SCHEMA: &str = r#"
-- One score row per (agent, project) vote, created atomically with the vote.
-- points_earned only grows, incremented as the project crosses milestones.
CREATE TABLE IF NOT EXISTS curator_scores (
    id TEXT PRIMARY KEY NOT NULL,
    agent_id TEXT NOT NULL,
    project_id TEXT NOT NULL,
    vote_position INTEGER NOT NULL,
    tier TEXT NOT NULL CHECK (tier IN ('pioneer', 'early', 'adopter', 'standard')),
    points_earned INTEGER NOT NULL DEFAULT 0,
    week_start INTEGER NOT NULL,
    created_at INTEGER NOT NULL,
    UNIQUE (agent_id, project_id),
    FOREIGN KEY (agent_id) REFERENCES agents(id) ON DELETE CASCADE,
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);

-- Idempotency guard: one row per (project, milestone) means each
-- threshold pays out exactly once, no matter how often it is re-checked.
CREATE TABLE IF NOT EXISTS curator_milestones (
    id TEXT PRIMARY KEY NOT NULL,
    project_id TEXT NOT NULL,
    milestone INTEGER NOT NULL,
    reached_at INTEGER NOT NULL,
    UNIQUE (project_id, milestone),
    FOREIGN KEY (project_id) REFERENCES projects(id) ON DELETE CASCADE
);
"#;

/// Notifications schema
const NOTIFICATIONS_SCHEMA: &str = r#"
-- Fire-and-forget notification records written during vote transactions.
CREATE TABLE IF NOT EXISTS notifications (
    id TEXT PRIMARY KEY NOT NULL,
    agent_id TEXT NOT NULL,
    kind TEXT NOT NULL,
    title TEXT NOT NULL,
    actor_id TEXT,
    resource_type TEXT,
    resource_id TEXT,
    read INTEGER NOT NULL DEFAULT 0,
    created_at INTEGER NOT NULL,
    FOREIGN KEY (agent_id) REFERENCES agents(id) ON DELETE CASCADE
);
"#;

/// Index definitions for fast queries
const INDEXES_SCHEMA: &str = r#"
CREATE INDEX IF NOT EXISTS idx_agents_api_key ON agents(api_key);

CREATE INDEX IF NOT EXISTS idx_projects_status ON projects(status);
CREATE INDEX IF NOT EXISTS idx_projects_launched_at ON projects(launched_at);
CREATE INDEX IF NOT EXISTS idx_projects_votes_count ON projects(votes_count);

CREATE INDEX IF NOT EXISTS idx_votes_project ON votes(project_id);
CREATE INDEX IF NOT EXISTS idx_votes_agent ON votes(agent_id);

CREATE INDEX IF NOT EXISTS idx_curator_scores_agent ON curator_scores(agent_id);
CREATE INDEX IF NOT EXISTS idx_curator_scores_project ON curator_scores(project_id);
CREATE INDEX IF NOT EXISTS idx_curator_scores_week ON curator_scores(week_start);

CREATE INDEX IF NOT EXISTS idx_curator_milestones_project ON curator_milestones(project_id);

CREATE INDEX IF NOT EXISTS idx_notifications_agent ON notifications(agent_id, read);
"#;
