//! Notification records
//!
//! Written transactionally alongside the events that cause them (vote
//! cast, milestone reached) and read back through the notifications API.

use rusqlite::{params, Connection, Row};
use serde::Serialize;

use crate::db::{new_id, now_secs};
use crate::error::Error;

/// Notification row from the database
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub agent_id: String,
    pub kind: String,
    pub title: String,
    pub actor_id: Option<String>,
    pub resource_type: Option<String>,
    pub resource_id: Option<String>,
    pub read: bool,
    pub created_at: i64,
}

impl Notification {
    fn from_row(row: &Row) -> Result<Self, rusqlite::Error> {
        Ok(Self {
            id: row.get("id")?,
            agent_id: row.get("agent_id")?,
            kind: row.get("kind")?,
            title: row.get("title")?,
            actor_id: row.get("actor_id")?,
            resource_type: row.get("resource_type")?,
            resource_id: row.get("resource_id")?,
            read: row.get::<_, i64>("read")? != 0,
            created_at: row.get("created_at")?,
        })
    }
}

/// Input for a new notification
pub struct NotifyInput<'a> {
    pub agent_id: &'a str,
    pub kind: &'a str,
    pub title: String,
    pub actor_id: Option<&'a str>,
    pub resource_type: Option<&'a str>,
    pub resource_id: Option<&'a str>,
}

/// Insert one notification row. Callable inside a larger transaction.
pub fn notify(conn: &Connection, input: NotifyInput) -> Result<(), Error> {
    conn.execute(
        "INSERT INTO notifications (id, agent_id, kind, title, actor_id, resource_type, resource_id, created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        params![
            new_id(),
            input.agent_id,
            input.kind,
            input.title,
            input.actor_id,
            input.resource_type,
            input.resource_id,
            now_secs(),
        ],
    )?;
    Ok(())
}

/// List an agent's notifications, newest first
pub fn list_for_agent(
    conn: &Connection,
    agent_id: &str,
    unread_only: bool,
    limit: u32,
) -> Result<Vec<Notification>, Error> {
    let sql = if unread_only {
        "SELECT * FROM notifications WHERE agent_id = ? AND read = 0
         ORDER BY created_at DESC LIMIT ?"
    } else {
        "SELECT * FROM notifications WHERE agent_id = ?
         ORDER BY created_at DESC LIMIT ?"
    };

    let mut stmt = conn.prepare(sql)?;
    let rows: Vec<Notification> = stmt
        .query_map(params![agent_id, limit], |row| Notification::from_row(row))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Mark all of an agent's notifications read; returns how many changed
pub fn mark_all_read(conn: &Connection, agent_id: &str) -> Result<usize, Error> {
    let changes = conn.execute(
        "UPDATE notifications SET read = 1 WHERE agent_id = ? AND read = 0",
        params![agent_id],
    )?;
    Ok(changes)
}
