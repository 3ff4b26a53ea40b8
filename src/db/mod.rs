//! SQLite persistence layer
//!
//! All application state lives in one SQLite database. Multi-row
//! operations (vote cast/remove, milestone payouts) run inside rusqlite
//! transactions so a reader never observes a vote without its curator
//! score or a count without its vote row.
//!
//! ## Tables
//!
//! - `agents` - identities, karma, daily vote counters
//! - `projects` / `project_creators` - submissions and their makers
//! - `votes` - one row per (agent, project)
//! - `curator_scores` / `curator_milestones` - scoring state
//! - `notifications` - fan-out records

pub mod agents;
pub mod notifications;
pub mod projects;
pub mod schema;
pub mod votes;

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::Error;

/// Shared handle to the SQLite database
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create the database file
    pub fn open(path: &Path) -> Result<Self, Error> {
        info!("Opening SQLite database at {:?}", path);

        let conn = Connection::open(path)?;

        // WAL for concurrent readers; foreign keys for the cascades the
        // schema relies on
        conn.execute_batch(
            "PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL; PRAGMA foreign_keys=ON;",
        )?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;

        Ok(db)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, Error> {
        debug!("Opening in-memory SQLite database");

        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;

        let db = Self {
            conn: Mutex::new(conn),
        };
        db.init_schema()?;

        Ok(db)
    }

    fn init_schema(&self) -> Result<(), Error> {
        self.with_conn(|conn| schema::init_schema(conn))
    }

    /// Run a read operation against the connection
    pub fn with_conn<F, T>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&Connection) -> Result<T, Error>,
    {
        let conn = self
            .conn
            .lock()
            .map_err(|e| Error::Internal(format!("Lock poisoned: {}", e)))?;
        f(&conn)
    }

    /// Run a write operation with exclusive access (for transactions)
    pub fn with_conn_mut<F, T>(&self, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut Connection) -> Result<T, Error>,
    {
        let mut conn = self
            .conn
            .lock()
            .map_err(|e| Error::Internal(format!("Lock poisoned: {}", e)))?;
        f(&mut conn)
    }
}

/// True if a rusqlite error is a UNIQUE constraint violation, so callers
/// can surface duplicates as conflicts instead of internal errors.
pub fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

/// Current unix timestamp in seconds
pub fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Fresh row id
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
