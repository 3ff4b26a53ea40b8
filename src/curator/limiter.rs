//! Daily vote quota with lazy midnight reset
//!
//! There is no background job: the counter is reset on the first vote
//! attempt after UTC midnight, and incremented by the vote transaction
//! itself when a vote commits.

use rusqlite::{params, Connection, OptionalExtension};

use crate::curator::week::current_day_start;
use crate::db::agents::reset_daily_votes;
use crate::db::now_secs;
use crate::error::Error;

/// Daily vote state for one agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyVotes {
    pub votes_used: i64,
    pub needs_reset: bool,
}

/// Read the agent's daily vote counter, resetting it first if the last
/// reset was before today's UTC midnight (or never happened).
///
/// An unknown agent reports zero votes used; callers authenticate before
/// voting, so this is a should-not-happen path rather than an error.
pub fn get_and_reset_daily_votes(conn: &Connection, agent_id: &str) -> Result<DailyVotes, Error> {
    let counters: Option<(i64, Option<i64>)> = conn
        .query_row(
            "SELECT daily_votes_used, daily_votes_reset_at FROM agents WHERE id = ?",
            params![agent_id],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;

    let Some((votes_used, reset_at)) = counters else {
        return Ok(DailyVotes {
            votes_used: 0,
            needs_reset: false,
        });
    };

    let today_midnight = current_day_start();
    let stale = match reset_at {
        None => true,
        Some(ts) => ts < today_midnight,
    };

    if stale {
        reset_daily_votes(conn, agent_id, now_secs())?;
        return Ok(DailyVotes {
            votes_used: 0,
            needs_reset: true,
        });
    }

    Ok(DailyVotes {
        votes_used,
        needs_reset: false,
    })
}
