//! Curator leaderboard
//!
//! Stateless read-time aggregation: sum points per agent over a period of
//! week buckets, rank descending, attach the reward for each rank band and
//! the agent's best pick. Nothing is stored; the ranking is recomputed per
//! request from the curator score rows.

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use crate::curator::policy::molth_reward;
use crate::curator::week::WEEK_SECS;
use crate::db::agents::AgentSummary;
use crate::db::projects::ProjectSummary;
use crate::error::Error;

/// Leaderboard period filter over `week_start` buckets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    #[default]
    Week,
    LastWeek,
    All,
}

impl Period {
    /// Half-open `[lower, upper)` bounds on `week_start`, if any, given
    /// the current week's start timestamp.
    fn bounds(&self, current_week_start: i64) -> (Option<i64>, Option<i64>) {
        match self {
            Period::Week => (Some(current_week_start), None),
            Period::LastWeek => (
                Some(current_week_start - WEEK_SECS),
                Some(current_week_start),
            ),
            Period::All => (None, None),
        }
    }
}

/// One ranked leaderboard row
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    /// 1-based rank
    pub rank: usize,
    pub agent: AgentSummary,
    pub points: i64,
    /// The agent's highest-scoring pick within the period
    pub best_pick: Option<ProjectSummary>,
    pub molth_reward: i64,
}

/// Rank the top `limit` curators for a period.
///
/// Ties on points break deterministically by agent id, ascending.
pub fn top_curators(
    conn: &Connection,
    period: Period,
    limit: u32,
    current_week_start: i64,
) -> Result<Vec<LeaderboardEntry>, Error> {
    let (lower, upper) = period.bounds(current_week_start);

    let mut sql = String::from(
        "SELECT cs.agent_id, SUM(cs.points_earned) AS total
         FROM curator_scores cs",
    );
    let mut conditions = vec![];
    let mut bind: Vec<i64> = vec![];

    if let Some(lo) = lower {
        conditions.push("cs.week_start >= ?");
        bind.push(lo);
    }
    if let Some(hi) = upper {
        conditions.push("cs.week_start < ?");
        bind.push(hi);
    }
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" GROUP BY cs.agent_id ORDER BY total DESC, cs.agent_id ASC LIMIT ?");
    bind.push(limit as i64);

    let mut stmt = conn.prepare(&sql)?;
    let bind_refs: Vec<&dyn rusqlite::ToSql> =
        bind.iter().map(|v| v as &dyn rusqlite::ToSql).collect();

    let totals: Vec<(String, i64)> = stmt
        .query_map(bind_refs.as_slice(), |row| {
            Ok((row.get(0)?, row.get(1)?))
        })?
        .collect::<Result<Vec<_>, _>>()?;

    let mut entries = Vec::with_capacity(totals.len());
    for (index, (agent_id, points)) in totals.into_iter().enumerate() {
        let rank = index + 1;
        let agent = agent_summary(conn, &agent_id)?;
        let best_pick = best_pick(conn, &agent_id, lower, upper)?;

        entries.push(LeaderboardEntry {
            rank,
            agent,
            points,
            best_pick,
            molth_reward: molth_reward(rank),
        });
    }

    Ok(entries)
}

fn agent_summary(conn: &Connection, agent_id: &str) -> Result<AgentSummary, Error> {
    let summary = conn
        .query_row(
            "SELECT id, username, karma FROM agents WHERE id = ?",
            params![agent_id],
            |row| {
                Ok(AgentSummary {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    karma: row.get(2)?,
                })
            },
        )
        .optional()?;

    // Scores cascade-delete with their agent, so a missing agent row here
    // means it was removed mid-query; report a placeholder rather than 500
    Ok(summary.unwrap_or_else(|| AgentSummary {
        id: agent_id.to_string(),
        username: "[deleted]".to_string(),
        karma: 0,
    }))
}

/// The agent's highest-scoring curator score row within the period, joined
/// to its project. Ties break by earliest score.
fn best_pick(
    conn: &Connection,
    agent_id: &str,
    lower: Option<i64>,
    upper: Option<i64>,
) -> Result<Option<ProjectSummary>, Error> {
    let mut sql = String::from(
        "SELECT p.id, p.slug, p.name, p.votes_count
         FROM curator_scores cs
         JOIN projects p ON p.id = cs.project_id
         WHERE cs.agent_id = ?",
    );
    let mut bind: Vec<Box<dyn rusqlite::ToSql>> = vec![Box::new(agent_id.to_string())];

    if let Some(lo) = lower {
        sql.push_str(" AND cs.week_start >= ?");
        bind.push(Box::new(lo));
    }
    if let Some(hi) = upper {
        sql.push_str(" AND cs.week_start < ?");
        bind.push(Box::new(hi));
    }
    sql.push_str(" ORDER BY cs.points_earned DESC, cs.created_at ASC LIMIT 1");

    let bind_refs: Vec<&dyn rusqlite::ToSql> = bind.iter().map(|b| b.as_ref()).collect();

    let pick = conn
        .query_row(&sql, bind_refs.as_slice(), |row| {
            Ok(ProjectSummary {
                id: row.get(0)?,
                slug: row.get(1)?,
                name: row.get(2)?,
                votes_count: row.get(3)?,
            })
        })
        .optional()?;

    Ok(pick)
}
