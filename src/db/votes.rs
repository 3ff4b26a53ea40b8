//! Vote casting and removal
//!
//! The whole vote-cast path is one transaction: position resolution, the
//! vote row, its curator score, the project counter, the voter's daily
//! counter, creator karma and notifications all commit together. Computing
//! the position inside the same transaction that inserts the vote closes
//! the window where two concurrent voters could claim the same position.

use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use crate::curator::limiter::get_and_reset_daily_votes;
use crate::curator::policy::{daily_vote_limit, Tier};
use crate::db::agents::Agent;
use crate::db::notifications::{notify, NotifyInput};
use crate::db::projects::{creator_ids, get_by_slug, Project};
use crate::db::{is_unique_violation, new_id, now_secs};
use crate::error::Error;

/// Outcome of a successful vote cast
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteReceipt {
    /// Project the vote landed on
    #[serde(skip)]
    pub project_id: String,
    /// 1-based ordinal among all votes on the project
    pub position: i64,
    pub tier: Tier,
    pub votes_count: i64,
    /// Votes left in the voter's daily quota
    pub votes_remaining: i64,
}

/// Full vote-cast path for a slug: business-rule checks, daily quota, then
/// the transactional cast. Everything the API rejects is detected here
/// before any mutation.
pub fn vote_on_slug(
    conn: &mut Connection,
    voter: &Agent,
    slug: &str,
    week_start: i64,
) -> Result<VoteReceipt, Error> {
    let project =
        get_by_slug(conn, slug)?.ok_or_else(|| Error::NotFound("Project".to_string()))?;

    if !project.is_launched() {
        return Err(Error::bad_request(
            "NOT_LAUNCHED",
            "Can only vote on launched projects",
        ));
    }

    let creators = creator_ids(conn, &project.id)?;
    if creators.contains(&voter.id) {
        return Err(Error::bad_request(
            "OWN_PROJECT",
            "Cannot vote on your own project",
        ));
    }

    // Daily quota, with lazy reset at UTC midnight
    let daily = get_and_reset_daily_votes(conn, &voter.id)?;
    let limit = daily_vote_limit(voter.karma);
    if daily.votes_used >= limit {
        return Err(Error::VoteLimitReached);
    }

    let mut receipt = cast_vote(conn, voter, &project, &creators, week_start)?;
    receipt.votes_remaining = limit - daily.votes_used - 1;
    Ok(receipt)
}

/// Vote removal for a slug: locates the vote, then removes it and its
/// curator score transactionally. Returns the new vote count.
pub fn unvote_on_slug(conn: &mut Connection, voter_id: &str, slug: &str) -> Result<i64, Error> {
    let project =
        get_by_slug(conn, slug)?.ok_or_else(|| Error::NotFound("Project".to_string()))?;

    if !has_voted(conn, voter_id, &project.id)? {
        return Err(Error::NotFound("Vote".to_string()));
    }

    let creators = creator_ids(conn, &project.id)?;
    remove_vote(conn, voter_id, &project, &creators)
}

/// Cast a vote by `voter` on `project`, creating the curator score row in
/// the same transaction. `creators` get karma and a notification.
pub fn cast_vote(
    conn: &mut Connection,
    voter: &Agent,
    project: &Project,
    creators: &[String],
    week_start: i64,
) -> Result<VoteReceipt, Error> {
    let now = now_secs();
    let tx = conn.transaction()?;

    // Position of the about-to-be-inserted vote, resolved under the same
    // transaction as the insert
    let position: i64 = tx.query_row(
        "SELECT COUNT(*) + 1 FROM votes WHERE project_id = ?",
        params![project.id],
        |row| row.get(0),
    )?;
    let tier = Tier::for_position(position);

    let insert = tx.execute(
        "INSERT INTO votes (id, agent_id, project_id, created_at) VALUES (?, ?, ?, ?)",
        params![new_id(), voter.id, project.id, now],
    );
    match insert {
        Ok(_) => {}
        Err(e) if is_unique_violation(&e) => {
            return Err(Error::Conflict("Already voted on this project".to_string()))
        }
        Err(e) => return Err(e.into()),
    }

    tx.execute(
        "INSERT INTO curator_scores
             (id, agent_id, project_id, vote_position, tier, points_earned, week_start, created_at)
         VALUES (?, ?, ?, ?, ?, 0, ?, ?)",
        params![
            new_id(),
            voter.id,
            project.id,
            position,
            tier.as_str(),
            week_start,
            now
        ],
    )?;

    tx.execute(
        "UPDATE projects SET votes_count = votes_count + 1, updated_at = ? WHERE id = ?",
        params![now, project.id],
    )?;
    tx.execute(
        "UPDATE agents SET daily_votes_used = daily_votes_used + 1, updated_at = ? WHERE id = ?",
        params![now, voter.id],
    )?;

    for creator_id in creators {
        tx.execute(
            "UPDATE agents SET karma = karma + 1, updated_at = ? WHERE id = ?",
            params![now, creator_id],
        )?;
        notify(
            &tx,
            NotifyInput {
                agent_id: creator_id,
                kind: "vote",
                title: format!("{} upvoted {}", voter.username, project.name),
                actor_id: Some(&voter.id),
                resource_type: Some("project"),
                resource_id: Some(&project.id),
            },
        )?;
    }

    let votes_count: i64 = tx.query_row(
        "SELECT votes_count FROM projects WHERE id = ?",
        params![project.id],
        |row| row.get(0),
    )?;

    tx.commit()?;

    Ok(VoteReceipt {
        project_id: project.id.clone(),
        position,
        tier,
        votes_count,
        votes_remaining: 0,
    })
}

/// Remove a vote and its curator score. Milestones already paid out stay
/// paid; only the score row disappears. Returns the new vote count.
pub fn remove_vote(
    conn: &mut Connection,
    voter_id: &str,
    project: &Project,
    creators: &[String],
) -> Result<i64, Error> {
    let now = now_secs();
    let tx = conn.transaction()?;

    let deleted = tx.execute(
        "DELETE FROM votes WHERE agent_id = ? AND project_id = ?",
        params![voter_id, project.id],
    )?;
    if deleted == 0 {
        return Err(Error::NotFound("Vote".to_string()));
    }

    tx.execute(
        "DELETE FROM curator_scores WHERE agent_id = ? AND project_id = ?",
        params![voter_id, project.id],
    )?;
    tx.execute(
        "UPDATE projects SET votes_count = votes_count - 1, updated_at = ? WHERE id = ?",
        params![now, project.id],
    )?;

    for creator_id in creators {
        tx.execute(
            "UPDATE agents SET karma = karma - 1, updated_at = ? WHERE id = ?",
            params![now, creator_id],
        )?;
    }

    let votes_count: i64 = tx.query_row(
        "SELECT votes_count FROM projects WHERE id = ?",
        params![project.id],
        |row| row.get(0),
    )?;

    tx.commit()?;

    Ok(votes_count)
}

/// Whether this agent has voted on this project
pub fn has_voted(conn: &Connection, agent_id: &str, project_id: &str) -> Result<bool, Error> {
    let found = conn
        .query_row(
            "SELECT 1 FROM votes WHERE agent_id = ? AND project_id = ?",
            params![agent_id, project_id],
            |_| Ok(()),
        )
        .optional()?;

    Ok(found.is_some())
}
