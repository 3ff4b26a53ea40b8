//! Milestone detection and point fan-out
//!
//! After a vote commits, the project's new vote count is checked against
//! the fixed thresholds. The first crossing of each threshold pays
//! tier-scaled points to every curator score on the project. The unique
//! `(project, milestone)` row makes re-processing a no-op, so this is safe
//! to run again on the next vote if a previous attempt failed part-way.

use std::sync::Arc;

use rusqlite::{params, Connection, OptionalExtension};
use tracing::{error, info};

use crate::curator::policy::{milestone_points, Tier, MILESTONES};
use crate::db::{new_id, now_secs, Database};
use crate::error::Error;

/// Evaluate all milestone thresholds for a project's current vote count
/// and pay out any newly crossed ones.
pub fn check_and_process_milestones(
    db: &Database,
    project_id: &str,
    new_vote_count: i64,
) -> Result<(), Error> {
    db.with_conn_mut(|conn| {
        for milestone in MILESTONES {
            // Thresholds are ascending; nothing past the first unmet one
            // can be met either
            if new_vote_count < milestone {
                break;
            }
            process_one(conn, project_id, milestone)?;
        }
        Ok(())
    })
}

/// Record and pay out a single milestone if it has not been paid before.
/// The guard row insert and every point increment commit atomically.
fn process_one(conn: &mut Connection, project_id: &str, milestone: i64) -> Result<(), Error> {
    let tx = conn.transaction()?;

    let already_paid = tx
        .query_row(
            "SELECT 1 FROM curator_milestones WHERE project_id = ? AND milestone = ?",
            params![project_id, milestone],
            |_| Ok(()),
        )
        .optional()?
        .is_some();
    if already_paid {
        return Ok(());
    }

    tx.execute(
        "INSERT INTO curator_milestones (id, project_id, milestone, reached_at) VALUES (?, ?, ?, ?)",
        params![new_id(), project_id, milestone, now_secs()],
    )?;

    // Every curator who voted on this project, whenever they voted
    let scores: Vec<(String, Tier)> = {
        let mut stmt =
            tx.prepare("SELECT id, tier FROM curator_scores WHERE project_id = ?")?;
        let rows = stmt.query_map(params![project_id], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        rows.map(|r| r.map(|(id, tier)| (id, Tier::parse(&tier))))
            .collect::<Result<Vec<_>, _>>()?
    };

    let curators = scores.len();
    for (score_id, tier) in scores {
        let points = milestone_points(milestone, tier);
        // Atomic increment in SQL, not read-modify-write in application code
        tx.execute(
            "UPDATE curator_scores SET points_earned = points_earned + ? WHERE id = ?",
            params![points, score_id],
        )?;
    }

    tx.commit()?;

    info!(
        project_id = %project_id,
        milestone,
        curators,
        "milestone reached, points distributed"
    );

    Ok(())
}

/// Fire-and-forget milestone check, detached from the voting request.
/// Failures are logged and retried implicitly by the next vote's check.
pub fn spawn_milestone_check(db: Arc<Database>, project_id: String, new_vote_count: i64) {
    tokio::spawn(async move {
        if let Err(e) = check_and_process_milestones(&db, &project_id, new_vote_count) {
            error!(
                project_id = %project_id,
                error = %e,
                "milestone processing failed"
            );
        }
    });
}
