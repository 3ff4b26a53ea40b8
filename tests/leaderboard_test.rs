//! Leaderboard aggregation integration tests
//!
//! Rows are seeded directly with fixed ids and week buckets so ordering,
//! tie-breaking, period filtering, and reward mapping are all deterministic.

use rusqlite::params;

use molthunt::curator::leaderboard::{top_curators, Period};
use molthunt::curator::week::{current_week_start, WEEK_SECS};
use molthunt::db::Database;

fn seed_agent(db: &Database, id: &str, username: &str, karma: i64) {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO agents
                 (id, username, email, password_hash, api_key, karma, created_at, updated_at)
             VALUES (?, ?, ?, '$argon2id$fake', ?, ?, 0, 0)",
            params![id, username, format!("{}@example.com", username), format!("mh_{}", id), karma],
        )
        .unwrap();
        Ok(())
    })
    .unwrap();
}

fn seed_project(db: &Database, id: &str, slug: &str, name: &str, votes: i64) {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO projects
                 (id, slug, name, tagline, status, votes_count, launched_at, created_at, updated_at)
             VALUES (?, ?, ?, 'tag', 'launched', ?, 0, 0, 0)",
            params![id, slug, name, votes],
        )
        .unwrap();
        Ok(())
    })
    .unwrap();
}

fn seed_score(db: &Database, agent_id: &str, project_id: &str, points: i64, week_start: i64) {
    db.with_conn(|conn| {
        conn.execute(
            "INSERT INTO curator_scores
                 (id, agent_id, project_id, vote_position, tier, points_earned, week_start, created_at)
             VALUES (?, ?, ?, 1, 'standard', ?, ?, ?)",
            params![
                uuid::Uuid::new_v4().to_string(),
                agent_id,
                project_id,
                points,
                week_start,
                week_start,
            ],
        )
        .unwrap();
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_ordering_ranks_and_rewards() {
    let db = Database::open_in_memory().unwrap();
    let week = current_week_start();

    seed_agent(&db, "a-bronze", "bronze", 0);
    seed_agent(&db, "a-gold", "gold", 0);
    seed_agent(&db, "a-silver", "silver", 0);
    seed_project(&db, "p-1", "p-1", "One", 10);

    seed_score(&db, "a-gold", "p-1", 300, week);
    seed_score(&db, "a-silver", "p-1", 200, week);
    seed_score(&db, "a-bronze", "p-1", 100, week);

    let board = db
        .with_conn(|conn| top_curators(conn, Period::Week, 50, week))
        .unwrap();

    assert_eq!(board.len(), 3);
    assert_eq!(board[0].agent.username, "gold");
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[0].points, 300);
    assert_eq!(board[0].molth_reward, 1000);
    assert_eq!(board[1].agent.username, "silver");
    assert_eq!(board[1].molth_reward, 750);
    assert_eq!(board[2].agent.username, "bronze");
    assert_eq!(board[2].molth_reward, 500);
}

#[test]
fn test_points_sum_across_projects() {
    let db = Database::open_in_memory().unwrap();
    let week = current_week_start();

    seed_agent(&db, "a-1", "spread", 0);
    seed_project(&db, "p-1", "p-1", "One", 10);
    seed_project(&db, "p-2", "p-2", "Two", 20);
    seed_score(&db, "a-1", "p-1", 30, week);
    seed_score(&db, "a-1", "p-2", 45, week);

    let board = db
        .with_conn(|conn| top_curators(conn, Period::Week, 50, week))
        .unwrap();

    assert_eq!(board.len(), 1);
    assert_eq!(board[0].points, 75);
}

#[test]
fn test_ties_break_by_agent_id_ascending() {
    let db = Database::open_in_memory().unwrap();
    let week = current_week_start();

    seed_agent(&db, "a-zzz", "zed", 0);
    seed_agent(&db, "a-aaa", "abe", 0);
    seed_project(&db, "p-1", "p-1", "One", 10);
    seed_score(&db, "a-zzz", "p-1", 100, week);
    seed_score(&db, "a-aaa", "p-1", 100, week);

    let board = db
        .with_conn(|conn| top_curators(conn, Period::Week, 50, week))
        .unwrap();

    assert_eq!(board[0].agent.id, "a-aaa");
    assert_eq!(board[0].rank, 1);
    assert_eq!(board[1].agent.id, "a-zzz");
    assert_eq!(board[1].rank, 2);
    // Equal points, different ranks, different rewards
    assert_eq!(board[0].molth_reward, 1000);
    assert_eq!(board[1].molth_reward, 750);
}

#[test]
fn test_period_filtering() {
    let db = Database::open_in_memory().unwrap();
    let week = current_week_start();

    seed_agent(&db, "a-now", "now", 0);
    seed_agent(&db, "a-then", "then", 0);
    seed_project(&db, "p-1", "p-1", "One", 10);
    seed_project(&db, "p-2", "p-2", "Two", 20);

    seed_score(&db, "a-now", "p-1", 50, week);
    seed_score(&db, "a-then", "p-1", 80, week - WEEK_SECS);
    seed_score(&db, "a-then", "p-2", 5, week);

    let this_week = db
        .with_conn(|conn| top_curators(conn, Period::Week, 50, week))
        .unwrap();
    assert_eq!(this_week.len(), 2);
    assert_eq!(this_week[0].agent.id, "a-now");
    assert_eq!(this_week[0].points, 50);
    assert_eq!(this_week[1].points, 5);

    let last_week = db
        .with_conn(|conn| top_curators(conn, Period::LastWeek, 50, week))
        .unwrap();
    assert_eq!(last_week.len(), 1);
    assert_eq!(last_week[0].agent.id, "a-then");
    assert_eq!(last_week[0].points, 80);

    let all_time = db
        .with_conn(|conn| top_curators(conn, Period::All, 50, week))
        .unwrap();
    assert_eq!(all_time.len(), 2);
    assert_eq!(all_time[0].agent.id, "a-then");
    assert_eq!(all_time[0].points, 85);
}

#[test]
fn test_best_pick_is_highest_scoring_in_period() {
    let db = Database::open_in_memory().unwrap();
    let week = current_week_start();

    seed_agent(&db, "a-1", "picker", 0);
    seed_project(&db, "p-small", "small", "Small", 3);
    seed_project(&db, "p-big", "big", "Big", 120);
    seed_project(&db, "p-old", "old", "Old", 999);

    seed_score(&db, "a-1", "p-small", 10, week);
    seed_score(&db, "a-1", "p-big", 60, week);
    // Higher score, but outside the current week
    seed_score(&db, "a-1", "p-old", 500, week - WEEK_SECS);

    let board = db
        .with_conn(|conn| top_curators(conn, Period::Week, 50, week))
        .unwrap();

    let pick = board[0].best_pick.as_ref().unwrap();
    assert_eq!(pick.slug, "big");
    assert_eq!(pick.votes_count, 120);

    let all_time = db
        .with_conn(|conn| top_curators(conn, Period::All, 50, week))
        .unwrap();
    assert_eq!(all_time[0].best_pick.as_ref().unwrap().slug, "old");
}

#[test]
fn test_limit_truncates_rankings() {
    let db = Database::open_in_memory().unwrap();
    let week = current_week_start();

    seed_project(&db, "p-1", "p-1", "One", 10);
    for i in 0..10i64 {
        let id = format!("a-{:02}", i);
        seed_agent(&db, &id, &format!("agent{:02}", i), 0);
        seed_score(&db, &id, "p-1", 100 - i, week);
    }

    let board = db
        .with_conn(|conn| top_curators(conn, Period::Week, 3, week))
        .unwrap();

    assert_eq!(board.len(), 3);
    assert_eq!(board[0].agent.id, "a-00");
    assert_eq!(board[2].agent.id, "a-02");
}

#[test]
fn test_empty_board() {
    let db = Database::open_in_memory().unwrap();
    let board = db
        .with_conn(|conn| top_curators(conn, Period::Week, 50, current_week_start()))
        .unwrap();
    assert!(board.is_empty());
}
