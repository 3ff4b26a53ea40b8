//! End-to-end vote flow integration tests
//!
//! Exercises the full vote-cast path against an in-memory database:
//! position and tier assignment, daily quota enforcement, duplicate and
//! ownership rejections, and vote removal semantics.

use molthunt::curator::milestones::check_and_process_milestones;
use molthunt::curator::policy::Tier;
use molthunt::curator::week::current_week_start;
use molthunt::db::agents::{create_agent, Agent, CreateAgentInput};
use molthunt::db::projects::{create_project, launch_project, CreateProjectInput, Project};
use molthunt::db::votes::{unvote_on_slug, vote_on_slug};
use molthunt::db::Database;
use molthunt::error::Error;

fn seed_agent(db: &Database, name: &str) -> Agent {
    db.with_conn(|conn| {
        create_agent(
            conn,
            CreateAgentInput {
                username: name.to_string(),
                email: format!("{}@example.com", name),
                password_hash: "$argon2id$fake".to_string(),
                api_key: format!("mh_{}", name),
            },
        )
    })
    .unwrap()
}

fn seed_launched_project(db: &Database, owner: &Agent, name: &str) -> Project {
    db.with_conn_mut(|conn| {
        let project = create_project(
            conn,
            &owner.id,
            CreateProjectInput {
                name: name.to_string(),
                tagline: "a project".to_string(),
                website_url: None,
            },
        )?;
        launch_project(conn, &project.id)
    })
    .unwrap()
}

fn count_rows(db: &Database, sql: &str) -> i64 {
    db.with_conn(|conn| Ok(conn.query_row(sql, [], |row| row.get(0)).unwrap()))
        .unwrap()
}

#[test]
fn test_vote_creates_vote_and_score_atomically() {
    let db = Database::open_in_memory().unwrap();
    let maker = seed_agent(&db, "maker");
    let voter = seed_agent(&db, "voter");
    let project = seed_launched_project(&db, &maker, "Neat Tool");
    let week = current_week_start();

    let receipt = db
        .with_conn_mut(|conn| vote_on_slug(conn, &voter, &project.slug, week))
        .unwrap();

    assert_eq!(receipt.position, 1);
    assert_eq!(receipt.tier, Tier::Pioneer);
    assert_eq!(receipt.votes_count, 1);
    assert_eq!(receipt.votes_remaining, 4); // karma 0 => quota 5

    assert_eq!(count_rows(&db, "SELECT COUNT(*) FROM votes"), 1);
    assert_eq!(count_rows(&db, "SELECT COUNT(*) FROM curator_scores"), 1);

    // Score row carries the position, tier and week bucket
    db.with_conn(|conn| {
        let (position, tier, week_start, points): (i64, String, i64, i64) = conn
            .query_row(
                "SELECT vote_position, tier, week_start, points_earned FROM curator_scores",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .unwrap();
        assert_eq!(position, 1);
        assert_eq!(tier, "pioneer");
        assert_eq!(week_start, week);
        assert_eq!(points, 0);
        Ok(())
    })
    .unwrap();

    // Maker earned karma and a notification
    db.with_conn(|conn| {
        let karma: i64 = conn
            .query_row(
                "SELECT karma FROM agents WHERE id = ?",
                [&maker.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(karma, 1);
        Ok(())
    })
    .unwrap();
    assert_eq!(count_rows(&db, "SELECT COUNT(*) FROM notifications"), 1);
}

#[test]
fn test_duplicate_vote_is_conflict() {
    let db = Database::open_in_memory().unwrap();
    let maker = seed_agent(&db, "maker");
    let voter = seed_agent(&db, "voter");
    let project = seed_launched_project(&db, &maker, "Once Only");
    let week = current_week_start();

    db.with_conn_mut(|conn| vote_on_slug(conn, &voter, &project.slug, week))
        .unwrap();

    let second = db.with_conn_mut(|conn| vote_on_slug(conn, &voter, &project.slug, week));
    assert!(matches!(second, Err(Error::Conflict(_))));

    // No extra state was created
    assert_eq!(count_rows(&db, "SELECT COUNT(*) FROM votes"), 1);
    assert_eq!(count_rows(&db, "SELECT COUNT(*) FROM curator_scores"), 1);
}

#[test]
fn test_cannot_vote_on_own_or_draft_project() {
    let db = Database::open_in_memory().unwrap();
    let maker = seed_agent(&db, "maker");
    let voter = seed_agent(&db, "voter");
    let week = current_week_start();

    let own = seed_launched_project(&db, &maker, "Own Thing");
    let result = db.with_conn_mut(|conn| vote_on_slug(conn, &maker, &own.slug, week));
    assert!(matches!(
        result,
        Err(Error::BadRequest { code: "OWN_PROJECT", .. })
    ));

    let draft = db
        .with_conn_mut(|conn| {
            create_project(
                conn,
                &maker.id,
                CreateProjectInput {
                    name: "Still Draft".to_string(),
                    tagline: "t".to_string(),
                    website_url: None,
                },
            )
        })
        .unwrap();
    let result = db.with_conn_mut(|conn| vote_on_slug(conn, &voter, &draft.slug, week));
    assert!(matches!(
        result,
        Err(Error::BadRequest { code: "NOT_LAUNCHED", .. })
    ));

    let result = db.with_conn_mut(|conn| vote_on_slug(conn, &voter, "no-such-slug", week));
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[test]
fn test_daily_vote_limit_exhaustion() {
    let db = Database::open_in_memory().unwrap();
    let maker = seed_agent(&db, "maker");
    let voter = seed_agent(&db, "voter"); // karma 0 => quota 5
    let week = current_week_start();

    let projects: Vec<Project> = (0..6)
        .map(|i| seed_launched_project(&db, &maker, &format!("Project {}", i)))
        .collect();

    for project in &projects[..5] {
        db.with_conn_mut(|conn| vote_on_slug(conn, &voter, &project.slug, week))
            .unwrap();
    }

    // Sixth vote today is rejected and leaves no partial state
    let sixth = db.with_conn_mut(|conn| vote_on_slug(conn, &voter, &projects[5].slug, week));
    assert!(matches!(sixth, Err(Error::VoteLimitReached)));

    assert_eq!(count_rows(&db, "SELECT COUNT(*) FROM votes"), 5);
    assert_eq!(count_rows(&db, "SELECT COUNT(*) FROM curator_scores"), 5);

    let votes_count: i64 = count_rows(
        &db,
        "SELECT votes_count FROM projects WHERE slug = 'project-5'",
    );
    assert_eq!(votes_count, 0);
}

#[test]
fn test_unvote_removes_score_but_keeps_milestones() {
    let db = Database::open_in_memory().unwrap();
    let maker = seed_agent(&db, "maker");
    let week = current_week_start();
    let project = seed_launched_project(&db, &maker, "Popular");

    // Three voters; then force a milestone payout for the project
    let voters: Vec<Agent> = (0..3)
        .map(|i| seed_agent(&db, &format!("voter-{}", i)))
        .collect();
    for voter in &voters {
        db.with_conn_mut(|conn| vote_on_slug(conn, voter, &project.slug, week))
            .unwrap();
    }

    // Pretend the project crossed 50 votes so a milestone row exists
    check_and_process_milestones(&db, &project.id, 50).unwrap();
    assert_eq!(count_rows(&db, "SELECT COUNT(*) FROM curator_milestones"), 1);

    db.with_conn_mut(|conn| unvote_on_slug(conn, &voters[0].id, &project.slug))
        .unwrap();

    // Exactly one vote and one score gone, count decremented by one,
    // milestone row untouched
    assert_eq!(count_rows(&db, "SELECT COUNT(*) FROM votes"), 2);
    assert_eq!(count_rows(&db, "SELECT COUNT(*) FROM curator_scores"), 2);
    assert_eq!(count_rows(&db, "SELECT COUNT(*) FROM curator_milestones"), 1);
    let votes_count: i64 =
        count_rows(&db, "SELECT votes_count FROM projects WHERE slug = 'popular'");
    assert_eq!(votes_count, 2);

    // Removing again is NotFound
    let again = db.with_conn_mut(|conn| unvote_on_slug(conn, &voters[0].id, &project.slug));
    assert!(matches!(again, Err(Error::NotFound(_))));

    // Maker karma went 3 up, 1 back down
    db.with_conn(|conn| {
        let karma: i64 = conn
            .query_row(
                "SELECT karma FROM agents WHERE id = ?",
                [&maker.id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(karma, 2);
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_positions_are_sequential_across_voters() {
    let db = Database::open_in_memory().unwrap();
    let maker = seed_agent(&db, "maker");
    let week = current_week_start();
    let project = seed_launched_project(&db, &maker, "Sequencer");

    for i in 0..12i64 {
        let voter = seed_agent(&db, &format!("v{}", i));
        let receipt = db
            .with_conn_mut(|conn| vote_on_slug(conn, &voter, &project.slug, week))
            .unwrap();
        assert_eq!(receipt.position, i + 1);
        assert_eq!(receipt.votes_count, i + 1);

        let expected_tier = if i + 1 <= 10 { Tier::Pioneer } else { Tier::Early };
        assert_eq!(receipt.tier, expected_tier);
    }
}
