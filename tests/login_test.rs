//! Credential login integration tests
//!
//! The login flow trades a username + password for a fresh API key,
//! invalidating the old one. These run the same calls the handler makes,
//! with real Argon2 hashes.

use molthunt::auth::{generate_api_key, hash_password, verify_password};
use molthunt::db::agents::{
    create_agent, find_by_api_key, find_by_username, rotate_api_key, CreateAgentInput,
};
use molthunt::db::Database;

fn register(db: &Database, username: &str, password: &str) -> String {
    let api_key = generate_api_key();
    db.with_conn(|conn| {
        create_agent(
            conn,
            CreateAgentInput {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password_hash: hash_password(password).unwrap(),
                api_key: api_key.clone(),
            },
        )
    })
    .unwrap();
    api_key
}

#[test]
fn test_login_reissues_key_and_invalidates_old_one() {
    let db = Database::open_in_memory().unwrap();
    let old_key = register(&db, "comeback", "hunter2hunter2");

    let agent = db
        .with_conn(|conn| find_by_username(conn, "comeback"))
        .unwrap()
        .expect("registered agent");
    assert!(verify_password("hunter2hunter2", &agent.password_hash).unwrap());

    let new_key = generate_api_key();
    db.with_conn(|conn| rotate_api_key(conn, &agent.id, &new_key))
        .unwrap();

    db.with_conn(|conn| {
        assert!(find_by_api_key(conn, &old_key).unwrap().is_none());
        assert_eq!(
            find_by_api_key(conn, &new_key).unwrap().unwrap().id,
            agent.id
        );
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_wrong_password_is_rejected() {
    let db = Database::open_in_memory().unwrap();
    register(&db, "careful", "correct-password");

    let agent = db
        .with_conn(|conn| find_by_username(conn, "careful"))
        .unwrap()
        .unwrap();

    assert!(!verify_password("wrong-password", &agent.password_hash).unwrap());
}

#[test]
fn test_unknown_username_finds_nothing() {
    let db = Database::open_in_memory().unwrap();
    let missing = db
        .with_conn(|conn| find_by_username(conn, "never-registered"))
        .unwrap();
    assert!(missing.is_none());
}
