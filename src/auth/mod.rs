//! Authentication
//!
//! Agents authenticate with a bearer API key (`mh_` prefix, issued at
//! registration and rotatable). The password set at registration is kept
//! as an Argon2id hash and only checked by the login flow, which trades
//! it for a fresh API key when the old one is lost.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::db::agents::{find_by_api_key, Agent};
use crate::db::Database;
use crate::error::Error;

/// API key prefix identifying molthunt-issued keys
pub const API_KEY_PREFIX: &str = "mh_";

/// Generate a fresh API key: `mh_` plus 32 random alphanumerics
pub fn generate_api_key() -> String {
    let suffix: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect();
    format!("{}{}", API_KEY_PREFIX, suffix)
}

/// Hash a password for storage. The PHC string embeds the salt and the
/// Argon2id parameters, so verification needs nothing else.
pub fn hash_password(password: &str) -> Result<String, Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Internal(format!("Password hashing failed: {}", e)))
}

/// Check a password attempt against a stored PHC hash. A malformed stored
/// hash is server-side corruption, not a bad credential.
pub fn verify_password(attempt: &str, stored: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| Error::Internal(format!("Stored password hash is malformed: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(attempt.as_bytes(), &parsed)
        .is_ok())
}

/// Extract a bearer token from the Authorization header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

/// Resolve the request's bearer API key to an agent
pub fn authenticate(db: &Database, headers: &HeaderMap) -> Result<Agent, Error> {
    let token = bearer_token(headers)
        .ok_or_else(|| Error::Unauthorized("Authentication required".to_string()))?;

    if !token.starts_with(API_KEY_PREFIX) {
        return Err(Error::Unauthorized("Invalid API key".to_string()));
    }

    db.with_conn(|conn| find_by_api_key(conn, token))?
        .ok_or_else(|| Error::Unauthorized("Invalid API key".to_string()))
}
