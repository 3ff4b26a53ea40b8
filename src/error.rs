//! Error types for molthunt
//!
//! Business-rule violations carry the HTTP status and error code the API
//! reports; infrastructure failures collapse to a generic internal error
//! so storage details never leak to callers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Daily vote limit reached")]
    VoteLimitReached,

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    /// Request-level rule violation with its own error code
    /// (NOT_LAUNCHED, OWN_PROJECT, VALIDATION_ERROR, ...)
    #[error("{message}")]
    BadRequest { code: &'static str, message: String },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Error::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Error::bad_request("VALIDATION_ERROR", message)
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Error::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Error::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Error::VoteLimitReached => (StatusCode::TOO_MANY_REQUESTS, "VOTE_LIMIT_REACHED"),
            Error::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Error::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            Error::BadRequest { code, .. } => (StatusCode::BAD_REQUEST, code),
            Error::Database(_) | Error::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        // Log the real failure, report a generic message
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = json!({
            "success": false,
            "error": {
                "code": code,
                "message": message,
            },
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::VoteLimitReached.status_and_code(),
            (StatusCode::TOO_MANY_REQUESTS, "VOTE_LIMIT_REACHED")
        );
        assert_eq!(
            Error::Conflict("already voted".into()).status_and_code(),
            (StatusCode::CONFLICT, "CONFLICT")
        );
        assert_eq!(
            Error::NotFound("Project".into()).status_and_code(),
            (StatusCode::NOT_FOUND, "NOT_FOUND")
        );
    }

    #[test]
    fn test_bad_request_carries_code() {
        let err = Error::bad_request("NOT_LAUNCHED", "Can only vote on launched projects");
        assert_eq!(
            err.status_and_code(),
            (StatusCode::BAD_REQUEST, "NOT_LAUNCHED")
        );
    }

    #[test]
    fn test_database_errors_are_internal() {
        let err = Error::Database(rusqlite::Error::InvalidQuery);
        assert_eq!(err.status_and_code().0, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
