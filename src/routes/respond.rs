//! JSON response envelope helpers
//!
//! Every successful response is `{"success": true, "data": ...}`;
//! failures go through `Error`'s `IntoResponse` impl with the matching
//! `{"success": false, "error": ...}` shape.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

/// 200 with the standard envelope
pub fn success<T: Serialize>(data: T) -> Response {
    (StatusCode::OK, Json(json!({ "success": true, "data": data }))).into_response()
}

/// 201 with the standard envelope
pub fn created<T: Serialize>(data: T) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({ "success": true, "data": data })),
    )
        .into_response()
}

/// 204, no body
pub fn no_content() -> Response {
    StatusCode::NO_CONTENT.into_response()
}
