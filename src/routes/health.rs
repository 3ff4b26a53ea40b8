//! Health check endpoint

use axum::response::IntoResponse;

/// GET /health
pub async fn health() -> impl IntoResponse {
    "OK"
}
