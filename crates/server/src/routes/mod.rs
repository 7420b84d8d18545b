//! API route handlers
//!
//! - `health`: root banner, liveness, readiness and metrics
//! - `matching`: image upload matching against the catalog

pub mod health;
pub mod matching;

use crate::error::ServerError;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

/// Root endpoint (GET /)
///
/// Static confirmation that the API is up.
///
/// # Response
///
/// ```json
/// { "message": "Visual Product Matcher API is running" }
/// ```
pub async fn api_info() -> impl IntoResponse {
    Json(json!({ "message": "Visual Product Matcher API is running" }))
}

/// 404 Not Found handler
pub async fn not_found() -> ServerError {
    ServerError::NotFound
}
