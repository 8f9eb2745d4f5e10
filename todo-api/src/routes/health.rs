/// Health check endpoint
///
/// Liveness only: answers without touching the database, so it stays green
/// while the database is unreachable.
///
/// # Endpoint
///
/// ```text
/// GET /health
/// ```
///
/// # Response
///
/// ```json
/// { "status": "ok" }
/// ```

use axum::Json;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
}

/// Health check handler
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
