//! Health check handler

use axum::Json;
use serde::Serialize;

/// Public health check response
///
/// Simple status indicator for load balancers and health monitoring.
#[derive(Debug, Serialize)]
pub struct HealthCheckResponse {
    /// Status indicator (always "ok")
    pub status: String,
}

/// Public health check handler
///
/// Does not touch the database and does not require authentication.
///
/// # Example
/// ```bash
/// curl http://localhost:5123/api/health
/// # Returns: {"status":"ok"}
/// ```
pub async fn health_check() -> Json<HealthCheckResponse> {
    tracing::debug!("Health check requested");
    Json(HealthCheckResponse {
        status: "ok".to_string(),
    })
}
