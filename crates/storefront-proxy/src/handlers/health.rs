//! Health check endpoints for monitoring

use crate::state::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::warn;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service version
    pub version: String,
    /// Timestamp of the check
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// Whether a backend base URL is configured
    pub backend_configured: bool,
    /// Process uptime in seconds
    pub uptime_seconds: u64,
}

/// Readiness check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadinessResponse {
    /// Service readiness status
    pub ready: bool,
    /// Timestamp of the check
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Liveness probe; always 200 while the process serves requests
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        backend_configured: state.base_url().is_ok(),
        uptime_seconds: state.uptime_seconds(),
    })
}

/// Readiness probe; 503 until a backend base URL is configured
///
/// # Errors
///
/// Returns `503 Service Unavailable` without a base URL.
pub async fn readiness_check(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ReadinessResponse>, StatusCode> {
    if let Err(e) = state.base_url() {
        warn!(error = %e, "Readiness check failed");
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }

    Ok(Json(ReadinessResponse {
        ready: true,
        timestamp: chrono::Utc::now(),
    }))
}
