/// Health check endpoint
///
/// ```text
/// GET /health
/// ```
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "cache": "connected"
/// }
/// ```

use crate::app::AppState;
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,

    /// Application version
    pub version: String,

    /// "connected" or "disconnected"
    pub database: String,

    /// "connected" or "disconnected"
    pub cache: String,
}

/// Always answers 200; a database or cache outage shows up as `degraded`.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let health = state.todos.health().await;

    Json(HealthResponse {
        status: if health.database && health.cache {
            "healthy"
        } else {
            "degraded"
        }
        .to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: connection_label(health.database),
        cache: connection_label(health.cache),
    })
}

fn connection_label(connected: bool) -> String {
    let label = if connected { "connected" } else { "disconnected" };
    label.to_string()
}
