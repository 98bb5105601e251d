//! Health check endpoint

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::AppState;

/// Health check response: status, module name, version and uptime
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub module: String,
    pub version: String,
    pub uptime_secs: i64,
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = chrono::Utc::now() - state.startup_time;

    Json(HealthResponse {
        status: "ok".to_string(),
        module: "agri-ui".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: uptime.num_seconds().max(0),
    })
}

/// Build health check routes
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
