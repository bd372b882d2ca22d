//! Health check endpoint.
//!
//! Probes the database with `SELECT 1` through the query executor, so the
//! probe itself shows up in the query log.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::db::statements;

use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// `healthy` or `unhealthy`.
    pub status: String,
    /// Service name.
    pub service: String,
    /// Service version.
    pub version: String,
    /// Time of the successful probe.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Database error if the probe failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl HealthResponse {
    fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            service: "todos-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Some(Utc::now()),
            error: None,
        }
    }

    fn unhealthy(error: String) -> Self {
        Self {
            status: "unhealthy".to_string(),
            service: "todos-api".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: None,
            error: Some(error),
        }
    }
}

/// Creates the health check routes.
pub fn health_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}

/// Health check handler.
///
/// Returns 200 if the database answers `SELECT 1`, 500 otherwise.
async fn health_check(State(state): State<AppState>) -> Response {
    match state.executor().run(statements::HEALTH_CHECK, &[]).await {
        Ok(_) => Json(HealthResponse::healthy()).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(HealthResponse::unhealthy(e.to_string())),
        )
            .into_response(),
    }
}
