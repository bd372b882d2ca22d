//! Query log debug endpoints.
//!
//! Exposes the in-memory query log and some aggregate figures about the
//! todo table and recent queries.

use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::db::statements;
use shared::models::LogEntry;
use shared::storage::QueryLogStats;

use crate::error::ApiError;
use crate::state::AppState;

/// Response for GET /debug/queries.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryLogResponse {
    /// Number of retained entries.
    pub total: usize,
    /// Retained entries, newest first.
    pub queries: Vec<LogEntry>,
}

/// Response for DELETE /debug/queries.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Confirmation message.
    pub message: String,
}

/// Todo counts reported by GET /debug/stats.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseStats {
    /// All todos.
    pub total_todos: i64,
    /// Todos with `completed = true`.
    pub completed_todos: i64,
    /// Todos not completed, `NULL` included.
    pub pending_todos: i64,
}

/// Response for GET /debug/stats.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    /// Todo counts.
    pub database: DatabaseStats,
    /// Query log figures.
    pub queries: QueryLogStats,
}

/// Creates the debug routes.
///
/// # Routes
///
/// - `GET /debug/queries` - List the query log
/// - `DELETE /debug/queries` - Clear the query log
/// - `GET /debug/stats` - Todo counts and query log figures
pub fn debug_routes(state: AppState) -> Router {
    Router::new()
        .route("/debug/queries", get(list_queries).delete(clear_queries))
        .route("/debug/stats", get(stats))
        .with_state(state)
}

/// Handler for GET /debug/queries.
async fn list_queries(State(state): State<AppState>) -> Json<QueryLogResponse> {
    let queries = state.query_log().all();
    Json(QueryLogResponse {
        total: queries.len(),
        queries,
    })
}

/// Handler for DELETE /debug/queries.
async fn clear_queries(State(state): State<AppState>) -> Json<MessageResponse> {
    state.query_log().clear();
    tracing::info!("Query log cleared");
    Json(MessageResponse {
        message: "Query log cleared".to_string(),
    })
}

/// Handler for GET /debug/stats.
///
/// The three counts run through the executor and therefore appear in the
/// query figures of the same response.
async fn stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let executor = state.executor();
    let total = executor.run(statements::COUNT_TODOS, &[]).await?;
    let completed = executor.run(statements::COUNT_COMPLETED_TODOS, &[]).await?;
    let pending = executor.run(statements::COUNT_PENDING_TODOS, &[]).await?;

    Ok(Json(StatsResponse {
        database: DatabaseStats {
            total_todos: total.scalar_i64("count").unwrap_or(0),
            completed_todos: completed.scalar_i64("count").unwrap_or(0),
            pending_todos: pending.scalar_i64("count").unwrap_or(0),
        },
        queries: state.query_log().stats(),
    }))
}
