//! Todos API Server
//!
//! This crate provides the HTTP server for the todo list. Every route runs
//! its SQL through a shared [`QueryExecutor`](shared::query::QueryExecutor),
//! and the resulting query log is browsable through debug endpoints.
//!
//! # Architecture
//!
//! The API server is built on Axum and Tokio, providing:
//! - CRUD endpoints for todos under `/api/todos`
//! - Query log and statistics endpoints under `/api/debug`
//! - A database-backed health check at `/api/health`
//!
//! # Example
//!
//! ```no_run
//! use api::run_server;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     run_server().await
//! }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
pub mod db;
mod error;
mod routes;
mod state;

pub use config::Config;
pub use db::{DatabaseBackend, DatabaseConfig};
pub use error::{ApiError, ErrorResponse};
pub use state::AppState;

use anyhow::Result;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Routes announced at startup.
const ROUTES: &[&str] = &[
    "GET /api/todos - List all todos",
    "POST /api/todos - Create a todo",
    "PUT /api/todos/{id} - Update a todo",
    "DELETE /api/todos/{id} - Delete a todo",
    "PATCH /api/todos/{id}/toggle - Toggle completed",
    "GET /api/health - Health check",
    "GET /api/debug/queries - Show executed queries",
    "DELETE /api/debug/queries - Clear the query log",
    "GET /api/debug/stats - Show statistics",
];

/// Runs the todos API server.
///
/// This function initializes the server with configuration from environment variables
/// and starts listening for incoming connections. It handles graceful shutdown on
/// SIGTERM/SIGINT signals.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The server fails to bind to the configured address
/// - A fatal error occurs during operation
pub async fn run_server() -> Result<()> {
    let config = Config::from_env()?;
    let db_config = DatabaseConfig::from_env()?;
    let database = db::open_database(config.database_backend, &db_config);
    run_server_with_config(config, AppState::new(database)).await
}

/// Runs the todos API server with the provided configuration and state.
///
/// This is useful for testing or when you want to provide configuration programmatically.
///
/// # Errors
///
/// Returns an error if:
/// - The configured address is invalid or cannot be bound
/// - A fatal error occurs during operation
pub async fn run_server_with_config(config: Config, state: AppState) -> Result<()> {
    let addr = config.socket_addr()?;

    tracing::info!(
        host = %config.host,
        port = %config.port,
        "Todos API server starting"
    );

    let app = create_router(state);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(%addr, "Listening for connections");
    for route in ROUTES {
        tracing::info!("  {route}");
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Creates the main application router with all routes and middleware.
///
/// This function is public to allow testing the router without starting a full server.
pub fn create_router(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::health_routes(state.clone()))
        .merge(routes::todos_routes(state.clone()))
        .merge(routes::debug_routes(state));

    Router::new()
        .nest("/api", api)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Waits for a shutdown signal (SIGTERM or SIGINT).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
