//! Application state module.
//!
//! Defines the shared application state that is passed to route handlers.

use shared::db::{Database, InMemoryDatabase};
use shared::query::QueryExecutor;
use shared::storage::QueryLog;
use std::sync::Arc;

/// Application state shared across all request handlers.
///
/// Holds the query executor, which in turn owns the database handle and the
/// query log. The log is created once here and shared by every clone.
#[derive(Clone, Debug)]
pub struct AppState {
    executor: QueryExecutor,
}

impl AppState {
    /// Creates a new application state over the given database with a fresh
    /// query log.
    pub fn new(database: Arc<dyn Database>) -> Self {
        Self::with_query_log(database, QueryLog::new_shared())
    }

    /// Creates a new application state over the given database and log.
    pub fn with_query_log(database: Arc<dyn Database>, log: Arc<QueryLog>) -> Self {
        Self {
            executor: QueryExecutor::new(database, log),
        }
    }

    /// Creates a new application state with an in-memory database.
    ///
    /// This is useful for development and testing.
    #[must_use]
    pub fn with_in_memory_database() -> Self {
        Self::new(Arc::new(InMemoryDatabase::new()))
    }

    /// Returns the query executor.
    #[must_use]
    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    /// Returns the query log.
    #[must_use]
    pub fn query_log(&self) -> &QueryLog {
        self.executor.log()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_in_memory_database()
    }
}
