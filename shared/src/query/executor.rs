//! Instrumented query execution.
//!
//! Every statement goes through [`QueryExecutor::run`], which records it in
//! the [`QueryLog`] before the database call and fills in timing and outcome
//! afterwards.

use std::sync::Arc;
use std::time::Instant;

use crate::db::{Database, DatabaseError, QueryResult, SqlParam};
use crate::storage::QueryLog;

/// Executes statements against a [`Database`] and logs each call.
///
/// Cloning is cheap; clones share the database and the log.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use shared::db::{statements, InMemoryDatabase};
/// use shared::models::QueryStatus;
/// use shared::query::QueryExecutor;
/// use shared::storage::QueryLog;
///
/// # tokio_test::block_on(async {
/// let executor = QueryExecutor::new(Arc::new(InMemoryDatabase::new()), QueryLog::new_shared());
///
/// let result = executor.run(statements::HEALTH_CHECK, &[]).await.unwrap();
/// assert_eq!(result.row_count, 1);
/// assert_eq!(executor.log().all()[0].status, QueryStatus::Success);
/// # });
/// ```
#[derive(Clone)]
pub struct QueryExecutor {
    database: Arc<dyn Database>,
    log: Arc<QueryLog>,
}

impl std::fmt::Debug for QueryExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryExecutor")
            .field("log", &self.log)
            .finish_non_exhaustive()
    }
}

impl QueryExecutor {
    /// Creates an executor over `database` that records into `log`.
    #[must_use]
    pub fn new(database: Arc<dyn Database>, log: Arc<QueryLog>) -> Self {
        Self { database, log }
    }

    /// Returns the query log this executor records into.
    #[must_use]
    pub fn log(&self) -> &QueryLog {
        &self.log
    }

    /// Returns a shared handle to the query log.
    #[must_use]
    pub fn shared_log(&self) -> Arc<QueryLog> {
        Arc::clone(&self.log)
    }

    /// Runs one statement and records it in the query log.
    ///
    /// The entry is appended as `pending` before the database is called and
    /// completed exactly once when the call resolves. There is no retry and
    /// no timeout: a call that never resolves leaves its entry pending.
    ///
    /// # Errors
    ///
    /// Returns the database error unchanged after recording its message.
    pub async fn run(
        &self,
        statement: &str,
        params: &[SqlParam],
    ) -> Result<QueryResult, DatabaseError> {
        let entry = self.log.append(statement, params.to_vec());
        let start = Instant::now();

        let result = self.database.query(statement, params).await;
        let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        match &result {
            Ok(outcome) => {
                entry.complete_success(elapsed_ms, outcome.row_count);
                tracing::debug!(
                    id = entry.id(),
                    statement,
                    elapsed_ms,
                    row_count = outcome.row_count,
                    "Query succeeded"
                );
            }
            Err(e) => {
                entry.complete_error(elapsed_ms, e.to_string());
                tracing::warn!(
                    id = entry.id(),
                    statement,
                    elapsed_ms,
                    error = %e,
                    "Query failed"
                );
            }
        }

        result
    }
}
