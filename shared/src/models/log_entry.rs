//! Query log entry model.
//!
//! Defines the `LogEntry` record kept for every attempted database call and
//! the `QueryStatus` lifecycle it moves through.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::SqlParam;

/// Outcome status of a logged query.
///
/// An entry starts out `Pending` and moves to exactly one terminal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryStatus {
    /// The database call has not resolved yet.
    Pending,
    /// The database call returned a result.
    Success,
    /// The database call failed.
    Error,
}

impl QueryStatus {
    /// Returns `true` for `Success` and `Error`.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl std::fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(match self {
            Self::Pending => "pending",
            Self::Success => "success",
            Self::Error => "error",
        })
    }
}

/// One record describing a single attempted database call and its outcome.
///
/// Serialized with camelCase keys so the debug endpoint keeps the
/// `executionTime` / `rowCount` field names clients already read.
///
/// # Example
///
/// ```
/// use shared::models::{LogEntry, QueryStatus};
///
/// let mut entry = LogEntry::pending(1, "SELECT 1", Vec::new());
/// assert_eq!(entry.status, QueryStatus::Pending);
///
/// assert!(entry.complete_success(3, 1));
/// assert_eq!(entry.row_count, Some(1));
/// assert!(!entry.complete_error(4, "too late"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    /// Monotonically increasing identifier assigned by the query log.
    pub id: u64,

    /// When the entry was created.
    pub timestamp: DateTime<Utc>,

    /// The statement text as sent to the database.
    pub query: String,

    /// Bind parameters in positional order.
    #[serde(default)]
    pub params: Vec<SqlParam>,

    /// Elapsed milliseconds, set once the call resolves.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time: Option<u64>,

    /// Current lifecycle status.
    pub status: QueryStatus,

    /// Rows returned or affected, present only on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_count: Option<u64>,

    /// Failure message, present only on error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl LogEntry {
    /// Creates a `Pending` entry stamped with the current time.
    #[must_use]
    pub fn pending(id: u64, query: impl Into<String>, params: Vec<SqlParam>) -> Self {
        Self {
            id,
            timestamp: Utc::now(),
            query: query.into(),
            params,
            execution_time: None,
            status: QueryStatus::Pending,
            row_count: None,
            error: None,
        }
    }

    /// Returns `true` while the database call is still outstanding.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == QueryStatus::Pending
    }

    /// Marks the entry successful.
    ///
    /// Returns `false` and leaves the entry untouched if it already reached a
    /// terminal status.
    pub fn complete_success(&mut self, elapsed_ms: u64, row_count: u64) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.execution_time = Some(elapsed_ms);
        self.status = QueryStatus::Success;
        self.row_count = Some(row_count);
        true
    }

    /// Marks the entry failed.
    ///
    /// Returns `false` and leaves the entry untouched if it already reached a
    /// terminal status.
    pub fn complete_error(&mut self, elapsed_ms: u64, message: impl Into<String>) -> bool {
        if self.status.is_terminal() {
            return false;
        }
        self.execution_time = Some(elapsed_ms);
        self.status = QueryStatus::Error;
        self.error = Some(message.into());
        true
    }
}
