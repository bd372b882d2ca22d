//! Bounded in-memory query log.
//!
//! Keeps the most recent database calls, newest first, for the debug
//! endpoints. Nothing here is ever persisted.

use crate::db::SqlParam;
use crate::models::{LogEntry, QueryStatus};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Number of entries retained by [`QueryLog::new`].
pub const DEFAULT_CAPACITY: usize = 100;

/// Shared handle to one log entry.
///
/// Returned by [`QueryLog::append`] so the caller can record the outcome once
/// the database call resolves. The handle stays usable after the entry has
/// been evicted from the log; the outcome is then simply not visible anymore.
#[derive(Debug, Clone)]
pub struct EntryHandle {
    entry: Arc<Mutex<LogEntry>>,
}

impl EntryHandle {
    fn new(entry: LogEntry) -> Self {
        Self {
            entry: Arc::new(Mutex::new(entry)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, LogEntry> {
        self.entry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the entry id.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.lock().id
    }

    /// Returns a copy of the entry in its current state.
    #[must_use]
    pub fn snapshot(&self) -> LogEntry {
        self.lock().clone()
    }

    /// Records a successful outcome. Ignored if the entry is already terminal.
    pub fn complete_success(&self, elapsed_ms: u64, row_count: u64) -> bool {
        self.lock().complete_success(elapsed_ms, row_count)
    }

    /// Records a failed outcome. Ignored if the entry is already terminal.
    pub fn complete_error(&self, elapsed_ms: u64, message: impl Into<String>) -> bool {
        self.lock().complete_error(elapsed_ms, message)
    }
}

/// Aggregate figures over the entries currently in the log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryLogStats {
    /// Entries currently retained, pending ones included.
    pub total_executed: usize,
    /// Entries with status `success`.
    pub successful_queries: usize,
    /// Entries with status `error`.
    pub failed_queries: usize,
    /// Mean execution time in whole milliseconds over completed entries.
    pub average_execution_time: u64,
}

#[derive(Debug)]
struct Inner {
    entries: VecDeque<EntryHandle>,
    next_id: u64,
}

/// Size-bounded, newest-first history of query executions.
///
/// Appending and truncating happen under one lock, so the length never
/// exceeds the capacity as observed by any reader.
///
/// # Example
///
/// ```
/// use shared::storage::QueryLog;
///
/// let log = QueryLog::with_capacity(2);
/// log.append("SELECT 1", Vec::new());
/// log.append("SELECT 2", Vec::new());
/// log.append("SELECT 3", Vec::new());
///
/// let queries: Vec<_> = log.all().into_iter().map(|e| e.query).collect();
/// assert_eq!(queries, vec!["SELECT 3", "SELECT 2"]);
/// ```
#[derive(Debug)]
pub struct QueryLog {
    inner: Mutex<Inner>,
    capacity: usize,
}

impl Default for QueryLog {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryLog {
    /// Creates an empty log holding up to [`DEFAULT_CAPACITY`] entries.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates an empty log holding up to `capacity` entries.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: VecDeque::with_capacity(capacity),
                next_id: 1,
            }),
            capacity,
        }
    }

    /// Creates a new log wrapped in an Arc.
    ///
    /// This is useful when sharing the log across multiple handlers.
    #[must_use]
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Maximum number of retained entries.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Records a new `pending` entry at the front and evicts the oldest
    /// entries beyond capacity.
    pub fn append(&self, statement: impl Into<String>, params: Vec<SqlParam>) -> EntryHandle {
        let mut inner = self.lock();
        let id = inner.next_id;
        inner.next_id += 1;

        let handle = EntryHandle::new(LogEntry::pending(id, statement, params));
        inner.entries.push_front(handle.clone());
        inner.entries.truncate(self.capacity);
        handle
    }

    /// Returns a snapshot of all retained entries, newest first.
    #[must_use]
    pub fn all(&self) -> Vec<LogEntry> {
        self.lock().entries.iter().map(EntryHandle::snapshot).collect()
    }

    /// Removes every entry. Ids keep increasing across clears.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    /// Number of retained entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// Returns `true` if no entries are retained.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    /// Computes success/failure counts and the mean execution time.
    #[must_use]
    pub fn stats(&self) -> QueryLogStats {
        let entries = self.all();
        let mut stats = QueryLogStats {
            total_executed: entries.len(),
            ..QueryLogStats::default()
        };

        let mut completed: u64 = 0;
        let mut total_ms: u64 = 0;
        for entry in &entries {
            match entry.status {
                QueryStatus::Success => stats.successful_queries += 1,
                QueryStatus::Error => stats.failed_queries += 1,
                QueryStatus::Pending => {}
            }
            if let Some(ms) = entry.execution_time {
                completed += 1;
                total_ms = total_ms.saturating_add(ms);
            }
        }

        if completed > 0 {
            stats.average_execution_time = (total_ms + completed / 2) / completed;
        }
        stats
    }
}
