//! In-process storage.
//!
//! This module provides the bounded query log that backs the debug
//! endpoints.

pub mod query_log;

pub use query_log::{EntryHandle, QueryLog, QueryLogStats, DEFAULT_CAPACITY};
