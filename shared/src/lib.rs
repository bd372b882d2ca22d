//! Todos Shared Library
//!
//! This crate contains the models, query log, and instrumented database
//! access used by the todos API server and CLI.
//!
//! # Modules
//!
//! - [`models`] - Todo rows, request bodies, and query log entries
//! - [`db`] - The `Database` trait with PostgreSQL and in-memory backends
//! - [`storage`] - The bounded, newest-first query log
//! - [`query`] - The query executor that ties database and log together
//!
//! # Example
//!
//! ```
//! use shared::storage::QueryLog;
//! use shared::models::QueryStatus;
//!
//! let log = QueryLog::new();
//! let entry = log.append("SELECT 1", Vec::new());
//! entry.complete_success(2, 1);
//!
//! assert_eq!(log.all()[0].status, QueryStatus::Success);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod db;
pub mod models;
pub mod query;
pub mod storage;

/// Re-export common dependencies for convenience.
pub use chrono;
pub use serde;
pub use serde_json;
pub use validator;
