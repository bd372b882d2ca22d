//! Data models for the todos service.
//!
//! This module contains the todo row and request types and the query log
//! entry recorded for every database call.

pub mod log_entry;
pub mod todo;

pub use log_entry::{LogEntry, QueryStatus};
pub use todo::{Todo, TodoInput, TodoValidationError};
