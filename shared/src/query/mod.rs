//! Query execution for the todos service.
//!
//! Route handlers never talk to a [`Database`](crate::db::Database)
//! directly; they go through the [`QueryExecutor`], which times each call
//! and records it in the [`QueryLog`](crate::storage::QueryLog).
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use shared::db::{statements, InMemoryDatabase, SqlParam};
//! use shared::query::QueryExecutor;
//! use shared::storage::QueryLog;
//!
//! # tokio_test::block_on(async {
//! let executor = QueryExecutor::new(Arc::new(InMemoryDatabase::new()), QueryLog::new_shared());
//! executor
//!     .run(statements::INSERT_TODO, &[SqlParam::from("buy milk")])
//!     .await
//!     .unwrap();
//!
//! assert_eq!(executor.log().len(), 1);
//! # });
//! ```

mod executor;

pub use executor::QueryExecutor;
