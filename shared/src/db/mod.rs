//! Database collaborator abstraction.
//!
//! The `Database` trait is the single seam between the query executor and a
//! concrete backend. `PostgresDatabase` talks to PostgreSQL through sqlx;
//! `InMemoryDatabase` serves the todo statements from process memory for
//! development and tests.

mod memory;
mod postgres;
pub mod statements;

pub use memory::InMemoryDatabase;
pub use postgres::PostgresDatabase;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A result row, keyed by column name.
pub type Row = serde_json::Map<String, serde_json::Value>;

/// Errors returned by a database backend.
///
/// This is the one failure kind the executor deals with: connectivity loss,
/// constraint violations and malformed SQL all arrive here.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// Error reported by the sqlx driver.
    #[error(transparent)]
    Driver(#[from] sqlx::Error),

    /// Error reported by a non-driver backend.
    #[error("{0}")]
    Execution(String),
}

impl DatabaseError {
    /// Creates an execution error with the given message.
    pub fn execution(msg: impl Into<String>) -> Self {
        Self::Execution(msg.into())
    }
}

/// A positional bind parameter.
///
/// Serialized untagged so the query log shows parameters as plain JSON
/// values (`["buy milk", 3]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SqlParam {
    /// SQL `NULL`.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// Text value.
    Text(String),
}

impl SqlParam {
    /// Returns the value as an integer, parsing text if needed.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            Self::Text(value) => value.trim().parse().ok(),
            _ => None,
        }
    }

    /// Returns the value as text if it is a text parameter.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }
}

impl From<&str> for SqlParam {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SqlParam {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for SqlParam {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for SqlParam {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<bool> for SqlParam {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for SqlParam {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

/// Rows and row count returned by one statement.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResult {
    /// Returned rows, in database order.
    pub rows: Vec<Row>,
    /// Rows returned or affected, as reported by the database.
    pub row_count: u64,
}

impl QueryResult {
    /// Creates a result whose row count equals the number of rows.
    #[must_use]
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let row_count = rows.len() as u64;
        Self { rows, row_count }
    }

    /// Consumes the result and returns its first row, if any.
    #[must_use]
    pub fn into_first_row(self) -> Option<Row> {
        self.rows.into_iter().next()
    }

    /// Reads `column` from the first row as an integer.
    ///
    /// Accepts JSON numbers and numeric strings, since PostgreSQL `bigint`
    /// and `numeric` aggregates can arrive either way.
    #[must_use]
    pub fn scalar_i64(&self, column: &str) -> Option<i64> {
        match self.rows.first()?.get(column)? {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        }
    }
}

/// Trait for database backends.
///
/// Implementations perform exactly one round trip per call and report
/// failures without retrying. Implementations must be thread-safe.
#[async_trait]
pub trait Database: Send + Sync {
    /// Executes `statement` with positional `params`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be reached or rejects the
    /// statement.
    async fn query(&self, statement: &str, params: &[SqlParam])
        -> Result<QueryResult, DatabaseError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(value: serde_json::Value) -> Row {
        match value {
            serde_json::Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn test_params_serialize_as_plain_values() {
        let params = vec![
            SqlParam::from("buy milk"),
            SqlParam::from(3_i64),
            SqlParam::Bool(true),
            SqlParam::Null,
        ];
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json, json!(["buy milk", 3, true, null]));
    }

    #[test]
    fn test_params_deserialize_from_plain_values() {
        let params: Vec<SqlParam> = serde_json::from_value(json!(["a", 2, 1.5, false, null])).unwrap();
        assert_eq!(
            params,
            vec![
                SqlParam::Text("a".to_string()),
                SqlParam::Int(2),
                SqlParam::Float(1.5),
                SqlParam::Bool(false),
                SqlParam::Null,
            ]
        );
    }

    #[test]
    fn test_param_as_i64() {
        assert_eq!(SqlParam::Int(5).as_i64(), Some(5));
        assert_eq!(SqlParam::from("42").as_i64(), Some(42));
        assert_eq!(SqlParam::from("abc").as_i64(), None);
        assert_eq!(SqlParam::Bool(true).as_i64(), None);
    }

    #[test]
    fn test_from_rows_counts_rows() {
        let result = QueryResult::from_rows(vec![row(json!({"id": 1})), row(json!({"id": 2}))]);
        assert_eq!(result.row_count, 2);
        assert_eq!(result.into_first_row().unwrap()["id"], 1);
    }

    #[test]
    fn test_scalar_i64_accepts_numbers_and_strings() {
        let numeric = QueryResult::from_rows(vec![row(json!({"count": 3}))]);
        assert_eq!(numeric.scalar_i64("count"), Some(3));

        let textual = QueryResult::from_rows(vec![row(json!({"count": "17"}))]);
        assert_eq!(textual.scalar_i64("count"), Some(17));

        assert_eq!(QueryResult::default().scalar_i64("count"), None);
        assert_eq!(numeric.scalar_i64("missing"), None);
    }

    #[test]
    fn test_execution_error_display() {
        let err = DatabaseError::execution("connection refused");
        assert_eq!(err.to_string(), "connection refused");
    }
}
