//! PostgreSQL backend using sqlx.

use async_trait::async_trait;
use futures::TryStreamExt;
use serde_json::Value;
use sqlx::postgres::{PgArguments, PgConnectOptions, PgPool, PgPoolOptions, PgRow};
use sqlx::query::Query;
use sqlx::{Column, Either, Executor, Postgres, Row as SqlxRow, TypeInfo};

use super::{Database, DatabaseError, QueryResult, Row, SqlParam};

/// PostgreSQL database backed by a sqlx connection pool.
#[derive(Debug, Clone)]
pub struct PostgresDatabase {
    pool: PgPool,
}

impl PostgresDatabase {
    /// Creates a database from an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a database whose pool connects on first use.
    ///
    /// Must be called from within a Tokio runtime.
    #[must_use]
    pub fn connect_lazy(options: PgConnectOptions) -> Self {
        Self {
            pool: PgPoolOptions::new().connect_lazy_with(options),
        }
    }

    /// Returns the underlying pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Database for PostgresDatabase {
    async fn query(
        &self,
        statement: &str,
        params: &[SqlParam],
    ) -> Result<QueryResult, DatabaseError> {
        let query = params
            .iter()
            .fold(sqlx::query(statement), |query, param| bind_param(query, param));

        // `fetch_many` yields the command tag alongside the rows, so the row
        // count matches what the server reports for UPDATE/DELETE as well.
        let mut stream = (&self.pool).fetch_many(query);
        let mut rows = Vec::new();
        let mut row_count = 0;

        while let Some(step) = stream.try_next().await? {
            match step {
                Either::Left(done) => row_count += done.rows_affected(),
                Either::Right(row) => rows.push(row_to_json(&row)),
            }
        }

        Ok(QueryResult { rows, row_count })
    }
}

fn bind_param<'q>(
    query: Query<'q, Postgres, PgArguments>,
    param: &SqlParam,
) -> Query<'q, Postgres, PgArguments> {
    match param {
        SqlParam::Null => query.bind(None::<String>),
        SqlParam::Bool(value) => query.bind(*value),
        SqlParam::Int(value) => query.bind(*value),
        SqlParam::Float(value) => query.bind(*value),
        SqlParam::Text(value) => query.bind(value.clone()),
    }
}

fn row_to_json(row: &PgRow) -> Row {
    row.columns()
        .iter()
        .map(|column| {
            let value = decode_column(row, column.ordinal(), column.type_info().name());
            (column.name().to_string(), value)
        })
        .collect()
}

fn decode_column(row: &PgRow, index: usize, type_name: &str) -> Value {
    match type_name {
        "BOOL" => decode::<bool>(row, index),
        "INT2" => decode::<i16>(row, index),
        "INT4" => decode::<i32>(row, index),
        "INT8" => decode::<i64>(row, index),
        "FLOAT4" => decode::<f32>(row, index),
        "FLOAT8" => decode::<f64>(row, index),
        "JSON" | "JSONB" => decode::<Value>(row, index),
        "TIMESTAMPTZ" => row
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(index)
            .ok()
            .flatten()
            .map_or(Value::Null, |ts| Value::String(ts.to_rfc3339())),
        "TIMESTAMP" => row
            .try_get::<Option<chrono::NaiveDateTime>, _>(index)
            .ok()
            .flatten()
            .map_or(Value::Null, |ts| Value::String(ts.to_string())),
        // Text-like and anything else sqlx can hand back as a string.
        _ => decode::<String>(row, index),
    }
}

fn decode<'r, T>(row: &'r PgRow, index: usize) -> Value
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
    Value: From<T>,
{
    row.try_get::<Option<T>, _>(index)
        .ok()
        .flatten()
        .map_or(Value::Null, Value::from)
}
