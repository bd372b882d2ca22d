//! In-memory database backend.
//!
//! Understands the statements in [`super::statements`] over a process-local
//! todo table. Anything else fails the way PostgreSQL would reject it.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use super::statements;
use super::{Database, DatabaseError, QueryResult, Row, SqlParam};

#[derive(Debug, Clone)]
struct StoredTodo {
    task: String,
    completed: Option<bool>,
}

#[derive(Debug)]
struct TodoTable {
    next_id: i64,
    rows: BTreeMap<i64, StoredTodo>,
}

impl Default for TodoTable {
    fn default() -> Self {
        Self {
            next_id: 1,
            rows: BTreeMap::new(),
        }
    }
}

/// In-memory database implementation.
///
/// Suitable for development and testing. Ids start at 1 and new todos are
/// created with `completed = false`.
///
/// **Note:** Data is not persisted across restarts.
///
/// # Example
///
/// ```
/// use shared::db::{statements, Database, InMemoryDatabase, SqlParam};
///
/// # tokio_test::block_on(async {
/// let db = InMemoryDatabase::new();
/// db.query(statements::INSERT_TODO, &[SqlParam::from("buy milk")]).await.unwrap();
///
/// let result = db.query(statements::SELECT_TODOS, &[]).await.unwrap();
/// assert_eq!(result.row_count, 1);
/// # });
/// ```
#[derive(Debug)]
pub struct InMemoryDatabase {
    table: Mutex<TodoTable>,
    available: AtomicBool,
}

impl Default for InMemoryDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryDatabase {
    /// Creates a new empty in-memory database.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Mutex::new(TodoTable::default()),
            available: AtomicBool::new(true),
        }
    }

    /// Simulates losing (`false`) or regaining (`true`) connectivity.
    ///
    /// While unavailable every statement fails with a connection error.
    pub fn set_available(&self, available: bool) {
        self.available.store(available, Ordering::SeqCst);
    }

    fn execute(&self, statement: &str, params: &[SqlParam]) -> Result<QueryResult, DatabaseError> {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);

        match statement {
            statements::HEALTH_CHECK => Ok(QueryResult::from_rows(vec![to_row(
                json!({ "?column?": 1 }),
            )])),
            statements::SELECT_TODOS => Ok(QueryResult::from_rows(
                table
                    .rows
                    .iter()
                    .map(|(id, todo)| todo_row(*id, todo))
                    .collect(),
            )),
            statements::INSERT_TODO => {
                let task = text_param(params, 1)?;
                let id = table.next_id;
                table.next_id += 1;
                let todo = StoredTodo {
                    task,
                    completed: Some(false),
                };
                let row = todo_row(id, &todo);
                table.rows.insert(id, todo);
                Ok(QueryResult::from_rows(vec![row]))
            }
            statements::UPDATE_TODO_TASK => {
                let task = text_param(params, 1)?;
                let id = int_param(params, 2)?;
                Ok(update_row(&mut table, id, |todo| todo.task = task))
            }
            statements::TOGGLE_TODO => {
                let id = int_param(params, 1)?;
                Ok(update_row(&mut table, id, |todo| {
                    todo.completed = Some(!todo.completed.unwrap_or(false));
                }))
            }
            statements::DELETE_TODO => {
                let id = int_param(params, 1)?;
                let rows = table
                    .rows
                    .remove(&id)
                    .map(|todo| todo_row(id, &todo))
                    .into_iter()
                    .collect();
                Ok(QueryResult::from_rows(rows))
            }
            statements::COUNT_TODOS => Ok(count_result(table.rows.len())),
            statements::COUNT_COMPLETED_TODOS => Ok(count_result(
                table.rows.values().filter(|t| t.completed == Some(true)).count(),
            )),
            statements::COUNT_PENDING_TODOS => Ok(count_result(
                table.rows.values().filter(|t| t.completed != Some(true)).count(),
            )),
            other => Err(unsupported(other)),
        }
    }
}

#[async_trait]
impl Database for InMemoryDatabase {
    async fn query(
        &self,
        statement: &str,
        params: &[SqlParam],
    ) -> Result<QueryResult, DatabaseError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(DatabaseError::execution(
                "connection refused: database is unavailable",
            ));
        }
        self.execute(statement, params)
    }
}

fn to_row(value: Value) -> Row {
    match value {
        Value::Object(map) => map,
        _ => Row::new(),
    }
}

fn todo_row(id: i64, todo: &StoredTodo) -> Row {
    to_row(json!({
        "id": id,
        "task": todo.task,
        "completed": todo.completed,
    }))
}

fn count_result(count: usize) -> QueryResult {
    QueryResult::from_rows(vec![to_row(json!({ "count": count }))])
}

fn update_row(table: &mut TodoTable, id: i64, apply: impl FnOnce(&mut StoredTodo)) -> QueryResult {
    let rows = table
        .rows
        .get_mut(&id)
        .map(|todo| {
            apply(todo);
            todo_row(id, todo)
        })
        .into_iter()
        .collect();
    QueryResult::from_rows(rows)
}

fn param(params: &[SqlParam], position: usize) -> Result<&SqlParam, DatabaseError> {
    params.get(position - 1).ok_or_else(|| {
        DatabaseError::execution(format!(
            "bind message supplies {} parameters, but statement requires ${position}",
            params.len()
        ))
    })
}

fn text_param(params: &[SqlParam], position: usize) -> Result<String, DatabaseError> {
    param(params, position)?
        .as_str()
        .map(ToString::to_string)
        .ok_or_else(|| DatabaseError::execution(format!("parameter ${position} must be text")))
}

fn int_param(params: &[SqlParam], position: usize) -> Result<i64, DatabaseError> {
    let value = param(params, position)?;
    value.as_i64().ok_or_else(|| {
        DatabaseError::execution(format!(
            "invalid input syntax for type integer: {}",
            serde_json::to_string(value).unwrap_or_default()
        ))
    })
}

fn unsupported(statement: &str) -> DatabaseError {
    let relation = statement
        .split_whitespace()
        .skip_while(|word| !word.eq_ignore_ascii_case("from"))
        .nth(1)
        .filter(|table| *table != "todos");

    match relation {
        Some(table) => DatabaseError::execution(format!("relation \"{table}\" does not exist")),
        None => DatabaseError::execution(format!("unsupported statement: {statement}")),
    }
}
