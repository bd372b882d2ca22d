//! Todo CRUD endpoints.
//!
//! Each handler issues exactly one statement through the query executor and
//! returns the database rows as JSON.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, patch, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use shared::db::{statements, DatabaseError, QueryResult, Row, SqlParam};
use shared::models::TodoInput;

use crate::error::ApiError;
use crate::state::AppState;

/// Response for a deleted todo.
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteTodoResponse {
    /// Confirmation message.
    pub message: String,
    /// The row as it was before deletion.
    pub todo: Row,
}

/// Creates the todo routes.
///
/// # Routes
///
/// - `GET /todos` - List all todos
/// - `POST /todos` - Create a todo
/// - `PUT /todos/{id}` - Rename a todo
/// - `DELETE /todos/{id}` - Delete a todo
/// - `PATCH /todos/{id}/toggle` - Flip the completed flag
pub fn todos_routes(state: AppState) -> Router {
    Router::new()
        .route("/todos", get(list_todos).post(create_todo))
        .route("/todos/{id}", put(update_todo).delete(delete_todo))
        .route("/todos/{id}/toggle", patch(toggle_todo))
        .with_state(state)
}

fn parse_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, ApiError> {
    id.map(|Path(id)| id)
        .map_err(|rejection| ApiError::BadRequest(rejection.body_text()))
}

fn parse_input(payload: Result<Json<TodoInput>, JsonRejection>) -> Result<TodoInput, ApiError> {
    let Json(input) = payload.map_err(|rejection| ApiError::BadRequest(rejection.body_text()))?;
    Ok(input.validated()?)
}

/// Returns the single affected row, or `NotFound` if nothing matched.
fn affected_row(result: QueryResult) -> Result<Row, ApiError> {
    if result.row_count == 0 {
        return Err(ApiError::NotFound);
    }
    result.into_first_row().ok_or(ApiError::NotFound)
}

/// Handler for GET /todos.
async fn list_todos(State(state): State<AppState>) -> Result<Json<Vec<Row>>, ApiError> {
    let result = state.executor().run(statements::SELECT_TODOS, &[]).await?;
    Ok(Json(result.rows))
}

/// Handler for POST /todos.
///
/// Returns 201 with the created row, 400 if the task is missing or blank.
async fn create_todo(
    State(state): State<AppState>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Row>), ApiError> {
    let input = parse_input(payload)?;

    let result = state
        .executor()
        .run(statements::INSERT_TODO, &[SqlParam::from(input.task)])
        .await?;

    let todo = result
        .into_first_row()
        .ok_or_else(|| DatabaseError::execution("INSERT returned no row"))?;

    tracing::debug!("Created todo");
    Ok((StatusCode::CREATED, Json(todo)))
}

/// Handler for PUT /todos/{id}.
async fn update_todo(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<TodoInput>, JsonRejection>,
) -> Result<Json<Row>, ApiError> {
    let input = parse_input(payload)?;
    let id = parse_id(id)?;

    let result = state
        .executor()
        .run(
            statements::UPDATE_TODO_TASK,
            &[SqlParam::from(input.task), SqlParam::Int(id)],
        )
        .await?;

    Ok(Json(affected_row(result)?))
}

/// Handler for DELETE /todos/{id}.
async fn delete_todo(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<DeleteTodoResponse>, ApiError> {
    let id = parse_id(id)?;

    let result = state
        .executor()
        .run(statements::DELETE_TODO, &[SqlParam::Int(id)])
        .await?;

    Ok(Json(DeleteTodoResponse {
        message: "Todo deleted successfully".to_string(),
        todo: affected_row(result)?,
    }))
}

/// Handler for PATCH /todos/{id}/toggle.
async fn toggle_todo(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<Row>, ApiError> {
    let id = parse_id(id)?;

    let result = state
        .executor()
        .run(statements::TOGGLE_TODO, &[SqlParam::Int(id)])
        .await?;

    Ok(Json(affected_row(result)?))
}
