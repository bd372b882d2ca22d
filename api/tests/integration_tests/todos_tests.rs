//! Integration tests for the todo CRUD endpoints.
//!
//! Tests cover:
//! - Create, list, update, toggle, delete
//! - Validation and not-found responses
//! - Bind parameters recorded in the query log

use axum::http::StatusCode;
use serde_json::json;

use super::common::{delete, get, patch, post_json, put_json, test_app};

#[tokio::test]
async fn test_create_and_list_todos() {
    let (app, _state) = test_app();

    let (status, created) = post_json(app.clone(), "/api/todos", json!({"task": "write docs"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["task"], "write docs");

    post_json(app.clone(), "/api/todos", json!({"task": "ship it"})).await;

    let (status, todos) = get(app, "/api/todos").await;
    assert_eq!(status, StatusCode::OK);
    let todos = todos.as_array().unwrap();
    assert_eq!(todos.len(), 2);
    assert_eq!(todos[0]["task"], "write docs");
    assert_eq!(todos[1]["task"], "ship it");
}

#[tokio::test]
async fn test_create_requires_task() {
    let (app, _state) = test_app();

    let (status, response) = post_json(app.clone(), "/api/todos", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Task is required");

    let (status, _) = post_json(app, "/api/todos", json!({"task": "  "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_todo() {
    let (app, _state) = test_app();
    post_json(app.clone(), "/api/todos", json!({"task": "old"})).await;

    let (status, updated) = put_json(app.clone(), "/api/todos/1", json!({"task": " new "})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"], 1);
    assert_eq!(updated["task"], "new");

    let (status, response) = put_json(app.clone(), "/api/todos/1", json!({"task": ""})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response["error"], "Task is required");

    let (status, response) = put_json(app, "/api/todos/99", json!({"task": "x"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(response["error"], "Todo not found");
}

#[tokio::test]
async fn test_toggle_todo() {
    let (app, _state) = test_app();
    post_json(app.clone(), "/api/todos", json!({"task": "toggle me"})).await;

    let (status, toggled) = patch(app.clone(), "/api/todos/1/toggle").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(toggled["completed"], true);

    let (_, toggled) = patch(app.clone(), "/api/todos/1/toggle").await;
    assert_eq!(toggled["completed"], false);

    let (status, _) = patch(app, "/api/todos/2/toggle").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_todo() {
    let (app, _state) = test_app();
    post_json(app.clone(), "/api/todos", json!({"task": "temporary"})).await;

    let (status, response) = delete(app.clone(), "/api/todos/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Todo deleted successfully");
    assert_eq!(response["todo"]["task"], "temporary");

    let (status, _) = delete(app.clone(), "/api/todos/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, todos) = get(app, "/api/todos").await;
    assert!(todos.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_statements_and_params_are_logged() {
    let (app, state) = test_app();

    post_json(app.clone(), "/api/todos", json!({"task": "  logged  "})).await;
    put_json(app, "/api/todos/1", json!({"task": "renamed"})).await;

    let entries = state.query_log().all();
    assert_eq!(entries.len(), 2);

    assert_eq!(
        entries[0].query,
        "UPDATE todos SET task = $1 WHERE id = $2 RETURNING *"
    );
    assert_eq!(
        serde_json::to_value(&entries[0].params).unwrap(),
        json!(["renamed", 1])
    );

    assert_eq!(
        entries[1].query,
        "INSERT INTO todos (task) VALUES ($1) RETURNING *"
    );
    assert_eq!(
        serde_json::to_value(&entries[1].params).unwrap(),
        json!(["logged"])
    );
}
