//! Integration tests for the query log debug endpoints.
//!
//! Tests cover:
//! - Listing and clearing the query log
//! - The 100-entry bound
//! - Failed queries in the log
//! - Statistics

use api::{create_router, AppState};
use axum::http::StatusCode;
use serde_json::json;
use shared::db::InMemoryDatabase;
use std::sync::Arc;

use super::common::{delete, get, patch, post_json, test_app};

#[tokio::test]
async fn test_query_log_starts_empty() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/api/debug/queries").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total"], 0);
    assert!(response["queries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_query_log_is_newest_first() {
    let (app, _state) = test_app();

    post_json(app.clone(), "/api/todos", json!({"task": "a"})).await;
    get(app.clone(), "/api/todos").await;

    let (_, response) = get(app, "/api/debug/queries").await;
    let queries = response["queries"].as_array().unwrap();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0]["query"], "SELECT * FROM todos ORDER BY id ASC");
    assert_eq!(queries[1]["query"], "INSERT INTO todos (task) VALUES ($1) RETURNING *");
    assert!(queries[0]["id"].as_u64().unwrap() > queries[1]["id"].as_u64().unwrap());
}

#[tokio::test]
async fn test_query_log_is_bounded() {
    let (app, _state) = test_app();

    for i in 0..105 {
        post_json(app.clone(), "/api/todos", json!({"task": format!("task {i}")})).await;
    }

    let (_, response) = get(app, "/api/debug/queries").await;
    assert_eq!(response["total"], 100);
    let queries = response["queries"].as_array().unwrap();
    assert_eq!(queries.len(), 100);
    assert_eq!(queries[0]["params"], json!(["task 104"]));
    assert_eq!(queries[99]["params"], json!(["task 5"]));
}

#[tokio::test]
async fn test_clear_query_log() {
    let (app, _state) = test_app();
    get(app.clone(), "/api/todos").await;

    let (status, response) = delete(app.clone(), "/api/debug/queries").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["message"], "Query log cleared");

    // Clearing twice is harmless.
    let (status, _) = delete(app.clone(), "/api/debug/queries").await;
    assert_eq!(status, StatusCode::OK);

    let (_, response) = get(app, "/api/debug/queries").await;
    assert_eq!(response["total"], 0);
}

#[tokio::test]
async fn test_failed_query_is_logged() {
    let db = Arc::new(InMemoryDatabase::new());
    let state = AppState::new(db.clone());
    let app = create_router(state);

    db.set_available(false);
    let (status, response) = get(app.clone(), "/api/todos").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response["error"].is_string());

    db.set_available(true);
    let (_, response) = get(app, "/api/debug/queries").await;
    let failed = &response["queries"][0];
    assert_eq!(failed["status"], "error");
    assert_eq!(failed["error"], "connection refused: database is unavailable");
    assert!(failed.get("rowCount").is_none());
    assert!(failed["executionTime"].is_u64());
}

#[tokio::test]
async fn test_stats() {
    let (app, _state) = test_app();
    post_json(app.clone(), "/api/todos", json!({"task": "a"})).await;
    post_json(app.clone(), "/api/todos", json!({"task": "b"})).await;
    patch(app.clone(), "/api/todos/1/toggle").await;
    patch(app.clone(), "/api/todos/9/toggle").await;

    let (status, stats) = get(app, "/api/debug/stats").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats["database"],
        json!({"totalTodos": 2, "completedTodos": 1, "pendingTodos": 1})
    );
    // 4 writes + 3 counts
    assert_eq!(stats["queries"]["totalExecuted"], 7);
    assert_eq!(stats["queries"]["successfulQueries"], 7);
    assert_eq!(stats["queries"]["failedQueries"], 0);
    assert!(stats["queries"]["averageExecutionTime"].is_u64());
}

#[tokio::test]
async fn test_stats_fails_when_database_down() {
    let db = Arc::new(InMemoryDatabase::new());
    db.set_available(false);
    let app = create_router(AppState::new(db));

    let (status, response) = get(app, "/api/debug/stats").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response["error"].is_string());
}
