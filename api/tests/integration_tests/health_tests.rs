//! Integration tests for the health check.
//!
//! Tests cover:
//! - Health check endpoint
//! - The probe being recorded in the query log

use axum::http::StatusCode;

use super::common::{get, test_app};

#[tokio::test]
async fn test_health_check() {
    let (app, _state) = test_app();

    let (status, response) = get(app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["status"], "healthy");
    assert_eq!(response["service"], "todos-api");
    assert!(response["timestamp"].is_string());
}

#[tokio::test]
async fn test_health_check_appears_in_query_log() {
    let (app, _state) = test_app();

    get(app.clone(), "/api/health").await;
    let (status, response) = get(app, "/api/debug/queries").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["total"], 1);
    assert_eq!(response["queries"][0]["query"], "SELECT 1");
    assert_eq!(response["queries"][0]["status"], "success");
    assert_eq!(response["queries"][0]["rowCount"], 1);
}
