//! HTTP client for the todos API.

use anyhow::{bail, Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use shared::models::{LogEntry, Todo};
use shared::storage::QueryLogStats;

/// Body of `GET /debug/queries`.
#[derive(Debug, Deserialize)]
pub struct QueryLogView {
    /// Number of retained entries.
    pub total: usize,
    /// Entries, newest first.
    pub queries: Vec<LogEntry>,
}

/// Todo counts from `GET /debug/stats`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoCounts {
    pub total_todos: i64,
    pub completed_todos: i64,
    pub pending_todos: i64,
}

/// Body of `GET /debug/stats`.
#[derive(Debug, Deserialize)]
pub struct StatsView {
    pub database: TodoCounts,
    pub queries: QueryLogStats,
}

#[derive(Debug, Deserialize)]
struct DeleteView {
    todo: Todo,
}

#[derive(Debug, Deserialize)]
struct MessageView {
    message: String,
}

/// Thin wrapper over `reqwest` that turns non-2xx answers into errors
/// carrying the server's `error` message.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    /// Creates a client for the API rooted at `base_url` (e.g. `http://host:5000/api`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    /// Returns the API base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .with_context(|| format!("Failed to reach API at {}", self.base_url))?;

        let status = response.status();
        let body: Value = response.json().await.unwrap_or(Value::Null);
        tracing::debug!(%status, "API response");

        if !status.is_success() {
            bail!("{}", error_message(status, &body));
        }
        serde_json::from_value(body).context("Unexpected response body")
    }

    /// `GET /health`.
    pub async fn health(&self) -> Result<Value> {
        self.send(self.http.get(self.url("/health"))).await
    }

    /// `GET /todos`.
    pub async fn list_todos(&self) -> Result<Vec<Todo>> {
        self.send(self.http.get(self.url("/todos"))).await
    }

    /// `POST /todos`.
    pub async fn create_todo(&self, task: &str) -> Result<Todo> {
        let request = self.http.post(self.url("/todos")).json(&json!({ "task": task }));
        self.send(request).await
    }

    /// `PUT /todos/{id}`.
    pub async fn update_todo(&self, id: i64, task: &str) -> Result<Todo> {
        let request = self
            .http
            .put(self.url(&format!("/todos/{id}")))
            .json(&json!({ "task": task }));
        self.send(request).await
    }

    /// `PATCH /todos/{id}/toggle`.
    pub async fn toggle_todo(&self, id: i64) -> Result<Todo> {
        self.send(self.http.patch(self.url(&format!("/todos/{id}/toggle"))))
            .await
    }

    /// `DELETE /todos/{id}`, returning the removed todo.
    pub async fn delete_todo(&self, id: i64) -> Result<Todo> {
        let view: DeleteView = self
            .send(self.http.delete(self.url(&format!("/todos/{id}"))))
            .await?;
        Ok(view.todo)
    }

    /// `GET /debug/queries`.
    pub async fn queries(&self) -> Result<QueryLogView> {
        self.send(self.http.get(self.url("/debug/queries"))).await
    }

    /// `DELETE /debug/queries`, returning the confirmation message.
    pub async fn clear_queries(&self) -> Result<String> {
        let view: MessageView = self
            .send(self.http.delete(self.url("/debug/queries")))
            .await?;
        Ok(view.message)
    }

    /// `GET /debug/stats`.
    pub async fn stats(&self) -> Result<StatsView> {
        self.send(self.http.get(self.url("/debug/stats"))).await
    }
}

fn error_message(status: reqwest::StatusCode, body: &Value) -> String {
    let detail = body
        .get("error")
        .and_then(Value::as_str)
        .or_else(|| status.canonical_reason())
        .unwrap_or("request failed");
    format!("{} {detail}", status.as_u16())
}
