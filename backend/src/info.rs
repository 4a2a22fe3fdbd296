use std::collections::BTreeMap;

use axum::{extract::Path, http::StatusCode, response::Json};
use chrono::Utc;
use shared::{unix_timestamp, ApiDocumentation, ApiInfo, HealthStatus, MessageResponse};
use tracing::info;

use crate::error::ApiError;

pub const SERVICE_NAME: &str = "task-api";
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub async fn api_info() -> Json<ApiInfo> {
    let endpoints = [
        ("GET /tasks", "List every task"),
        ("POST /tasks", "Create a task"),
        ("GET /tasks/pending", "List tasks that are not completed"),
        ("GET /tasks/stats", "Task completion statistics"),
        ("GET /tasks/:id", "Fetch one task"),
        ("PUT /tasks/:id", "Replace a task's title and completion flag"),
        ("DELETE /tasks/:id", "Delete a task"),
        ("GET /health", "Service health"),
        ("GET /docs", "API documentation"),
    ]
    .into_iter()
    .map(|(route, description)| (route.to_string(), description.to_string()))
    .collect::<BTreeMap<_, _>>();

    Json(ApiInfo {
        api: "Task management API".to_string(),
        version: VERSION.to_string(),
        endpoints,
    })
}

pub async fn hello() -> &'static str {
    "Hello from the task API! Everything is up and running."
}

pub async fn hello_name(Path(name): Path<String>) -> String {
    format!("Hello {name}! Welcome to the task API.")
}

/// Static report; the store is not probed.
pub async fn health() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: unix_timestamp(),
        service: SERVICE_NAME.to_string(),
        version: VERSION.to_string(),
        database: "sqlite".to_string(),
    })
}

pub async fn docs() -> Json<ApiDocumentation> {
    Json(ApiDocumentation {
        name: "Task management API".to_string(),
        description: "REST service for creating, listing, updating and deleting tasks".to_string(),
        author: "Task API maintainers".to_string(),
        technologies: ["Rust", "axum", "tokio", "sqlx", "SQLite"]
            .into_iter()
            .map(String::from)
            .collect(),
        features: [
            "Task CRUD",
            "Pending task filter",
            "Completion statistics",
            "Title validation",
            "Health check",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
    })
}

pub async fn demo_json() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Example JSON response from the task API".to_string(),
    })
}

pub async fn demo_error() -> Result<Json<MessageResponse>, ApiError> {
    Err(ApiError::Demo {
        status: StatusCode::IM_A_TEAPOT,
        reason: "This is a demonstration error".to_string(),
    })
}

pub async fn demo_echo(body: String) -> String {
    info!("Echo received ({} bytes)", body.len());
    format!("Echo received at {}", Utc::now().to_rfc3339())
}
