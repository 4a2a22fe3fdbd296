use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A tracked task. `id` and the timestamps are `None` until the task is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Option<Uuid>,
    pub title: String,
    pub is_completed: bool,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub is_completed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub title: String,
    pub is_completed: bool,
}

impl Task {
    pub fn new(title: String, is_completed: bool) -> Self {
        Self {
            id: None,
            title,
            is_completed,
            created_at: None,
            updated_at: None,
        }
    }
}

/// Seconds since the unix epoch, with millisecond precision.
pub fn unix_timestamp() -> f64 {
    Utc::now().timestamp_millis() as f64 / 1000.0
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: f64,
    pub service: String,
    pub version: String,
    pub database: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiInfo {
    pub api: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiDocumentation {
    pub name: String,
    pub description: String,
    pub author: String,
    pub technologies: Vec<String>,
    pub features: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskStats {
    pub total_tasks: i64,
    pub completed_tasks: i64,
    pub pending_tasks: i64,
    pub completion_rate: f64,
}

impl TaskStats {
    pub fn new(total_tasks: i64, completed_tasks: i64) -> Self {
        let completion_rate = if total_tasks == 0 {
            0.0
        } else {
            completed_tasks as f64 / total_tasks as f64 * 100.0
        };

        Self {
            total_tasks,
            completed_tasks,
            pending_tasks: total_tasks - completed_tasks,
            completion_rate,
        }
    }
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: bool,
    pub reason: String,
    pub timestamp: f64,
}

impl ErrorResponse {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            error: true,
            reason: reason.into(),
            timestamp: unix_timestamp(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
