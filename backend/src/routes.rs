use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{
    create_task, delete_task, get_task, list_pending_tasks, list_tasks, task_stats, update_task,
};
use crate::info::{api_info, demo_echo, demo_error, demo_json, docs, health, hello, hello_name};
use crate::storage::{SqliteTaskRepository, TaskRepository};

pub type Repository = Arc<dyn TaskRepository>;

pub fn router(repo: Repository) -> Router {
    // Literal segments are registered ahead of `:id` so `pending` and `stats`
    // are never parsed as identifiers.
    Router::new()
        .route("/", get(api_info))
        .route("/hello", get(hello))
        .route("/hello/:name", get(hello_name))
        .route("/health", get(health))
        .route("/docs", get(docs))
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/pending", get(list_pending_tasks))
        .route("/tasks/stats", get(task_stats))
        .route(
            "/tasks/:id",
            get(get_task).put(update_task).delete(delete_task),
        )
        .route("/demo/json", get(demo_json))
        .route("/demo/error", get(demo_error))
        .route("/demo/echo", post(demo_echo))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(repo)
}

pub fn router_with_pool(pool: SqlitePool) -> Router {
    router(Arc::new(SqliteTaskRepository::new(pool)))
}
