use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
};
use shared::{CreateTaskRequest, Task, TaskStats, UpdateTaskRequest};
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::Repository;
use crate::storage::StorageError;
use crate::validation::{validate_create, validate_update};

/// Parses the path id and loads the task it names.
pub async fn find_or_fail(repo: &Repository, raw_id: &str) -> Result<Task, ApiError> {
    let id = Uuid::parse_str(raw_id)
        .map_err(|_| ApiError::BadRequest(format!("Invalid task id: {raw_id}")))?;

    Ok(repo.get_by_id(id).await?)
}

pub async fn list_tasks(State(repo): State<Repository>) -> Result<Json<Vec<Task>>, ApiError> {
    info!("Listing tasks");
    Ok(Json(repo.list_all().await?))
}

pub async fn list_pending_tasks(
    State(repo): State<Repository>,
) -> Result<Json<Vec<Task>>, ApiError> {
    info!("Listing pending tasks");
    Ok(Json(repo.list_pending().await?))
}

pub async fn task_stats(State(repo): State<Repository>) -> Result<Json<TaskStats>, ApiError> {
    info!("Computing task statistics");
    Ok(Json(repo.stats().await?))
}

pub async fn create_task(
    State(repo): State<Repository>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    let Json(payload) = payload?;
    let fields = validate_create(payload)?;

    info!("Creating task '{}'", fields.title);

    let task = repo
        .insert(Task::new(fields.title, fields.is_completed))
        .await?;
    Ok(Json(task))
}

pub async fn get_task(
    Path(id): Path<String>,
    State(repo): State<Repository>,
) -> Result<Json<Task>, ApiError> {
    info!("Getting task: {}", id);
    Ok(Json(find_or_fail(&repo, &id).await?))
}

pub async fn update_task(
    Path(id): Path<String>,
    State(repo): State<Repository>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>, ApiError> {
    info!("Updating task: {}", id);

    let mut task = find_or_fail(&repo, &id).await?;
    let Json(payload) = payload?;
    let fields = validate_update(payload)?;

    task.title = fields.title;
    task.is_completed = fields.is_completed;

    Ok(Json(repo.update(task).await?))
}

pub async fn delete_task(
    Path(id): Path<String>,
    State(repo): State<Repository>,
) -> Result<StatusCode, ApiError> {
    info!("Deleting task: {}", id);

    let task = find_or_fail(&repo, &id).await?;
    let task_id = task.id.ok_or(StorageError::Unsaved)?;
    repo.delete(task_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::http::StatusCode;

    use super::*;
    use crate::storage::{self, TaskRepository};

    /// Hands out a row that carries no id and counts delete calls.
    #[derive(Default)]
    struct IdlessRepository {
        deletes: AtomicUsize,
    }

    #[async_trait]
    impl TaskRepository for IdlessRepository {
        async fn list_all(&self) -> storage::Result<Vec<Task>> {
            Ok(Vec::new())
        }

        async fn list_pending(&self) -> storage::Result<Vec<Task>> {
            Ok(Vec::new())
        }

        async fn get_by_id(&self, _id: Uuid) -> storage::Result<Task> {
            Ok(Task::new("No id".to_string(), false))
        }

        async fn insert(&self, task: Task) -> storage::Result<Task> {
            Ok(task)
        }

        async fn update(&self, task: Task) -> storage::Result<Task> {
            Ok(task)
        }

        async fn delete(&self, _id: Uuid) -> storage::Result<()> {
            self.deletes.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn stats(&self) -> storage::Result<TaskStats> {
            Ok(TaskStats::new(0, 0))
        }
    }

    #[tokio::test]
    async fn test_delete_never_reports_success_for_a_task_without_id() {
        let fake = Arc::new(IdlessRepository::default());
        let repo: Repository = fake.clone();

        let result = delete_task(Path(Uuid::new_v4().to_string()), State(repo)).await;

        let err = result.expect_err("delete must not succeed without an id");
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(fake.deletes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_find_or_fail_rejects_malformed_id() {
        let repo: Repository = Arc::new(IdlessRepository::default());

        let err = find_or_fail(&repo, "not-a-uuid").await.unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }
}
