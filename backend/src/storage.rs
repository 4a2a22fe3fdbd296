use async_trait::async_trait;
use chrono::{DateTime, Utc};
use shared::{Task, TaskStats};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Task not found")]
    NotFound,
    #[error("Task has not been stored yet")]
    Unsaved,
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),
    #[error("Corrupt task row: {0}")]
    Corrupt(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Data access for tasks. Every call is a single round trip to the store.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Task>>;

    /// Tasks with `is_completed = false`.
    async fn list_pending(&self) -> Result<Vec<Task>>;

    async fn get_by_id(&self, id: Uuid) -> Result<Task>;

    /// Assigns `id`, `created_at` and `updated_at`, then returns the stored row.
    async fn insert(&self, task: Task) -> Result<Task>;

    /// Persists `title` and `is_completed` and refreshes `updated_at`.
    async fn update(&self, task: Task) -> Result<Task>;

    async fn delete(&self, id: Uuid) -> Result<()>;

    async fn stats(&self) -> Result<TaskStats>;
}

pub struct SqliteTaskRepository {
    pool: SqlitePool,
}

impl SqliteTaskRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn row_to_task(row: &SqliteRow) -> Result<Task> {
        let id: String = row.try_get("id")?;
        let id = Uuid::parse_str(&id).map_err(|e| StorageError::Corrupt(format!("{id}: {e}")))?;

        Ok(Task {
            id: Some(id),
            title: row.try_get("title")?,
            is_completed: row.try_get("is_completed")?,
            created_at: Some(row.try_get::<DateTime<Utc>, _>("created_at")?),
            updated_at: Some(row.try_get::<DateTime<Utc>, _>("updated_at")?),
        })
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskRepository {
    async fn list_all(&self) -> Result<Vec<Task>> {
        debug!("Fetching all tasks");

        let rows = sqlx::query(
            r#"
            SELECT id, title, is_completed, created_at, updated_at
            FROM tasks
            ORDER BY created_at, rowid
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_task).collect()
    }

    async fn list_pending(&self) -> Result<Vec<Task>> {
        debug!("Fetching pending tasks");

        let rows = sqlx::query(
            r#"
            SELECT id, title, is_completed, created_at, updated_at
            FROM tasks
            WHERE is_completed = ?
            ORDER BY created_at, rowid
            "#,
        )
        .bind(false)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::row_to_task).collect()
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Task> {
        debug!("Fetching task: {}", id);

        let row = sqlx::query(
            r#"
            SELECT id, title, is_completed, created_at, updated_at
            FROM tasks
            WHERE id = ?
            "#,
        )
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Self::row_to_task(&row)
    }

    async fn insert(&self, task: Task) -> Result<Task> {
        let id = Uuid::new_v4();
        let now = Utc::now();

        debug!("Creating task: {}", id);

        sqlx::query(
            r#"
            INSERT INTO tasks (id, title, is_completed, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&task.title)
        .bind(task.is_completed)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    async fn update(&self, task: Task) -> Result<Task> {
        let id = task.id.ok_or(StorageError::Unsaved)?;
        // Clock skew must never put updated_at before created_at.
        let now = match task.created_at {
            Some(created_at) => Utc::now().max(created_at),
            None => Utc::now(),
        };

        debug!("Updating task: {}", id);

        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET title = ?, is_completed = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&task.title)
        .bind(task.is_completed)
        .bind(now)
        .bind(id.to_string())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        self.get_by_id(id).await
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        debug!("Deleting task: {}", id);

        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }

    async fn stats(&self) -> Result<TaskStats> {
        let row = sqlx::query(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN is_completed THEN 1 ELSE 0 END), 0) AS completed
            FROM tasks
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(TaskStats::new(row.try_get("total")?, row.try_get("completed")?))
    }
}
