use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::{debug, info};

use crate::config::Config;
use crate::storage::StorageError;

const CREATE_TASKS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id TEXT PRIMARY KEY NOT NULL,
        title TEXT NOT NULL,
        is_completed BOOLEAN NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
"#;

const DROP_TASKS_TABLE: &str = "DROP TABLE IF EXISTS tasks";

/// Opens the process-wide pool. In-memory databases are pinned to a single
/// connection that is never recycled, otherwise each connection would see its
/// own empty database.
pub async fn connect(config: &Config) -> Result<SqlitePool, StorageError> {
    let options = SqliteConnectOptions::from_str(&config.database_url)?.create_if_missing(true);

    let pool = if config.is_in_memory() {
        SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?
    } else {
        SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .connect_with(options)
            .await?
    };

    info!("Connected to database at {}", config.database_url);
    Ok(pool)
}

/// Creates the `tasks` table when it does not exist yet.
pub async fn migrate(pool: &SqlitePool) -> Result<(), StorageError> {
    debug!("Running migration: create tasks table");
    sqlx::query(CREATE_TASKS_TABLE).execute(pool).await?;
    Ok(())
}

pub async fn revert(pool: &SqlitePool) -> Result<(), StorageError> {
    debug!("Reverting migration: drop tasks table");
    sqlx::query(DROP_TASKS_TABLE).execute(pool).await?;
    Ok(())
}
