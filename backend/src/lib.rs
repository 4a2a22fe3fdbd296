pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod info;
pub mod routes;
pub mod storage;
pub mod telemetry;
pub mod validation;

pub use config::Config;
pub use error::ApiError;
pub use routes::{router, router_with_pool, Repository};
pub use storage::{SqliteTaskRepository, StorageError, TaskRepository};
