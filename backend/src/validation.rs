use shared::{CreateTaskRequest, UpdateTaskRequest};
use thiserror::Error;
use unicode_segmentation::UnicodeSegmentation;

/// Maximum title length, counted in grapheme clusters.
pub const MAX_TITLE_LENGTH: usize = 100;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title must be at most {max} characters (got {len})", max = MAX_TITLE_LENGTH)]
    TitleTooLong { len: usize },
}

/// Fields a handler may write to the store once validation has passed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedTask {
    pub title: String,
    pub is_completed: bool,
}

/// The raw string is checked; no trimming happens.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }

    let len = title.graphemes(true).count();
    if len > MAX_TITLE_LENGTH {
        return Err(ValidationError::TitleTooLong { len });
    }

    Ok(())
}

pub fn validate_create(request: CreateTaskRequest) -> Result<ValidatedTask, ValidationError> {
    validate_title(&request.title)?;
    Ok(ValidatedTask {
        title: request.title,
        is_completed: request.is_completed,
    })
}

pub fn validate_update(request: UpdateTaskRequest) -> Result<ValidatedTask, ValidationError> {
    validate_title(&request.title)?;
    Ok(ValidatedTask {
        title: request.title,
        is_completed: request.is_completed,
    })
}
