//! Error types for the scheduler and the item store.
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SchedulerError {
    #[error("quality rating {0} is outside 0..=5")]
    InvalidQuality(i64),
    #[error("quality rating '{0}' is not a number")]
    UnparsableQuality(String),
    #[error("no progress record for sentence '{0}'; initialize it before reviewing")]
    MissingProgress(String),
    #[error("invalid progress record for sentence '{id}': {reason}")]
    InvalidProgress { id: String, reason: String },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("not found: entity={entity}, key={key}")]
    NotFound { entity: &'static str, key: String },
    #[error("corrupt stored value: key={key}, value={value}")]
    CorruptState { key: &'static str, value: String },
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
}

impl StoreError {
    pub fn sentence_not_found(id: &str) -> Self {
        StoreError::NotFound {
            entity: "sentence",
            key: id.to_string(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
