use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation: {0}")]
    Validation(String),

    #[error("provider: {0}")]
    Provider(String),

    #[error("webhook signature: {0}")]
    Signature(String),

    #[error("database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization: {0}")]
    Serialization(#[from] serde_json::Error),
}
