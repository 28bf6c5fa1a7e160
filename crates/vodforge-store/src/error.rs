//! Store error types.

use thiserror::Error;
use vodforge_models::MediaStatus;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("media not found: {0}")]
    NotFound(String),

    #[error("media already exists: {0}")]
    AlreadyExists(String),

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition { from: MediaStatus, to: MediaStatus },

    #[error("corrupt record for {id}: {detail}")]
    Corrupt { id: String, detail: String },

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl StoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound(id.into())
    }

    pub fn corrupt(id: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::Corrupt {
            id: id.into(),
            detail: detail.into(),
        }
    }
}
