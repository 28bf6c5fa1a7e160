//! Queue and cache error types.

use thiserror::Error;

pub type QueueResult<T> = Result<T, QueueError>;

#[derive(Debug, Error)]
pub enum QueueError {
    #[error("enqueue failed: {0}")]
    EnqueueFailed(String),

    #[error("a transcode job for {0} is already in flight")]
    DuplicateJob(String),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl QueueError {
    pub fn enqueue_failed(msg: impl Into<String>) -> Self {
        Self::EnqueueFailed(msg.into())
    }
}

pub type CacheResult<T> = Result<T, CacheError>;

/// Progress cache failure. Every caller treats this as degradation: the
/// terminal state lives in the durable store, never here.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache unavailable: {0}")]
    Unavailable(String),

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}

impl CacheError {
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }
}
