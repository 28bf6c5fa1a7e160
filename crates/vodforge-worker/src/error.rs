//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("invalid job payload: {0}")]
    Validation(#[from] vodforge_models::JobValidationError),

    #[error("transcode failed: {0}")]
    Execution(#[from] vodforge_media::MediaError),

    #[error("callback rejected: bad credential")]
    CallbackAuth,

    #[error("callback rejected: unknown media {0}")]
    MediaNotFound(String),

    #[error("callback rejected with status {0}")]
    CallbackRejected(reqwest::StatusCode),

    #[error("callback delivery failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("queue error: {0}")]
    Queue(#[from] vodforge_queue::QueueError),

    #[error("configuration error: {0}")]
    Config(String),
}

impl WorkerError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
