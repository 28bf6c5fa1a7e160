//! Media error types.

use std::path::PathBuf;
use thiserror::Error;

pub type MediaResult<T> = Result<T, MediaError>;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("transcoder not found: {0}")]
    TranscoderNotFound(PathBuf),

    #[error("transcoder exited with status {code:?}: {detail}")]
    ExitStatus { code: Option<i32>, detail: String },

    #[error("transcoder produced no renditions in {0}")]
    MissingRenditions(PathBuf),

    #[error("transcoder timed out after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    pub fn exit_status(code: Option<i32>, detail: impl Into<String>) -> Self {
        Self::ExitStatus {
            code,
            detail: detail.into(),
        }
    }
}
