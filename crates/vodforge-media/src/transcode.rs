//! Transcoder command runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::{MediaError, MediaResult};

/// Default per-job execution bound.
pub const DEFAULT_TIMEOUT_SECS: u64 = 600;

/// A transcoder turns one source file into playable renditions under
/// `output_dir`. Success means the renditions exist; any other outcome is
/// a failure the worker converts into a terminal `error`.
#[async_trait]
pub trait Transcoder: Send + Sync {
    async fn execute(&self, source: &Path, output_dir: &Path, media_id: &str) -> MediaResult<()>;
}

/// Runs an external transcoder command.
///
/// Invocation contract: `<program> <source> <output_dir> <media_id>
/// <auth_token>`, exit 0 and a populated output directory on success. The
/// token lets the command report progress to the serving tier itself.
pub struct CommandTranscoder {
    program: PathBuf,
    auth_token: String,
    timeout: Duration,
}

impl CommandTranscoder {
    /// Create a new runner for `program`.
    pub fn new(program: impl Into<PathBuf>, auth_token: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            auth_token: auth_token.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set the execution bound. The process is killed on expiry.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// At least one rendition file must land in the output directory.
    async fn verify_renditions(&self, output_dir: &Path) -> MediaResult<()> {
        let mut entries = tokio::fs::read_dir(output_dir)
            .await
            .map_err(|_| MediaError::MissingRenditions(output_dir.to_path_buf()))?;

        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                return Ok(());
            }
        }
        Err(MediaError::MissingRenditions(output_dir.to_path_buf()))
    }
}

#[async_trait]
impl Transcoder for CommandTranscoder {
    async fn execute(&self, source: &Path, output_dir: &Path, media_id: &str) -> MediaResult<()> {
        let program = which::which(&self.program)
            .map_err(|_| MediaError::TranscoderNotFound(self.program.clone()))?;

        tokio::fs::create_dir_all(output_dir).await?;

        debug!(
            program = %program.display(),
            source = %source.display(),
            output_dir = %output_dir.display(),
            media_id,
            "invoking transcoder"
        );

        let child = Command::new(&program)
            .arg(source)
            .arg(output_dir)
            .arg(media_id)
            .arg(&self.auth_token)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()?;

        // kill_on_drop reaps the child when the timeout drops this future
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(media_id, timeout_secs = self.timeout.as_secs(), "transcoder timed out");
                return Err(MediaError::Timeout(self.timeout.as_secs()));
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(MediaError::exit_status(
                output.status.code(),
                stderr_tail(&stderr),
            ));
        }

        self.verify_renditions(output_dir).await
    }
}

/// Last few stderr lines, enough to diagnose without shipping the full log.
fn stderr_tail(stderr: &str) -> String {
    const MAX_LINES: usize = 5;
    let lines: Vec<&str> = stderr.lines().rev().take(MAX_LINES).collect();
    lines.into_iter().rev().collect::<Vec<_>>().join("\n")
}
