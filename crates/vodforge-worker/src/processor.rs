//! Per-job transcode pipeline.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use vodforge_media::{CommandTranscoder, Transcoder};
use vodforge_models::{TranscodeJob, TranscodeOutcome};
use vodforge_queue::{ProgressCache, RedisProgressCache};

use crate::callback::CallbackClient;
use crate::config::WorkerConfig;
use crate::error::WorkerResult;

/// Collaborators a job needs, constructed once at worker start.
pub struct WorkerContext {
    pub transcoder: Arc<dyn Transcoder>,
    pub cache: Arc<dyn ProgressCache>,
    pub callback: CallbackClient,
}

impl WorkerContext {
    /// Build the production context from config.
    pub fn from_config(config: &WorkerConfig) -> WorkerResult<Self> {
        let transcoder = CommandTranscoder::new(
            config.transcoder_program.clone(),
            config.callback_token.clone(),
        )
        .with_timeout(config.job_timeout);
        let cache = RedisProgressCache::new(&config.redis_url)
            .map_err(|e| crate::error::WorkerError::config(e.to_string()))?;
        let callback =
            CallbackClient::new(config.callback_url.clone(), config.callback_token.clone())?;

        Ok(Self {
            transcoder: Arc::new(transcoder),
            cache: Arc::new(cache),
            callback,
        })
    }
}

/// Run one delivered job to its terminal outcome.
///
/// Failures never escape this function; every one of them is the same
/// thing to the rest of the system — a terminal `error`. The caller is
/// responsible for delivering the outcome exactly once per attempt.
pub async fn run_transcode(ctx: &WorkerContext, job: &TranscodeJob) -> TranscodeOutcome {
    if let Err(e) = job.validate() {
        // malformed payloads skip the transcoder entirely, no retry
        warn!(job_id = %job.job_id, error = %e, "rejecting malformed job");
        return TranscodeOutcome::Error;
    }

    // seed the entry so pollers see the item as in flight; best effort
    if let Err(e) = ctx.cache.set(&job.media_id, 0).await {
        debug!(media_id = %job.media_id, error = %e, "progress seed dropped");
    }

    info!(
        job_id = %job.job_id,
        media_id = %job.media_id,
        attempt = job.delivery_attempt,
        "transcoding"
    );

    match ctx
        .transcoder
        .execute(
            Path::new(&job.source_path),
            Path::new(&job.output_dir),
            job.media_id.as_str(),
        )
        .await
    {
        Ok(()) => {
            info!(media_id = %job.media_id, "transcode succeeded");
            TranscodeOutcome::Ready
        }
        Err(e) => {
            error!(media_id = %job.media_id, error = %e, "transcode failed");
            TranscodeOutcome::Error
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use vodforge_media::{MediaError, MediaResult};
    use vodforge_models::MediaId;
    use vodforge_queue::MemoryProgressCache;

    struct StubTranscoder {
        fail: bool,
        called: Arc<AtomicBool>,
    }

    #[async_trait::async_trait]
    impl Transcoder for StubTranscoder {
        async fn execute(
            &self,
            _source: &Path,
            _output_dir: &Path,
            _media_id: &str,
        ) -> MediaResult<()> {
            self.called.store(true, Ordering::SeqCst);
            if self.fail {
                Err(MediaError::exit_status(Some(1), "boom"))
            } else {
                Ok(())
            }
        }
    }

    fn context(fail: bool, called: Arc<AtomicBool>) -> WorkerContext {
        WorkerContext {
            transcoder: Arc::new(StubTranscoder { fail, called }),
            cache: Arc::new(MemoryProgressCache::new()),
            // never dialed by run_transcode
            callback: CallbackClient::new("http://localhost:1", "token").unwrap(),
        }
    }

    #[tokio::test]
    async fn successful_transcode_reports_ready() {
        let called = Arc::new(AtomicBool::new(false));
        let ctx = context(false, Arc::clone(&called));
        let job = TranscodeJob::new("V1", "src.mp4", "out");

        let outcome = run_transcode(&ctx, &job).await;
        assert_eq!(outcome, TranscodeOutcome::Ready);
        assert!(called.load(Ordering::SeqCst));

        // progress entry was seeded for pollers
        let percent = ctx.cache.get(&MediaId::from_string("V1")).await.unwrap();
        assert_eq!(percent, Some(0));
    }

    #[tokio::test]
    async fn failed_transcode_reports_error() {
        let called = Arc::new(AtomicBool::new(false));
        let ctx = context(true, Arc::clone(&called));
        let job = TranscodeJob::new("V1", "src.mp4", "out");

        let outcome = run_transcode(&ctx, &job).await;
        assert_eq!(outcome, TranscodeOutcome::Error);
        assert!(called.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn malformed_job_never_reaches_the_transcoder() {
        let called = Arc::new(AtomicBool::new(false));
        let ctx = context(false, Arc::clone(&called));
        let job = TranscodeJob::new("V1", "", "out");

        let outcome = run_transcode(&ctx, &job).await;
        assert_eq!(outcome, TranscodeOutcome::Error);
        assert!(!called.load(Ordering::SeqCst));
    }
}
