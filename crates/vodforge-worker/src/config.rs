//! Worker configuration.

use std::time::Duration;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Maximum concurrent jobs; caps simultaneous transcoder processes
    pub max_concurrent_jobs: usize,
    /// Per-job transcoder execution bound
    pub job_timeout: Duration,
    /// Graceful shutdown drain bound
    pub shutdown_timeout: Duration,
    /// How often the worker scans for orphaned pending jobs
    pub claim_interval: Duration,
    /// Minimum idle time before a pending job can be claimed (crash recovery)
    pub claim_min_idle: Duration,
    /// External transcoder command
    pub transcoder_program: String,
    /// Base URL of the serving tier
    pub callback_url: String,
    /// Shared secret presented on callbacks; also handed to the transcoder
    pub callback_token: String,
    /// Redis URL (progress cache)
    pub redis_url: String,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: 2,
            job_timeout: Duration::from_secs(600),
            shutdown_timeout: Duration::from_secs(30),
            claim_interval: Duration::from_secs(30),
            claim_min_idle: Duration::from_secs(300),
            transcoder_program: "./transcode.sh".to_string(),
            callback_url: "http://localhost:8000".to_string(),
            callback_token: String::new(),
            redis_url: "redis://localhost:6379".to_string(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            max_concurrent_jobs: std::env::var("WORKER_MAX_JOBS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            job_timeout: Duration::from_secs(
                std::env::var("WORKER_JOB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(600),
            ),
            shutdown_timeout: Duration::from_secs(
                std::env::var("WORKER_SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            claim_interval: Duration::from_secs(
                std::env::var("WORKER_CLAIM_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            claim_min_idle: Duration::from_secs(
                std::env::var("WORKER_CLAIM_MIN_IDLE_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(300),
            ),
            transcoder_program: std::env::var("TRANSCODER_PROGRAM")
                .unwrap_or_else(|_| "./transcode.sh".to_string()),
            callback_url: std::env::var("CALLBACK_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            callback_token: std::env::var("CALLBACK_TOKEN").unwrap_or_default(),
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
        }
    }
}
