//! Transcode job payload carried on the queue.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

use crate::media::MediaId;

/// Unique identifier for a queued job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub String);

impl JobId {
    /// Generate a new random job ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Payload validation failure; reported as a terminal `error` without ever
/// invoking the transcoder.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum JobValidationError {
    #[error("job payload is missing {0}")]
    MissingField(&'static str),
}

/// Job to transcode one source media file into renditions.
///
/// The queue owns the lifecycle of this payload; it is never persisted
/// beyond the stream's own retention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscodeJob {
    /// Unique job ID
    #[serde(default)]
    pub job_id: JobId,
    /// Media item this job transcodes
    pub media_id: MediaId,
    /// Path of the uploaded source file
    pub source_path: String,
    /// Directory the transcoder must populate with renditions
    pub output_dir: String,
    /// When the job was enqueued
    #[serde(default = "Utc::now")]
    pub enqueued_at: DateTime<Utc>,
    /// How many times the queue has handed this job to a worker.
    /// Bumped when a crashed worker's message is claimed.
    #[serde(default)]
    pub delivery_attempt: u32,
}

impl TranscodeJob {
    /// Create a new job.
    pub fn new(
        media_id: impl Into<MediaId>,
        source_path: impl Into<String>,
        output_dir: impl Into<String>,
    ) -> Self {
        Self {
            job_id: JobId::new(),
            media_id: media_id.into(),
            source_path: source_path.into(),
            output_dir: output_dir.into(),
            enqueued_at: Utc::now(),
            delivery_attempt: 0,
        }
    }

    /// Check the payload fields a worker needs before touching the
    /// transcoder. Invalid payloads become an immediate terminal `error`.
    pub fn validate(&self) -> Result<(), JobValidationError> {
        if self.media_id.is_empty() {
            return Err(JobValidationError::MissingField("mediaId"));
        }
        if self.source_path.trim().is_empty() {
            return Err(JobValidationError::MissingField("sourcePath"));
        }
        if self.output_dir.trim().is_empty() {
            return Err(JobValidationError::MissingField("outputDir"));
        }
        Ok(())
    }

    /// Generate idempotency key for deduplication.
    ///
    /// One in-flight job per media item; the ingest side never enqueues a
    /// second job while one is pending or transcoding.
    pub fn idempotency_key(&self) -> String {
        format!("transcode:{}", self.media_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn job_serde_roundtrip_uses_camel_case() {
        let job = TranscodeJob::new("V1", "data/videos/V1/original.mp4", "data/videos/V1/transcoded");
        let json = serde_json::to_value(&job).expect("serialize TranscodeJob");

        assert_eq!(json["mediaId"], "V1");
        assert_eq!(json["sourcePath"], "data/videos/V1/original.mp4");
        assert_eq!(json["outputDir"], "data/videos/V1/transcoded");

        let decoded: TranscodeJob = serde_json::from_value(json).expect("deserialize TranscodeJob");
        assert_eq!(decoded.job_id, job.job_id);
        assert_eq!(decoded.media_id, job.media_id);
        assert_eq!(decoded.delivery_attempt, 0);
    }

    #[test]
    fn minimal_queue_payload_parses() {
        // Ingest collaborators only guarantee the three payload fields.
        let job: TranscodeJob = serde_json::from_str(
            r#"{"mediaId":"V1","sourcePath":"a.mp4","outputDir":"out"}"#,
        )
        .expect("minimal payload");
        assert_eq!(job.media_id.as_str(), "V1");
        assert!(job.validate().is_ok());
    }

    #[test]
    fn validation_rejects_empty_fields() {
        let mut job = TranscodeJob::new("V1", "a.mp4", "out");
        assert!(job.validate().is_ok());

        job.source_path = " ".to_string();
        assert_eq!(
            job.validate(),
            Err(JobValidationError::MissingField("sourcePath"))
        );

        job = TranscodeJob::new("", "a.mp4", "out");
        assert_eq!(
            job.validate(),
            Err(JobValidationError::MissingField("mediaId"))
        );

        job = TranscodeJob::new("V1", "a.mp4", "");
        assert_eq!(
            job.validate(),
            Err(JobValidationError::MissingField("outputDir"))
        );
    }

    #[test]
    fn idempotency_key_is_per_media() {
        let a = TranscodeJob::new("V1", "a.mp4", "out");
        let b = TranscodeJob::new("V1", "b.mp4", "out2");
        assert_eq!(a.idempotency_key(), b.idempotency_key());
    }
}
