//! Media identifiers, statuses and the durable record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a media item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(pub String);

impl MediaId {
    /// Generate a new random media ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for MediaId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for MediaId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for MediaId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Media processing status.
///
/// Transitions are monotonic: `pending` → `transcoding` → `ready` or
/// `error`. Terminal statuses absorb every later transition attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MediaStatus {
    /// Registered, transcode job not yet handed to the queue
    #[default]
    Pending,
    /// A transcode job is enqueued or running
    Transcoding,
    /// Renditions are available for playback
    Ready,
    /// Transcoding failed
    Error,
}

impl MediaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaStatus::Pending => "pending",
            MediaStatus::Transcoding => "transcoding",
            MediaStatus::Ready => "ready",
            MediaStatus::Error => "error",
        }
    }

    /// A terminal status never transitions again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, MediaStatus::Ready | MediaStatus::Error)
    }

    /// Whether the state machine permits `self` → `next`.
    ///
    /// `pending` may not jump straight to a terminal status; the ingest
    /// side always enters `transcoding` before a job reaches the queue.
    pub fn can_transition_to(&self, next: MediaStatus) -> bool {
        matches!(
            (self, next),
            (MediaStatus::Pending, MediaStatus::Transcoding)
                | (MediaStatus::Transcoding, MediaStatus::Ready)
                | (MediaStatus::Transcoding, MediaStatus::Error)
        )
    }
}

impl fmt::Display for MediaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for MediaStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MediaStatus::Pending),
            "transcoding" => Ok(MediaStatus::Transcoding),
            "ready" => Ok(MediaStatus::Ready),
            "error" => Ok(MediaStatus::Error),
            other => Err(format!("unknown media status: {other}")),
        }
    }
}

/// Terminal outcome a completion callback may carry.
///
/// This is deliberately narrower than [`MediaStatus`]: the worker tier can
/// only ever report `ready` or `error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscodeOutcome {
    Ready,
    Error,
}

impl TranscodeOutcome {
    pub fn as_status(&self) -> MediaStatus {
        match self {
            TranscodeOutcome::Ready => MediaStatus::Ready,
            TranscodeOutcome::Error => MediaStatus::Error,
        }
    }
}

impl fmt::Display for TranscodeOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_status().as_str())
    }
}

/// Durable media record.
///
/// The transcoding core owns `status`, `thumbnail` and `updated_at`;
/// everything else belongs to the ingest side and is carried verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaRecord {
    pub id: MediaId,

    /// Display title supplied at ingest
    pub title: String,

    /// Path of the uploaded source file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,

    /// Processing status
    #[serde(default)]
    pub status: MediaStatus,

    /// Thumbnail path; assigned at most once (set-if-absent on `ready`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MediaRecord {
    /// Create a new pending record.
    pub fn new(
        id: MediaId,
        title: impl Into<String>,
        source_path: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            title: title.into(),
            source_path: Some(source_path.into()),
            status: MediaStatus::Pending,
            thumbnail: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set a thumbnail path (ingest-side, e.g. user supplied).
    pub fn with_thumbnail(mut self, path: impl Into<String>) -> Self {
        self.thumbnail = Some(path.into());
        self
    }
}

/// Completion callback payload (worker tier → serving tier).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRequest {
    pub media_id: MediaId,
    pub status: TranscodeOutcome,
}

/// Progress report payload (worker/transcoder → serving tier).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub media_id: MediaId,
    pub progress: u8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn media_id_generation_is_unique() {
        assert_ne!(MediaId::new(), MediaId::new());
    }

    #[test]
    fn status_transitions_are_monotonic() {
        use MediaStatus::*;

        assert!(Pending.can_transition_to(Transcoding));
        assert!(Transcoding.can_transition_to(Ready));
        assert!(Transcoding.can_transition_to(Error));

        // pending never jumps straight to a terminal status
        assert!(!Pending.can_transition_to(Ready));
        assert!(!Pending.can_transition_to(Error));

        // terminal statuses absorb everything
        for from in [Ready, Error] {
            for to in [Pending, Transcoding, Ready, Error] {
                assert!(!from.can_transition_to(to), "{from} -> {to} must be rejected");
            }
        }

        // no transition returns to an earlier state
        assert!(!Transcoding.can_transition_to(Pending));
    }

    #[test]
    fn status_serde_uses_snake_case() {
        let json = serde_json::to_string(&MediaStatus::Transcoding).unwrap();
        assert_eq!(json, "\"transcoding\"");
        let parsed: MediaStatus = serde_json::from_str("\"ready\"").unwrap();
        assert_eq!(parsed, MediaStatus::Ready);
    }

    #[test]
    fn completion_request_wire_format() {
        let req = CompletionRequest {
            media_id: MediaId::from_string("V1"),
            status: TranscodeOutcome::Ready,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["mediaId"], "V1");
        assert_eq!(json["status"], "ready");
    }

    #[test]
    fn outcome_maps_to_terminal_status() {
        assert_eq!(TranscodeOutcome::Ready.as_status(), MediaStatus::Ready);
        assert_eq!(TranscodeOutcome::Error.as_status(), MediaStatus::Error);
        assert!(TranscodeOutcome::Ready.as_status().is_terminal());
    }
}
