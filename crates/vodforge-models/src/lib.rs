//! Shared data models for the vodforge backend.
//!
//! This crate provides Serde-serializable types for:
//! - Media identifiers, statuses and durable records
//! - Transcode job payloads carried on the queue
//! - Completion callback and progress wire schemas

pub mod job;
pub mod media;

// Re-export common types
pub use job::{JobId, JobValidationError, TranscodeJob};
pub use media::{
    CompletionRequest, MediaId, MediaRecord, MediaStatus, ProgressReport, TranscodeOutcome,
};
