//! The store trait the serving tier is written against.

use async_trait::async_trait;

use vodforge_models::{MediaId, MediaRecord, TranscodeOutcome};

use crate::error::StoreResult;

/// Narrow interface over the durable record store.
///
/// Reads may run concurrently; each write is a single atomic statement per
/// record, which is all the serialization a callback needs.
#[async_trait]
pub trait MediaStore: Send + Sync {
    /// Insert a freshly ingested record. Fails on duplicate id.
    async fn insert(&self, record: &MediaRecord) -> StoreResult<()>;

    /// Fetch a record by id.
    async fn get(&self, id: &MediaId) -> StoreResult<Option<MediaRecord>>;

    /// Move a pending record into `transcoding` before its job is
    /// enqueued. Calling again while already transcoding is a no-op;
    /// terminal records are never demoted.
    async fn mark_transcoding(&self, id: &MediaId) -> StoreResult<()>;

    /// Apply a terminal outcome. This is the only path to `ready` or
    /// `error`.
    ///
    /// Semantics:
    /// - unknown id: [`StoreError::NotFound`](crate::StoreError::NotFound)
    /// - status already equals the outcome: no-op returning the stored
    ///   record, so retried callbacks produce the identical end state
    /// - otherwise one atomic update setting status and `updated_at`,
    ///   and (on `ready` only) `thumbnail = default_thumbnail` if no
    ///   thumbnail was ever set
    async fn complete(
        &self,
        id: &MediaId,
        outcome: TranscodeOutcome,
        default_thumbnail: &str,
    ) -> StoreResult<MediaRecord>;
}
