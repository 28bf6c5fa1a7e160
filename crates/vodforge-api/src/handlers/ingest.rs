//! Ingest hand-off: register a record and enqueue its transcode job.
//!
//! Upload handling, storage layout and ownership checks live with the
//! ingest collaborator; this endpoint only receives the finished hand-off.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use vodforge_models::{MediaId, MediaRecord, MediaStatus, TranscodeJob};
use vodforge_store::MediaStore;

use crate::auth::WorkerAuth;
use crate::error::{ApiError, ApiResult};
use crate::paths::rendition_dir;
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestRequest {
    /// Caller-assigned id; generated when absent
    pub media_id: Option<String>,
    pub title: Option<String>,
    pub source_path: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    pub media_id: String,
    pub status: String,
}

/// Register a media item and enqueue its transcode job.
///
/// The record always enters `transcoding` before the job reaches the
/// queue, so a worker can never observe a `pending` record for a job it
/// holds. One in-flight job per media item; duplicates are rejected with
/// 409.
pub async fn ingest_media(
    State(state): State<AppState>,
    _auth: WorkerAuth,
    Json(req): Json<IngestRequest>,
) -> ApiResult<Json<IngestResponse>> {
    if req.source_path.trim().is_empty() {
        return Err(ApiError::bad_request("sourcePath is required"));
    }

    let media_id = req
        .media_id
        .filter(|s| !s.trim().is_empty())
        .map(MediaId::from_string)
        .unwrap_or_default();

    let record = MediaRecord::new(
        media_id.clone(),
        req.title.unwrap_or_default(),
        req.source_path.clone(),
    );
    state.store.insert(&record).await?;

    state.store.mark_transcoding(&media_id).await?;

    let output_dir = rendition_dir(&state.config.media_root, &media_id);
    let job = TranscodeJob::new(media_id.clone(), req.source_path, output_dir);
    state.queue.enqueue(&job).await?;

    info!(media_id = %media_id, job_id = %job.job_id, "media ingested, job enqueued");

    Ok(Json(IngestResponse {
        media_id: media_id.to_string(),
        status: MediaStatus::Transcoding.as_str().to_string(),
    }))
}
