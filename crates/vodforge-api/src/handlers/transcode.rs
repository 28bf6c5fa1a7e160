//! Completion callback and progress write handlers.
//!
//! `complete_transcode` is the single state-transition authority: no other
//! path moves a record into `ready` or `error`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, warn};

use vodforge_models::{CompletionRequest, ProgressReport};
use vodforge_queue::ProgressCache;
use vodforge_store::MediaStore;

use crate::auth::WorkerAuth;
use crate::error::ApiResult;
use crate::paths::default_thumbnail;
use crate::state::AppState;

/// Apply a terminal outcome reported by the worker tier.
///
/// Order matters: the ephemeral progress entry is cleared before the
/// durable update, and unconditionally for either outcome. A cache failure
/// only costs progress freshness; the authoritative transition still
/// happens. Retried callbacks are absorbed (200, no double side effects).
pub async fn complete_transcode(
    State(state): State<AppState>,
    _auth: WorkerAuth,
    Json(req): Json<CompletionRequest>,
) -> ApiResult<StatusCode> {
    if let Err(e) = state.cache.delete(&req.media_id).await {
        warn!(media_id = %req.media_id, error = %e, "failed to clear progress entry");
    }

    let thumbnail = default_thumbnail(&state.config.media_root, &req.media_id);
    let record = state
        .store
        .complete(&req.media_id, req.status, &thumbnail)
        .await?;

    info!(
        media_id = %req.media_id,
        status = %record.status,
        "terminal status applied"
    );

    Ok(StatusCode::OK)
}

/// Record transcode progress reported over HTTP.
///
/// Best-effort by contract: a dead cache degrades polling to 0, it never
/// fails the transcode, so an unavailable cache is not surfaced as an
/// error here.
pub async fn report_progress(
    State(state): State<AppState>,
    _auth: WorkerAuth,
    Json(report): Json<ProgressReport>,
) -> ApiResult<StatusCode> {
    if let Err(e) = state.cache.set(&report.media_id, report.progress).await {
        warn!(media_id = %report.media_id, error = %e, "progress write dropped");
    }

    Ok(StatusCode::OK)
}
