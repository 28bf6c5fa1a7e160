//! Progress query handler.

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;

use vodforge_models::{MediaId, MediaStatus};
use vodforge_queue::ProgressCache;
use vodforge_store::MediaStore;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressQuery {
    pub media_id: String,
}

#[derive(Serialize)]
pub struct ProgressResponse {
    pub progress: u8,
    pub status: String,
}

/// Current transcode percent for one media item.
///
/// The durable status is consulted first: once `ready`, the answer is 100
/// no matter what a stale cache entry says. Otherwise the cache value is
/// used when present, and a missing or unreachable cache degrades to 0 —
/// polling never fails because the ephemeral store is down.
pub async fn get_progress(
    State(state): State<AppState>,
    Query(query): Query<ProgressQuery>,
) -> ApiResult<Json<ProgressResponse>> {
    let media_id = MediaId::from_string(query.media_id);

    let record = state
        .store
        .get(&media_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("media {media_id}")))?;

    let progress = if record.status == MediaStatus::Ready {
        100
    } else {
        match state.cache.get(&media_id).await {
            Ok(value) => value.unwrap_or(0),
            Err(e) => {
                warn!(media_id = %media_id, error = %e, "progress cache unavailable, reporting 0");
                0
            }
        }
    };

    Ok(Json(ProgressResponse {
        progress,
        status: record.status.as_str().to_string(),
    }))
}
