//! End-to-end handler tests over the router: callback transitions,
//! idempotent retries, progress merging and cache degradation.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use vodforge_api::{create_router, ApiConfig, AppState};
use vodforge_models::{MediaId, MediaRecord, MediaStatus};
use vodforge_queue::{
    CacheError, CacheResult, JobQueue, MemoryProgressCache, ProgressCache, QueueConfig,
};
use vodforge_store::{MediaStore, SqliteMediaStore};

const TOKEN: &str = "test-callback-token";

/// Cache double simulating an unreachable Redis.
struct FailingCache;

#[async_trait::async_trait]
impl ProgressCache for FailingCache {
    async fn set(&self, _media_id: &MediaId, _percent: u8) -> CacheResult<()> {
        Err(CacheError::unavailable("connection refused"))
    }

    async fn get(&self, _media_id: &MediaId) -> CacheResult<Option<u8>> {
        Err(CacheError::unavailable("connection refused"))
    }

    async fn delete(&self, _media_id: &MediaId) -> CacheResult<()> {
        Err(CacheError::unavailable("connection refused"))
    }
}

async fn test_state_with_cache(cache: Arc<dyn ProgressCache>) -> AppState {
    let store = SqliteMediaStore::memory().await.expect("memory store");
    let queue = JobQueue::new(QueueConfig::default()).expect("queue client");

    let config = ApiConfig {
        callback_token: TOKEN.to_string(),
        ..ApiConfig::default()
    };

    AppState::with_parts(config, Arc::new(store), cache, Arc::new(queue))
}

async fn test_state() -> AppState {
    test_state_with_cache(Arc::new(MemoryProgressCache::new())).await
}

/// Insert a record the way the ingest path leaves it: transcoding, job on
/// the queue.
async fn seed_transcoding(state: &AppState, id: &str) {
    let record = MediaRecord::new(MediaId::from_string(id), "clip", "src.mp4");
    state.store.insert(&record).await.expect("insert");
    state
        .store
        .mark_transcoding(&record.id)
        .await
        .expect("mark transcoding");
}

fn completion(id: &str, status: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/transcode/complete")
        .header("Content-Type", "application/json");
    if let Some(token) = token {
        builder = builder.header("Authorization", token);
    }
    builder
        .body(Body::from(format!(
            r#"{{"mediaId":"{id}","status":"{status}"}}"#
        )))
        .expect("request")
}

fn progress_query(id: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(format!("/api/videos/progress?mediaId={id}"))
        .body(Body::empty())
        .expect("request")
}

async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = create_router(state.clone())
        .oneshot(request)
        .await
        .expect("router response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

#[tokio::test]
async fn callback_without_credential_is_rejected() {
    let state = test_state().await;
    seed_transcoding(&state, "V1").await;

    let (status, _) = send(&state, completion("V1", "ready", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&state, completion("V1", "ready", Some("wrong-token"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // no state mutation
    let record = state
        .store
        .get(&MediaId::from_string("V1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, MediaStatus::Transcoding);
}

#[tokio::test]
async fn callback_for_unknown_media_is_404_and_creates_nothing() {
    let state = test_state().await;

    let (status, _) = send(&state, completion("ghost", "ready", Some(TOKEN))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let record = state.store.get(&MediaId::from_string("ghost")).await.unwrap();
    assert!(record.is_none());
}

#[tokio::test]
async fn ready_callback_completes_the_pipeline() {
    let state = test_state().await;
    seed_transcoding(&state, "V1").await;

    let id = MediaId::from_string("V1");
    state.cache.set(&id, 80).await.unwrap();

    let (status, _) = send(&state, completion("V1", "ready", Some(TOKEN))).await;
    assert_eq!(status, StatusCode::OK);

    // durable record is terminal, default thumbnail populated
    let record = state.store.get(&id).await.unwrap().unwrap();
    assert_eq!(record.status, MediaStatus::Ready);
    assert_eq!(
        record.thumbnail.as_deref(),
        Some("data/videos/V1/thumbnail.jpg")
    );

    // progress entry is gone, polling reports 100 from durable status
    assert_eq!(state.cache.get(&id).await.unwrap(), None);
    let (status, body) = send(&state, progress_query("V1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progress"], 100);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn error_callback_is_terminal_and_clears_progress() {
    let state = test_state().await;
    seed_transcoding(&state, "V2").await;

    let id = MediaId::from_string("V2");
    state.cache.set(&id, 30).await.unwrap();

    let (status, _) = send(&state, completion("V2", "error", Some(TOKEN))).await;
    assert_eq!(status, StatusCode::OK);

    let record = state.store.get(&id).await.unwrap().unwrap();
    assert_eq!(record.status, MediaStatus::Error);
    assert_eq!(record.thumbnail, None);
    assert_eq!(state.cache.get(&id).await.unwrap(), None);
}

#[tokio::test]
async fn retried_callback_is_absorbed() {
    let state = test_state().await;
    seed_transcoding(&state, "V1").await;
    let id = MediaId::from_string("V1");

    let (status, _) = send(&state, completion("V1", "ready", Some(TOKEN))).await;
    assert_eq!(status, StatusCode::OK);
    let after_first = state.store.get(&id).await.unwrap().unwrap();

    // same callback again, e.g. a retried HTTP delivery
    let (status, _) = send(&state, completion("V1", "ready", Some(TOKEN))).await;
    assert_eq!(status, StatusCode::OK);
    let after_second = state.store.get(&id).await.unwrap().unwrap();

    assert_eq!(after_first.status, after_second.status);
    assert_eq!(after_first.thumbnail, after_second.thumbnail);
    assert_eq!(after_first.updated_at, after_second.updated_at);
}

#[tokio::test]
async fn existing_thumbnail_is_never_overwritten() {
    let state = test_state().await;
    let record = MediaRecord::new(MediaId::from_string("V1"), "clip", "src.mp4")
        .with_thumbnail("custom.jpg");
    state.store.insert(&record).await.unwrap();
    state.store.mark_transcoding(&record.id).await.unwrap();

    let (status, _) = send(&state, completion("V1", "ready", Some(TOKEN))).await;
    assert_eq!(status, StatusCode::OK);

    let record = state.store.get(&record.id).await.unwrap().unwrap();
    assert_eq!(record.thumbnail.as_deref(), Some("custom.jpg"));
}

#[tokio::test]
async fn progress_defaults_to_zero_before_any_report() {
    let state = test_state().await;
    seed_transcoding(&state, "V3").await;

    let (status, body) = send(&state, progress_query("V3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progress"], 0);
    assert_eq!(body["status"], "transcoding");
}

#[tokio::test]
async fn progress_reflects_reported_percent() {
    let state = test_state().await;
    seed_transcoding(&state, "V1").await;

    let report = Request::builder()
        .method("POST")
        .uri("/api/transcode/progress")
        .header("Content-Type", "application/json")
        .header("Authorization", TOKEN)
        .body(Body::from(r#"{"mediaId":"V1","progress":40}"#))
        .unwrap();
    let (status, _) = send(&state, report).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&state, progress_query("V1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progress"], 40);
}

#[tokio::test]
async fn reported_percent_is_clamped_to_bounds() {
    let state = test_state().await;
    seed_transcoding(&state, "V1").await;

    let report = Request::builder()
        .method("POST")
        .uri("/api/transcode/progress")
        .header("Content-Type", "application/json")
        .header("Authorization", TOKEN)
        .body(Body::from(r#"{"mediaId":"V1","progress":250}"#))
        .unwrap();
    let (status, _) = send(&state, report).await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = send(&state, progress_query("V1")).await;
    let progress = body["progress"].as_u64().expect("integer progress");
    assert!(progress <= 100);
}

#[tokio::test]
async fn durable_status_overrides_stale_cache() {
    let state = test_state().await;
    seed_transcoding(&state, "V1").await;
    let id = MediaId::from_string("V1");

    let (status, _) = send(&state, completion("V1", "ready", Some(TOKEN))).await;
    assert_eq!(status, StatusCode::OK);

    // a stale entry written after the terminal callback must not win
    state.cache.set(&id, 30).await.unwrap();

    let (_, body) = send(&state, progress_query("V1")).await;
    assert_eq!(body["progress"], 100);
}

#[tokio::test]
async fn progress_query_for_unknown_media_is_404() {
    let state = test_state().await;

    let (status, _) = send(&state, progress_query("ghost")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn progress_degrades_when_cache_is_unavailable() {
    let state = test_state_with_cache(Arc::new(FailingCache)).await;
    seed_transcoding(&state, "V1").await;

    let (status, body) = send(&state, progress_query("V1")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["progress"], 0);
    assert_eq!(body["status"], "transcoding");
}

#[tokio::test]
async fn terminal_callback_survives_cache_outage() {
    let state = test_state_with_cache(Arc::new(FailingCache)).await;
    seed_transcoding(&state, "V1").await;

    let (status, _) = send(&state, completion("V1", "ready", Some(TOKEN))).await;
    assert_eq!(status, StatusCode::OK);

    let record = state
        .store
        .get(&MediaId::from_string("V1"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(record.status, MediaStatus::Ready);
}

#[tokio::test]
async fn ingest_requires_a_source_path() {
    let state = test_state().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/videos/ingest")
        .header("Content-Type", "application/json")
        .header("Authorization", TOKEN)
        .body(Body::from(r#"{"title":"clip","sourcePath":" "}"#))
        .unwrap();
    let (status, _) = send(&state, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ingest_requires_the_shared_credential() {
    let state = test_state().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/videos/ingest")
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"sourcePath":"src.mp4"}"#))
        .unwrap();
    let (status, _) = send(&state, request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
