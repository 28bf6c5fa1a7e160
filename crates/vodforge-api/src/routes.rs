//! API routes.

use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;

use crate::handlers::health::health;
use crate::handlers::ingest::ingest_media;
use crate::handlers::progress::get_progress;
use crate::handlers::transcode::{complete_transcode, report_progress};
use crate::middleware::{request_id, request_logging};
use crate::state::AppState;

/// Create the API router.
pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        // Ingest hand-off (record + job)
        .route("/videos/ingest", post(ingest_media))
        // Client progress polling
        .route("/videos/progress", get(get_progress))
        // Worker tier: terminal outcome callback
        .route("/transcode/complete", post(complete_transcode))
        // Worker tier: progress reporting
        .route("/transcode/progress", post(report_progress));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
        .layer(middleware::from_fn(request_id))
        .layer(middleware::from_fn(request_logging))
        .with_state(state)
}
