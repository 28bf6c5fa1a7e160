//! Axum HTTP API server.
//!
//! This crate provides the serving tier of the transcoding pipeline:
//! - The authenticated completion callback (single state-transition
//!   authority for terminal media statuses)
//! - Progress reporting and polling endpoints
//! - The ingest hand-off that registers a record and enqueues its job

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod paths;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
