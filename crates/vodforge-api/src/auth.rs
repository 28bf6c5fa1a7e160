//! Shared-token authentication for the worker tier.
//!
//! The completion callback and progress writes cross the trust boundary
//! between the worker tier and the serving tier. Both present a single
//! shared credential in the `Authorization` header; this is a capability
//! boundary suitable for single-tenant deployments, not a user identity.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::ApiError;
use crate::state::AppState;

/// Proof that the caller presented the shared callback credential.
#[derive(Debug, Clone, Copy)]
pub struct WorkerAuth;

#[axum::async_trait]
impl FromRequestParts<AppState> for WorkerAuth {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing Authorization header"))?;

        // the original transcoder script sends the bare token; tolerate a
        // Bearer prefix as well
        let token = header.strip_prefix("Bearer ").unwrap_or(header);

        if state.config.callback_token.is_empty() {
            // refuse everything rather than run open when unconfigured
            return Err(ApiError::unauthorized("Callback credential not configured"));
        }
        if token != state.config.callback_token {
            return Err(ApiError::unauthorized("Invalid callback credential"));
        }

        Ok(WorkerAuth)
    }
}
