//! HTTP client for the serving tier's worker endpoints.

use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;

use vodforge_models::{CompletionRequest, MediaId, ProgressReport, TranscodeOutcome};

use crate::error::{WorkerError, WorkerResult};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for completion callbacks and progress reports.
///
/// Delivery is single-shot; the receiving handler is idempotent, so a
/// caller that does choose to retry is always safe.
pub struct CallbackClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl CallbackClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> WorkerResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        let base_url = base_url.into();
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// Report a terminal outcome for a media item.
    pub async fn complete(
        &self,
        media_id: &MediaId,
        status: TranscodeOutcome,
    ) -> WorkerResult<()> {
        let url = format!("{}/api/transcode/complete", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("Authorization", &self.token)
            .json(&CompletionRequest {
                media_id: media_id.clone(),
                status,
            })
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                debug!(media_id = %media_id, status = %status, "terminal callback delivered");
                Ok(())
            }
            StatusCode::UNAUTHORIZED => Err(WorkerError::CallbackAuth),
            StatusCode::NOT_FOUND => Err(WorkerError::MediaNotFound(media_id.to_string())),
            status => Err(WorkerError::CallbackRejected(status)),
        }
    }

    /// Report transcode progress. Best effort on the receiving side.
    pub async fn progress(&self, media_id: &MediaId, percent: u8) -> WorkerResult<()> {
        let url = format!("{}/api/transcode/progress", self.base_url);
        let response = self
            .http
            .post(&url)
            .header("Authorization", &self.token)
            .json(&ProgressReport {
                media_id: media_id.clone(),
                progress: percent,
            })
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => Ok(()),
            StatusCode::UNAUTHORIZED => Err(WorkerError::CallbackAuth),
            status => Err(WorkerError::CallbackRejected(status)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn complete_posts_the_callback_payload() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/transcode/complete"))
            .and(header("Authorization", "secret"))
            .and(body_json(serde_json::json!({
                "mediaId": "V1",
                "status": "ready"
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = CallbackClient::new(server.uri(), "secret").unwrap();
        client
            .complete(&MediaId::from_string("V1"), TranscodeOutcome::Ready)
            .await
            .expect("callback delivered");
    }

    #[tokio::test]
    async fn bad_credential_maps_to_callback_auth() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/transcode/complete"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let client = CallbackClient::new(server.uri(), "wrong").unwrap();
        let err = client
            .complete(&MediaId::from_string("V1"), TranscodeOutcome::Error)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::CallbackAuth));
    }

    #[tokio::test]
    async fn unknown_media_maps_to_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/transcode/complete"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = CallbackClient::new(server.uri(), "secret").unwrap();
        let err = client
            .complete(&MediaId::from_string("ghost"), TranscodeOutcome::Ready)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkerError::MediaNotFound(_)));
    }

    #[tokio::test]
    async fn progress_report_hits_the_progress_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/transcode/progress"))
            .and(body_json(serde_json::json!({
                "mediaId": "V1",
                "progress": 25
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let client = CallbackClient::new(server.uri(), "secret").unwrap();
        client
            .progress(&MediaId::from_string("V1"), 25)
            .await
            .expect("progress delivered");
    }
}
