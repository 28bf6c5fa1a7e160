//! Job queue using Redis Streams.

use std::time::Duration;

use redis::AsyncCommands;
use tracing::{debug, info, warn};

use vodforge_models::{MediaId, TranscodeJob};

use crate::error::{QueueError, QueueResult};

/// Queue configuration.
#[derive(Debug, Clone)]
pub struct QueueConfig {
    /// Redis URL
    pub redis_url: String,
    /// Stream name for transcode jobs
    pub stream_name: String,
    /// Consumer group name
    pub consumer_group: String,
    /// TTL on the per-media dedup key
    pub dedup_ttl: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://localhost:6379".to_string(),
            stream_name: "vodforge:jobs".to_string(),
            consumer_group: "vodforge:workers".to_string(),
            dedup_ttl: Duration::from_secs(3600),
        }
    }
}

impl QueueConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            stream_name: std::env::var("QUEUE_STREAM")
                .unwrap_or_else(|_| "vodforge:jobs".to_string()),
            consumer_group: std::env::var("QUEUE_CONSUMER_GROUP")
                .unwrap_or_else(|_| "vodforge:workers".to_string()),
            dedup_ttl: Duration::from_secs(
                std::env::var("QUEUE_DEDUP_TTL")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3600),
            ),
        }
    }
}

/// Job queue client.
///
/// Delivery is at-least-once: a job may reach more than one worker
/// invocation when a worker crashes before acknowledging. The completion
/// callback's idempotence is the safety net, not exactly-once delivery.
pub struct JobQueue {
    client: redis::Client,
    config: QueueConfig,
}

impl JobQueue {
    /// Create a new job queue.
    pub fn new(config: QueueConfig) -> QueueResult<Self> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> QueueResult<Self> {
        Self::new(QueueConfig::from_env())
    }

    /// Initialize the queue (create consumer group if not exists).
    pub async fn init(&self) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let result: Result<(), redis::RedisError> = redis::cmd("XGROUP")
            .arg("CREATE")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg("$")
            .arg("MKSTREAM")
            .query_async(&mut conn)
            .await;

        match result {
            Ok(_) => info!("Created consumer group: {}", self.config.consumer_group),
            Err(e) if e.to_string().contains("BUSYGROUP") => {
                debug!("Consumer group already exists: {}", self.config.consumer_group);
            }
            Err(e) => return Err(QueueError::Redis(e)),
        }

        Ok(())
    }

    /// Enqueue a transcode job.
    ///
    /// One in-flight job per media item: a second enqueue while the dedup
    /// key is alive is rejected. The key is cleared when the job is acked.
    pub async fn enqueue(&self, job: &TranscodeJob) -> QueueResult<String> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let payload = serde_json::to_string(job)?;
        let idempotency_key = job.idempotency_key();

        let dedup_key = dedup_key(&job.media_id);
        let exists: bool = conn.exists(&dedup_key).await?;
        if exists {
            warn!("Duplicate job rejected: {}", idempotency_key);
            return Err(QueueError::DuplicateJob(job.media_id.to_string()));
        }

        let message_id: String = redis::cmd("XADD")
            .arg(&self.config.stream_name)
            .arg("*")
            .arg("job")
            .arg(&payload)
            .arg("key")
            .arg(&idempotency_key)
            .query_async(&mut conn)
            .await?;

        conn.set_ex::<_, _, ()>(&dedup_key, "1", self.config.dedup_ttl.as_secs())
            .await?;

        info!(
            "Enqueued job {} for media {} with message ID {}",
            job.job_id, job.media_id, message_id
        );

        Ok(message_id)
    }

    /// Acknowledge a job (mark as completed).
    pub async fn ack(&self, message_id: &str) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        redis::cmd("XACK")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg(message_id)
            .query_async::<()>(&mut conn)
            .await?;

        redis::cmd("XDEL")
            .arg(&self.config.stream_name)
            .arg(message_id)
            .query_async::<()>(&mut conn)
            .await?;

        debug!("Acknowledged job: {}", message_id);
        Ok(())
    }

    /// Clear the dedup key so the media item can be re-ingested later.
    pub async fn clear_dedup(&self, media_id: &MediaId) -> QueueResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(dedup_key(media_id)).await?;
        Ok(())
    }

    /// Get queue length.
    pub async fn len(&self) -> QueueResult<u64> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let len: u64 = conn.xlen(&self.config.stream_name).await?;
        Ok(len)
    }

    /// Consume jobs from the queue.
    /// Returns a list of (message_id, job) pairs.
    pub async fn consume(
        &self,
        consumer_name: &str,
        block_ms: u64,
        count: usize,
    ) -> QueueResult<Vec<(String, TranscodeJob)>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let result: redis::streams::StreamReadReply = redis::cmd("XREADGROUP")
            .arg("GROUP")
            .arg(&self.config.consumer_group)
            .arg(consumer_name)
            .arg("COUNT")
            .arg(count)
            .arg("BLOCK")
            .arg(block_ms)
            .arg("STREAMS")
            .arg(&self.config.stream_name)
            .arg(">") // Only new messages
            .query_async(&mut conn)
            .await?;

        let mut jobs = Vec::new();

        for stream_key in result.keys {
            for entry in stream_key.ids {
                let message_id = entry.id.clone();

                if let Some(redis::Value::BulkString(payload)) = entry.map.get("job") {
                    let payload_str = String::from_utf8_lossy(payload);
                    match serde_json::from_str::<TranscodeJob>(&payload_str) {
                        Ok(job) => {
                            debug!("Consumed job {} from stream", job.job_id);
                            jobs.push((message_id, job));
                        }
                        Err(e) => {
                            // a payload that cannot parse can never succeed
                            warn!("Failed to parse job payload: {}", e);
                            self.ack(&message_id).await.ok();
                        }
                    }
                }
            }
        }

        Ok(jobs)
    }

    /// Claim pending jobs that have been idle for too long.
    /// This handles jobs from crashed workers.
    pub async fn claim_pending(
        &self,
        consumer_name: &str,
        min_idle_ms: u64,
        count: usize,
    ) -> QueueResult<Vec<(String, TranscodeJob)>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;

        let pending: redis::streams::StreamPendingReply = redis::cmd("XPENDING")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .query_async(&mut conn)
            .await?;

        if pending.count() == 0 {
            return Ok(Vec::new());
        }

        let result: redis::streams::StreamClaimReply = redis::cmd("XCLAIM")
            .arg(&self.config.stream_name)
            .arg(&self.config.consumer_group)
            .arg(consumer_name)
            .arg(min_idle_ms)
            .arg("0-0") // claim messages with this ID or later
            .arg("COUNT")
            .arg(count)
            .query_async(&mut conn)
            .await?;

        let mut jobs = Vec::new();

        for entry in result.ids {
            let message_id = entry.id.clone();

            if let Some(redis::Value::BulkString(payload)) = entry.map.get("job") {
                let payload_str = String::from_utf8_lossy(&payload);
                match serde_json::from_str::<TranscodeJob>(&payload_str) {
                    Ok(mut job) => {
                        // a claimed message was already delivered once
                        job.delivery_attempt += 1;
                        info!(
                            "Claimed pending job {} (attempt {})",
                            job.job_id, job.delivery_attempt
                        );
                        jobs.push((message_id, job));
                    }
                    Err(e) => {
                        warn!("Failed to parse claimed job payload: {}", e);
                        self.ack(&message_id).await.ok();
                    }
                }
            }
        }

        Ok(jobs)
    }
}

fn dedup_key(media_id: &MediaId) -> String {
    format!("vodforge:dedup:{}", media_id)
}
