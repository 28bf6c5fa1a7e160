//! Ephemeral transcode progress cache.
//!
//! One integer entry per media item, present only while that item is
//! transcoding. Last write wins, no ordering guarantee, and the whole
//! store may vanish at any time; the serving tier degrades to 0 when it
//! does.

use std::collections::HashMap;

use async_trait::async_trait;
use redis::AsyncCommands;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use vodforge_models::MediaId;

use crate::error::CacheResult;

/// Cache key for a media item's progress entry.
pub fn progress_key(media_id: &MediaId) -> String {
    format!("progress:{}", media_id)
}

/// Best-effort percent store.
#[async_trait]
pub trait ProgressCache: Send + Sync {
    /// Record the last known percent. Values above 100 are clamped.
    async fn set(&self, media_id: &MediaId, percent: u8) -> CacheResult<()>;

    /// Last known percent, or `None` if no entry exists.
    async fn get(&self, media_id: &MediaId) -> CacheResult<Option<u8>>;

    /// Remove the entry. Called unconditionally on any terminal outcome.
    async fn delete(&self, media_id: &MediaId) -> CacheResult<()>;
}

/// Redis-backed progress cache.
///
/// Values are stored as integer strings so out-of-process transcoders can
/// write the same keys directly.
pub struct RedisProgressCache {
    client: redis::Client,
}

impl RedisProgressCache {
    pub fn new(redis_url: &str) -> CacheResult<Self> {
        let client = redis::Client::open(redis_url)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ProgressCache for RedisProgressCache {
    async fn set(&self, media_id: &MediaId, percent: u8) -> CacheResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let percent = percent.min(100);
        conn.set::<_, _, ()>(progress_key(media_id), percent.to_string())
            .await?;
        debug!(media_id = %media_id, percent, "progress updated");
        Ok(())
    }

    async fn get(&self, media_id: &MediaId) -> CacheResult<Option<u8>> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        let value: Option<String> = conn.get(progress_key(media_id)).await?;

        Ok(value.and_then(|raw| match raw.trim().parse::<u32>() {
            Ok(parsed) => Some(parsed.min(100) as u8),
            Err(_) => {
                // treat garbage like a missing entry; only the terminal
                // outcome is authoritative
                warn!(media_id = %media_id, raw, "unparsable progress entry ignored");
                None
            }
        }))
    }

    async fn delete(&self, media_id: &MediaId) -> CacheResult<()> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(progress_key(media_id)).await?;
        Ok(())
    }
}

/// In-process progress cache for tests and single-process deployments.
#[derive(Default)]
pub struct MemoryProgressCache {
    entries: RwLock<HashMap<String, u8>>,
}

impl MemoryProgressCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProgressCache for MemoryProgressCache {
    async fn set(&self, media_id: &MediaId, percent: u8) -> CacheResult<()> {
        self.entries
            .write()
            .await
            .insert(progress_key(media_id), percent.min(100));
        Ok(())
    }

    async fn get(&self, media_id: &MediaId) -> CacheResult<Option<u8>> {
        Ok(self.entries.read().await.get(&progress_key(media_id)).copied())
    }

    async fn delete(&self, media_id: &MediaId) -> CacheResult<()> {
        self.entries.write().await.remove(&progress_key(media_id));
        Ok(())
    }
}
