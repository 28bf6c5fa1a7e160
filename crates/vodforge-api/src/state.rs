//! Application state.

use std::sync::Arc;

use vodforge_queue::{JobQueue, ProgressCache, QueueConfig, RedisProgressCache};
use vodforge_store::{MediaStore, SqliteMediaStore};

use crate::config::ApiConfig;

/// Shared application state.
///
/// Clients are constructed once at process start and injected; handlers
/// never reach for global connections.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<dyn MediaStore>,
    pub cache: Arc<dyn ProgressCache>,
    pub queue: Arc<JobQueue>,
}

impl AppState {
    /// Create new application state.
    pub async fn new(config: ApiConfig) -> Result<Self, Box<dyn std::error::Error>> {
        let store = SqliteMediaStore::connect(&config.database_url).await?;
        store.init().await?;

        let cache = RedisProgressCache::new(&config.redis_url)?;

        let mut queue_config = QueueConfig::from_env();
        queue_config.redis_url = config.redis_url.clone();
        let queue = JobQueue::new(queue_config)?;

        Ok(Self {
            config,
            store: Arc::new(store),
            cache: Arc::new(cache),
            queue: Arc::new(queue),
        })
    }

    /// Assemble state from pre-built collaborators.
    pub fn with_parts(
        config: ApiConfig,
        store: Arc<dyn MediaStore>,
        cache: Arc<dyn ProgressCache>,
        queue: Arc<JobQueue>,
    ) -> Self {
        Self {
            config,
            store,
            cache,
            queue,
        }
    }
}
