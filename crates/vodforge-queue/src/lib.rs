//! Redis Streams job queue and ephemeral progress cache.
//!
//! This crate provides:
//! - Job enqueueing via Redis Streams with per-media deduplication
//! - Worker consumption with consumer groups and crash recovery
//! - The best-effort progress cache keyed `progress:<mediaId>`

pub mod error;
pub mod progress;
pub mod queue;

pub use error::{CacheError, CacheResult, QueueError, QueueResult};
pub use progress::{progress_key, MemoryProgressCache, ProgressCache, RedisProgressCache};
pub use queue::{JobQueue, QueueConfig};
