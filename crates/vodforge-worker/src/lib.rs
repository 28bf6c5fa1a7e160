//! Transcode worker pool.
//!
//! Drains jobs from the queue, runs the external transcoder, and reports
//! exactly one terminal outcome per delivered job through the completion
//! callback.

pub mod callback;
pub mod config;
pub mod error;
pub mod executor;
pub mod processor;

pub use callback::CallbackClient;
pub use config::WorkerConfig;
pub use error::{WorkerError, WorkerResult};
pub use executor::JobExecutor;
pub use processor::{run_transcode, WorkerContext};
