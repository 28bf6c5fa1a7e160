//! Request handlers.

pub mod health;
pub mod ingest;
pub mod progress;
pub mod transcode;

pub use health::*;
pub use ingest::*;
pub use progress::*;
pub use transcode::*;
