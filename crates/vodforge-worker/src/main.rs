//! Transcode worker binary.

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vodforge_queue::JobQueue;
use vodforge_worker::{JobExecutor, WorkerConfig, WorkerContext};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing with colored output for dev, JSON for production
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| v.to_lowercase() == "json")
        .unwrap_or(false);

    let env_filter = EnvFilter::from_default_env()
        .add_directive("vodforge=info".parse().expect("valid directive"));

    if use_json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(env_filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_ansi(true)
                    .with_target(true)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false),
            )
            .with(env_filter)
            .init();
    }

    info!("Starting vodforge-worker");

    // Load configuration
    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    if config.callback_token.is_empty() {
        error!("CALLBACK_TOKEN is not set; callbacks will be rejected by the serving tier");
    }

    // Create queue client
    let queue = match JobQueue::from_env() {
        Ok(q) => q,
        Err(e) => {
            error!("Failed to create job queue: {}", e);
            std::process::exit(1);
        }
    };

    // Create processing context
    let ctx = match WorkerContext::from_config(&config) {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to create worker context: {}", e);
            std::process::exit(1);
        }
    };

    let executor = Arc::new(JobExecutor::new(config, queue, ctx));

    // Signal the executor on ctrl-c so in-flight jobs drain
    let shutdown_executor = Arc::clone(&executor);
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.ok();
        info!("Received shutdown signal");
        shutdown_executor.shutdown();
    });

    if let Err(e) = executor.run().await {
        error!("Executor error: {}", e);
        std::process::exit(1);
    }

    info!("Worker shutdown complete");
}
