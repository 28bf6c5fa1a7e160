//! Job executor.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use vodforge_models::TranscodeJob;
use vodforge_queue::JobQueue;

use crate::config::WorkerConfig;
use crate::error::WorkerResult;
use crate::processor::{run_transcode, WorkerContext};

/// Executor that drains transcode jobs from the queue.
///
/// Pool width is the concurrency bound: each slot holds one blocking
/// transcoder invocation for its full duration. Per-job failures are
/// isolated; nothing a single job does can stop the loop.
pub struct JobExecutor {
    config: WorkerConfig,
    queue: Arc<JobQueue>,
    ctx: Arc<WorkerContext>,
    job_semaphore: Arc<Semaphore>,
    shutdown: tokio::sync::watch::Sender<bool>,
    consumer_name: String,
}

impl JobExecutor {
    /// Create a new job executor.
    pub fn new(config: WorkerConfig, queue: JobQueue, ctx: WorkerContext) -> Self {
        let job_semaphore = Arc::new(Semaphore::new(config.max_concurrent_jobs));
        let (shutdown, _) = tokio::sync::watch::channel(false);
        let consumer_name = format!("worker-{}", Uuid::new_v4());

        Self {
            config,
            queue: Arc::new(queue),
            ctx: Arc::new(ctx),
            job_semaphore,
            shutdown,
            consumer_name,
        }
    }

    /// Start the executor.
    pub async fn run(&self) -> WorkerResult<()> {
        info!(
            "Starting job executor '{}' with {} max concurrent jobs",
            self.consumer_name, self.config.max_concurrent_jobs
        );

        self.queue.init().await?;

        let mut shutdown_rx = self.shutdown.subscribe();

        // Periodically claim jobs abandoned by crashed workers
        let queue_clone = Arc::clone(&self.queue);
        let consumer_name = self.consumer_name.clone();
        let ctx_clone = Arc::clone(&self.ctx);
        let semaphore_clone = Arc::clone(&self.job_semaphore);
        let claim_interval = self.config.claim_interval;
        let claim_min_idle_ms = self.config.claim_min_idle.as_millis() as u64;
        let mut shutdown_rx_claim = self.shutdown.subscribe();

        let claim_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(claim_interval);
            loop {
                tokio::select! {
                    _ = shutdown_rx_claim.changed() => {
                        if *shutdown_rx_claim.borrow() {
                            break;
                        }
                    }
                    _ = interval.tick() => {
                        match queue_clone.claim_pending(&consumer_name, claim_min_idle_ms, 5).await {
                            Ok(jobs) if !jobs.is_empty() => {
                                info!("Claimed {} pending jobs", jobs.len());
                                for (message_id, job) in jobs {
                                    let ctx = Arc::clone(&ctx_clone);
                                    let queue = Arc::clone(&queue_clone);
                                    let permit = semaphore_clone.clone().acquire_owned().await;
                                    let Ok(permit) = permit else { break };

                                    tokio::spawn(async move {
                                        let _permit = permit;
                                        Self::execute_job(ctx, queue, message_id, job).await;
                                    });
                                }
                            }
                            Ok(_) => {}
                            Err(e) => {
                                warn!("Failed to claim pending jobs: {}", e);
                            }
                        }
                    }
                }
            }
        });

        // Main job consumption loop
        loop {
            tokio::select! {
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() {
                        info!("Shutdown signal received, stopping executor");
                        break;
                    }
                }
                result = self.consume_jobs() => {
                    if let Err(e) = result {
                        error!("Error consuming jobs: {}", e);
                        // Back off on error
                        tokio::time::sleep(Duration::from_secs(5)).await;
                    }
                }
            }
        }

        claim_task.abort();

        // Wait for in-flight jobs to complete
        info!("Waiting for in-flight jobs to complete...");
        let _ = tokio::time::timeout(self.config.shutdown_timeout, self.wait_for_jobs()).await;

        info!("Job executor stopped");
        Ok(())
    }

    /// Consume and process jobs from the queue.
    async fn consume_jobs(&self) -> WorkerResult<()> {
        let available = self.job_semaphore.available_permits();
        if available == 0 {
            // All slots busy, wait a bit
            tokio::time::sleep(Duration::from_millis(100)).await;
            return Ok(());
        }

        let jobs = self
            .queue
            .consume(
                &self.consumer_name,
                1000, // Block for 1 second
                available.min(5),
            )
            .await?;

        if jobs.is_empty() {
            return Ok(());
        }

        debug!("Consumed {} jobs from queue", jobs.len());

        for (message_id, job) in jobs {
            let ctx = Arc::clone(&self.ctx);
            let queue = Arc::clone(&self.queue);
            let Ok(permit) = self.job_semaphore.clone().acquire_owned().await else {
                return Ok(());
            };

            tokio::spawn(async move {
                let _permit = permit;
                Self::execute_job(ctx, queue, message_id, job).await;
            });
        }

        Ok(())
    }

    /// Execute a single delivered job.
    ///
    /// Exactly one terminal callback is issued per attempt. The message is
    /// acked either way: failed transcodes are not re-enqueued, and a
    /// callback that could not be delivered is logged rather than retried
    /// (crash-before-ack redelivery plus the idempotent handler cover that
    /// window).
    async fn execute_job(
        ctx: Arc<WorkerContext>,
        queue: Arc<JobQueue>,
        message_id: String,
        job: TranscodeJob,
    ) {
        if job.delivery_attempt > 0 {
            info!(
                job_id = %job.job_id,
                attempt = job.delivery_attempt,
                "processing redelivered job"
            );
        }

        let media_id = job.media_id.clone();
        let outcome = run_transcode(&ctx, &job).await;

        if let Err(e) = ctx.callback.complete(&media_id, outcome).await {
            error!(media_id = %media_id, error = %e, "terminal callback not delivered");
        }

        if let Err(e) = queue.ack(&message_id).await {
            error!(media_id = %media_id, error = %e, "failed to ack job");
        }
        if let Err(e) = queue.clear_dedup(&media_id).await {
            warn!(media_id = %media_id, error = %e, "failed to clear dedup key");
        }
    }

    /// Wait for all in-flight jobs to complete.
    async fn wait_for_jobs(&self) {
        loop {
            let available = self.job_semaphore.available_permits();
            if available == self.config.max_concurrent_jobs {
                break;
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
    }

    /// Signal shutdown.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
    }
}
