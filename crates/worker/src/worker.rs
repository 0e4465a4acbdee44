//! Polling loop that drains the `jobs` queue.

use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use labelstack_db::repositories::JobRepo;

use crate::config::WorkerConfig;
use crate::executor::{JobError, RecalcExecutor};

pub struct JobWorker {
    pool: PgPool,
    executor: RecalcExecutor,
    config: WorkerConfig,
}

impl JobWorker {
    pub fn new(pool: PgPool, config: WorkerConfig) -> Self {
        let executor = RecalcExecutor::new(pool.clone());
        Self {
            pool,
            executor,
            config,
        }
    }

    /// Claim and run at most one job. Returns `false` when the queue is
    /// empty.
    ///
    /// A job that fails is marked failed; only claim / bookkeeping errors
    /// are returned.
    pub async fn run_once(&self) -> Result<bool, JobError> {
        let Some(job) = JobRepo::claim_next(&self.pool, &self.config.worker_id).await? else {
            return Ok(false);
        };

        let outcome = match job.recalc_job() {
            Ok(recalc) => self.executor.execute(&recalc).await,
            Err(e) => Err(e.into()),
        };

        match outcome {
            Ok(()) => {
                JobRepo::complete(&self.pool, job.id).await?;
                tracing::info!(job_id = job.id, job_type = %job.job_type, "Job completed");
            }
            Err(e) => {
                JobRepo::fail(&self.pool, job.id, &e.to_string()).await?;
                tracing::error!(job_id = job.id, job_type = %job.job_type, error = %e, "Job failed");
            }
        }
        Ok(true)
    }

    /// Drain the queue, then poll every `poll_interval` until `cancel`
    /// fires.
    pub async fn run(self, cancel: CancellationToken) {
        tracing::info!(
            worker_id = %self.config.worker_id,
            poll_interval_ms = self.config.poll_interval.as_millis() as u64,
            "Job worker started"
        );

        let mut interval = tokio::time::interval(self.config.poll_interval);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Job worker stopping");
                    break;
                }
                _ = interval.tick() => {
                    loop {
                        match self.run_once().await {
                            Ok(true) => continue,
                            Ok(false) => break,
                            Err(e) => {
                                tracing::error!(error = %e, "Job worker: claim failed");
                                break;
                            }
                        }
                    }
                }
            }
        }
    }
}
