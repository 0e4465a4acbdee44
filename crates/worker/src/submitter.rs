//! The two `JobSubmitter` implementations and the startup-time choice
//! between them.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use labelstack_core::jobs::{JobHandle, JobSubmitter, RecalcJob};
use labelstack_core::types::BoxError;
use labelstack_db::repositories::JobRepo;

use crate::config::JobExecutionMode;
use crate::executor::RecalcExecutor;

/// Runs each job to completion before returning.
pub struct InlineJobRunner {
    executor: RecalcExecutor,
}

impl InlineJobRunner {
    pub fn new(executor: RecalcExecutor) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl JobSubmitter for InlineJobRunner {
    async fn submit(&self, job: RecalcJob) -> Result<JobHandle, BoxError> {
        self.executor.execute(&job).await?;
        Ok(JobHandle::Completed)
    }
}

/// Queues each job for a [`JobWorker`](crate::JobWorker).
pub struct QueuedJobRunner {
    pool: PgPool,
}

impl QueuedJobRunner {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobSubmitter for QueuedJobRunner {
    async fn submit(&self, job: RecalcJob) -> Result<JobHandle, BoxError> {
        let row = JobRepo::submit(&self.pool, &job).await?;
        tracing::debug!(job_id = row.id, job_type = %row.job_type, "Job queued");
        Ok(JobHandle::Queued { job_id: row.id })
    }
}

pub fn build_job_submitter(mode: JobExecutionMode, pool: PgPool) -> Arc<dyn JobSubmitter> {
    match mode {
        JobExecutionMode::Sync => Arc::new(InlineJobRunner::new(RecalcExecutor::new(pool))),
        JobExecutionMode::Async => Arc::new(QueuedJobRunner::new(pool)),
    }
}
