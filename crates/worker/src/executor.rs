//! Runs one recalculation job against the database.

use sqlx::PgPool;
use labelstack_core::jobs::RecalcJob;
use labelstack_core::summary::tally;
use labelstack_db::repositories::{AnnotationRepo, SummaryRepo, TaskRepo};

#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid job parameters: {0}")]
    InvalidJob(#[from] serde_json::Error),
}

#[derive(Clone)]
pub struct RecalcExecutor {
    pool: PgPool,
}

impl RecalcExecutor {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn execute(&self, job: &RecalcJob) -> Result<(), JobError> {
        match job {
            RecalcJob::UpdateTaskCounters { task_ids } => {
                let updated = TaskRepo::update_counters(&self.pool, task_ids).await?;
                tracing::debug!(updated, "Task counters recalculated");
            }
            RecalcJob::UpdateIsLabeled { task_ids } => {
                let updated = TaskRepo::update_is_labeled(&self.pool, task_ids).await?;
                tracing::debug!(updated, "Task is_labeled recalculated");
            }
            RecalcJob::UpdateProjectSummary {
                project_id,
                annotation_ids,
            } => {
                let results = AnnotationRepo::results_by_ids(&self.pool, annotation_ids).await?;
                let delta = tally(&results);
                if delta.is_empty() {
                    tracing::debug!(project_id, "No summary changes");
                } else {
                    SummaryRepo::apply_delta(&self.pool, *project_id, &delta).await?;
                    tracing::debug!(project_id, "Project summary updated");
                }
            }
        }
        Ok(())
    }
}
