//! Recalculation jobs and the submission seam used to run them.
//!
//! Whether a submitted job runs before `submit` returns or later on a
//! worker is decided once, when the process picks a [`JobSubmitter`]
//! implementation; callers never branch on it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{BoxError, DbId};

/// Job type name for [`RecalcJob::UpdateTaskCounters`].
pub const JOB_UPDATE_TASK_COUNTERS: &str = "update_task_counters";

/// Job type name for [`RecalcJob::UpdateIsLabeled`].
pub const JOB_UPDATE_IS_LABELED: &str = "update_is_labeled";

/// Job type name for [`RecalcJob::UpdateProjectSummary`].
pub const JOB_UPDATE_PROJECT_SUMMARY: &str = "update_project_summary";

/// Derived-state refresh that follows a batch of annotation writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "job_type", content = "parameters", rename_all = "snake_case")]
pub enum RecalcJob {
    /// Recount annotations, cancelled annotations and predictions per task.
    UpdateTaskCounters { task_ids: Vec<DbId> },
    /// Re-evaluate each task's `is_labeled` flag against the project overlap.
    UpdateIsLabeled { task_ids: Vec<DbId> },
    /// Add the given annotations' results to the project summary.
    UpdateProjectSummary {
        project_id: DbId,
        annotation_ids: Vec<DbId>,
    },
}

impl RecalcJob {
    /// Stable job type name, as stored in `jobs.job_type`.
    pub fn job_type(&self) -> &'static str {
        match self {
            Self::UpdateTaskCounters { .. } => JOB_UPDATE_TASK_COUNTERS,
            Self::UpdateIsLabeled { .. } => JOB_UPDATE_IS_LABELED,
            Self::UpdateProjectSummary { .. } => JOB_UPDATE_PROJECT_SUMMARY,
        }
    }

    /// The job's parameters without the type tag.
    pub fn parameters(&self) -> serde_json::Value {
        serde_json::to_value(self)
            .ok()
            .and_then(|mut v| v.get_mut("parameters").map(serde_json::Value::take))
            .unwrap_or(serde_json::Value::Null)
    }

    /// Rebuild a job from a stored `(job_type, parameters)` pair.
    pub fn from_parts(
        job_type: &str,
        parameters: serde_json::Value,
    ) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::json!({
            "job_type": job_type,
            "parameters": parameters,
        }))
    }
}

/// What `submit` hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobHandle {
    /// The job already ran to completion.
    Completed,
    /// The job was queued; a worker will pick up `jobs.id = job_id`.
    Queued { job_id: DbId },
}

/// Accepts recalculation jobs for execution.
#[async_trait]
pub trait JobSubmitter: Send + Sync {
    async fn submit(&self, job: RecalcJob) -> Result<JobHandle, BoxError>;
}
