//! Queued recalculation jobs.

use serde::Serialize;
use sqlx::FromRow;
use labelstack_core::jobs::RecalcJob;
use labelstack_core::types::{DbId, Timestamp};

use super::status::StatusId;

/// A row from the `jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Job {
    pub id: DbId,
    pub job_type: String,
    pub status_id: StatusId,
    pub parameters: serde_json::Value,
    pub error_message: Option<String>,
    pub worker_id: Option<String>,
    pub submitted_at: Timestamp,
    pub claimed_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Job {
    /// Decode the stored type and parameters back into a job definition.
    pub fn recalc_job(&self) -> Result<RecalcJob, serde_json::Error> {
        RecalcJob::from_parts(&self.job_type, self.parameters.clone())
    }
}
