//! Repository for the `jobs` table.
//!
//! Uses `JobStatus` from `models::status` for every status transition.

use sqlx::PgPool;
use labelstack_core::jobs::RecalcJob;
use labelstack_core::types::DbId;

use crate::models::job::Job;
use crate::models::status::JobStatus;

const COLUMNS: &str = "id, job_type, status_id, parameters, error_message, worker_id, \
     submitted_at, claimed_at, completed_at, created_at, updated_at";

pub struct JobRepo;

impl JobRepo {
    /// Queue a pending job.
    pub async fn submit(pool: &PgPool, job: &RecalcJob) -> Result<Job, sqlx::Error> {
        let query = format!(
            "INSERT INTO jobs (job_type, status_id, parameters) \
             VALUES ($1, $2, $3) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(job.job_type())
            .bind(JobStatus::Pending.id())
            .bind(job.parameters())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Job>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM jobs WHERE id = $1");
        sqlx::query_as::<_, Job>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Atomically claim the oldest pending job for `worker_id`.
    ///
    /// Uses `SELECT FOR UPDATE SKIP LOCKED` so concurrent workers never
    /// claim the same row.
    pub async fn claim_next(pool: &PgPool, worker_id: &str) -> Result<Option<Job>, sqlx::Error> {
        let query = format!(
            "UPDATE jobs \
             SET worker_id = $1, claimed_at = NOW(), status_id = $2, updated_at = NOW() \
             WHERE id = ( \
                 SELECT id FROM jobs \
                 WHERE status_id = $3 \
                 ORDER BY submitted_at ASC, id ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Job>(&query)
            .bind(worker_id)
            .bind(JobStatus::Running.id())
            .bind(JobStatus::Pending.id())
            .fetch_optional(pool)
            .await
    }

    pub async fn complete(pool: &PgPool, job_id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE jobs SET status_id = $2, completed_at = NOW(), updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(JobStatus::Completed.id())
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark a job failed. Failed jobs are not retried automatically.
    pub async fn fail(pool: &PgPool, job_id: DbId, error: &str) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE jobs SET status_id = $2, error_message = $3, completed_at = NOW(), \
                 updated_at = NOW() \
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(JobStatus::Failed.id())
        .bind(error)
        .execute(pool)
        .await?;
        Ok(())
    }
}
