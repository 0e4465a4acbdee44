//! Repository for the `project_summaries` table.

use sqlx::PgPool;
use labelstack_core::summary::SummaryDelta;
use labelstack_core::types::DbId;

use crate::models::project::ProjectSummary;

const COLUMNS: &str = "project_id, created_annotations, created_labels, updated_at";

pub struct SummaryRepo;

impl SummaryRepo {
    pub async fn find(pool: &PgPool, project_id: DbId) -> Result<Option<ProjectSummary>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM project_summaries WHERE project_id = $1");
        sqlx::query_as::<_, ProjectSummary>(&query)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Add `delta` to the project's summary, creating the row on first use.
    ///
    /// The row is locked for the read-modify-write so concurrent jobs for
    /// the same project serialize.
    pub async fn apply_delta(
        pool: &PgPool,
        project_id: DbId,
        delta: &SummaryDelta,
    ) -> Result<ProjectSummary, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query(
            "INSERT INTO project_summaries (project_id) VALUES ($1)
             ON CONFLICT (project_id) DO NOTHING",
        )
        .bind(project_id)
        .execute(&mut *tx)
        .await?;

        let select = format!(
            "SELECT {COLUMNS} FROM project_summaries WHERE project_id = $1 FOR UPDATE"
        );
        let current = sqlx::query_as::<_, ProjectSummary>(&select)
            .bind(project_id)
            .fetch_one(&mut *tx)
            .await?;

        let (created_annotations, created_labels) =
            delta.apply_to(&current.created_annotations, &current.created_labels);

        let update = format!(
            "UPDATE project_summaries
             SET created_annotations = $2, created_labels = $3, updated_at = NOW()
             WHERE project_id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, ProjectSummary>(&update)
            .bind(project_id)
            .bind(&created_annotations)
            .bind(&created_labels)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(updated)
    }
}
