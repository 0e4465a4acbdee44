//! Repository for the `annotations` table.

use sqlx::{PgConnection, PgPool};
use labelstack_core::annotation::NewAnnotation;
use labelstack_core::types::{DbId, Timestamp};

use crate::models::annotation::Annotation;

const COLUMNS: &str = "id, task_id, project_id, result, completed_by, parent_prediction_id, \
     lead_time, was_cancelled, ground_truth, origin, created_at, updated_at";

pub struct AnnotationRepo;

impl AnnotationRepo {
    /// Insert many annotations in one statement; `project_id` is taken from
    /// each row's task.
    ///
    /// A row converting a prediction that already has a converted child is
    /// silently skipped (`uq_annotations_converted_prediction`), so the
    /// result may be shorter than `rows`. Returned rows are ordered by id.
    pub async fn bulk_create(
        conn: &mut PgConnection,
        rows: &[NewAnnotation],
    ) -> Result<Vec<Annotation>, sqlx::Error> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let mut task_ids: Vec<DbId> = Vec::with_capacity(rows.len());
        let mut results: Vec<serde_json::Value> = Vec::with_capacity(rows.len());
        let mut completed_by: Vec<DbId> = Vec::with_capacity(rows.len());
        let mut parents: Vec<Option<DbId>> = Vec::with_capacity(rows.len());
        let mut lead_times: Vec<f64> = Vec::with_capacity(rows.len());
        let mut cancelled: Vec<bool> = Vec::with_capacity(rows.len());
        let mut ground_truth: Vec<bool> = Vec::with_capacity(rows.len());
        let mut origins: Vec<&str> = Vec::with_capacity(rows.len());
        let mut created_at: Vec<Timestamp> = Vec::with_capacity(rows.len());
        let mut updated_at: Vec<Timestamp> = Vec::with_capacity(rows.len());

        for row in rows {
            task_ids.push(row.task_id);
            results.push(row.result.clone());
            completed_by.push(row.completed_by);
            parents.push(row.parent_prediction_id);
            lead_times.push(row.lead_time);
            cancelled.push(row.was_cancelled);
            ground_truth.push(row.ground_truth);
            origins.push(row.origin.as_str());
            created_at.push(row.created_at);
            updated_at.push(row.updated_at);
        }

        let query = format!(
            "INSERT INTO annotations (task_id, project_id, result, completed_by, \
                 parent_prediction_id, lead_time, was_cancelled, ground_truth, origin, \
                 created_at, updated_at) \
             SELECT u.task_id, \
                 (SELECT t.project_id FROM tasks t WHERE t.id = u.task_id), \
                 u.result, u.completed_by, \
                 u.parent_prediction_id, u.lead_time, u.was_cancelled, u.ground_truth, u.origin, \
                 u.created_at, u.updated_at \
             FROM UNNEST($1::bigint[], $2::jsonb[], $3::bigint[], $4::bigint[], \
                         $5::float8[], $6::bool[], $7::bool[], $8::text[], \
                         $9::timestamptz[], $10::timestamptz[]) \
                  AS u(task_id, result, completed_by, parent_prediction_id, \
                       lead_time, was_cancelled, ground_truth, origin, \
                       created_at, updated_at) \
             ON CONFLICT (parent_prediction_id) WHERE origin = 'prediction' DO NOTHING \
             RETURNING {COLUMNS}"
        );

        let mut created = sqlx::query_as::<_, Annotation>(&query)
            .bind(&task_ids)
            .bind(&results)
            .bind(&completed_by)
            .bind(&parents)
            .bind(&lead_times)
            .bind(&cancelled)
            .bind(&ground_truth)
            .bind(&origins)
            .bind(&created_at)
            .bind(&updated_at)
            .fetch_all(conn)
            .await?;
        created.sort_by_key(|a| a.id);
        Ok(created)
    }

    pub async fn list_by_task(pool: &PgPool, task_id: DbId) -> Result<Vec<Annotation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM annotations WHERE task_id = $1 ORDER BY id");
        sqlx::query_as::<_, Annotation>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }

    /// `result` of each listed annotation that still exists.
    pub async fn results_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<serde_json::Value>, sqlx::Error> {
        sqlx::query_scalar::<_, serde_json::Value>(
            "SELECT result FROM annotations WHERE id = ANY($1) ORDER BY id",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }
}
