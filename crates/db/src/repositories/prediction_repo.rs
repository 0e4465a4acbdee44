//! Repository for the `predictions` table.

use sqlx::PgPool;
use labelstack_core::model_version::ModelVersionFilter;
use labelstack_core::selection::TaskSelection;
use labelstack_core::types::DbId;

use crate::models::prediction::{ConvertibleRow, CreatePrediction, Prediction};

const COLUMNS: &str =
    "id, task_id, project_id, result, score, model_version, created_at, updated_at";

pub struct PredictionRepo;

impl PredictionRepo {
    /// Insert a prediction; `project_id` is taken from the task.
    pub async fn create(pool: &PgPool, input: &CreatePrediction) -> Result<Prediction, sqlx::Error> {
        let query = format!(
            "INSERT INTO predictions (task_id, project_id, result, score, model_version)
             SELECT t.id, t.project_id, $2, $3, COALESCE($4, '')
             FROM tasks t WHERE t.id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prediction>(&query)
            .bind(input.task_id)
            .bind(&input.result)
            .bind(input.score)
            .bind(&input.model_version)
            .fetch_one(pool)
            .await
    }

    /// Predictions of the selected tasks of `project_id` with no child
    /// annotations, restricted by `filter`, ordered by id.
    pub async fn find_convertible(
        pool: &PgPool,
        project_id: DbId,
        selection: &TaskSelection,
        filter: &ModelVersionFilter,
    ) -> Result<Vec<ConvertibleRow>, sqlx::Error> {
        let (select_all, included, excluded) = selection.to_bind_parts();
        sqlx::query_as::<_, ConvertibleRow>(
            "SELECT p.id, p.task_id, p.result, p.model_version
             FROM predictions p
             JOIN tasks t ON t.id = p.task_id
             WHERE t.project_id = $1
               AND CASE WHEN $2 THEN NOT (t.id = ANY($4)) ELSE t.id = ANY($3) END
               AND ($5::text[] IS NULL OR p.model_version = ANY($5))
               AND NOT EXISTS (
                   SELECT 1 FROM annotations a WHERE a.parent_prediction_id = p.id)
             ORDER BY p.id",
        )
        .bind(project_id)
        .bind(select_all)
        .bind(&included)
        .bind(&excluded)
        .bind(filter.as_bind_values())
        .fetch_all(pool)
        .await
    }
}
