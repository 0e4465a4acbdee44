//! Repository for the `tasks` table, including the derived-counter
//! refreshes run by recalculation jobs.

use sqlx::{PgConnection, PgPool};
use labelstack_core::types::DbId;

use crate::models::task::{CreateTask, Task};

const COLUMNS: &str = "id, project_id, data, is_labeled, total_annotations, \
     cancelled_annotations, total_predictions, updated_by, created_at, updated_at";

pub struct TaskRepo;

impl TaskRepo {
    pub async fn create(pool: &PgPool, input: &CreateTask) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (project_id, data) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(input.project_id)
            .bind(&input.data)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Stamp `updated_at` / `updated_by` on every listed task.
    pub async fn touch(
        conn: &mut PgConnection,
        task_ids: &[DbId],
        user_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET updated_at = NOW(), updated_by = $2 WHERE id = ANY($1)",
        )
        .bind(task_ids)
        .bind(user_id)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Recount annotations, cancelled annotations and predictions.
    pub async fn update_counters(pool: &PgPool, task_ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks t SET
                total_annotations = (
                    SELECT COUNT(*) FROM annotations a
                    WHERE a.task_id = t.id AND NOT a.was_cancelled),
                cancelled_annotations = (
                    SELECT COUNT(*) FROM annotations a
                    WHERE a.task_id = t.id AND a.was_cancelled),
                total_predictions = (
                    SELECT COUNT(*) FROM predictions p WHERE p.task_id = t.id)
             WHERE t.id = ANY($1)",
        )
        .bind(task_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// A task is labeled once its non-cancelled annotations reach the
    /// project's `maximum_annotations`.
    pub async fn update_is_labeled(pool: &PgPool, task_ids: &[DbId]) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks t SET is_labeled = (
                SELECT COUNT(*) FROM annotations a
                WHERE a.task_id = t.id AND NOT a.was_cancelled
             ) >= p.maximum_annotations
             FROM projects p
             WHERE p.id = t.project_id AND t.id = ANY($1)",
        )
        .bind(task_ids)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
