//! Repository for the `projects` table.

use sqlx::PgPool;
use labelstack_core::types::DbId;

use crate::models::project::{CreateProject, Project};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, organization_id, title, maximum_annotations, model_version, \
     created_by, created_at, updated_at";

pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (organization_id, title, maximum_annotations, model_version, created_by)
             VALUES ($1, $2, COALESCE($3, 1), $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(input.organization_id)
            .bind(&input.title)
            .bind(input.maximum_annotations)
            .bind(&input.model_version)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a project only if it belongs to `organization_id`.
    pub async fn find_in_organization(
        pool: &PgPool,
        id: DbId,
        organization_id: DbId,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM projects WHERE id = $1 AND organization_id = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(organization_id)
            .fetch_optional(pool)
            .await
    }

    /// Distinct model versions among the project's predictions, most
    /// recently used first.
    pub async fn model_versions(pool: &PgPool, id: DbId) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT model_version FROM predictions
             WHERE project_id = $1
             GROUP BY model_version
             ORDER BY MAX(created_at) DESC, model_version",
        )
        .bind(id)
        .fetch_all(pool)
        .await
    }
}
