//! Repository for the `webhooks` table.

use sqlx::PgPool;
use labelstack_core::types::DbId;

use crate::models::webhook::{CreateWebhook, Webhook};

const COLUMNS: &str = "id, organization_id, project_id, url, secret, send_payload, \
     send_for_all_actions, actions, headers, is_active, created_at, updated_at";

pub struct WebhookRepo;

impl WebhookRepo {
    pub async fn create(pool: &PgPool, input: &CreateWebhook) -> Result<Webhook, sqlx::Error> {
        let query = format!(
            "INSERT INTO webhooks (organization_id, project_id, url, secret, send_payload, \
                 send_for_all_actions, actions, headers)
             VALUES ($1, $2, $3, $4, COALESCE($5, TRUE), COALESCE($6, TRUE), \
                 COALESCE($7, '{{}}'::text[]), COALESCE($8, '{{}}'::jsonb))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Webhook>(&query)
            .bind(input.organization_id)
            .bind(input.project_id)
            .bind(&input.url)
            .bind(&input.secret)
            .bind(input.send_payload)
            .bind(input.send_for_all_actions)
            .bind(&input.actions)
            .bind(&input.headers)
            .fetch_one(pool)
            .await
    }

    /// Active webhooks of the organization that apply to `project_id`:
    /// organization-wide ones and those scoped to that project.
    pub async fn list_active_for_project(
        pool: &PgPool,
        organization_id: DbId,
        project_id: DbId,
    ) -> Result<Vec<Webhook>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM webhooks
             WHERE organization_id = $1
               AND is_active
               AND (project_id IS NULL OR project_id = $2)
             ORDER BY id"
        );
        sqlx::query_as::<_, Webhook>(&query)
            .bind(organization_id)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }
}
