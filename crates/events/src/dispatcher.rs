//! Fan-out of annotation changes to the project's webhook subscriptions.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::join_all;
use sqlx::PgPool;
use labelstack_core::annotation::CreatedAnnotation;
use labelstack_core::types::{BoxError, DbId};
use labelstack_core::webhook_action::{WebhookAction, WebhookEmitter};
use labelstack_db::models::webhook::Webhook;
use labelstack_db::repositories::{ProjectRepo, WebhookRepo};

use crate::delivery::webhook::{WebhookDelivery, WebhookRequest};

/// Some endpoints still failed after their retries.
#[derive(Debug, thiserror::Error)]
#[error("{failed} of {attempted} webhook deliveries failed for {action}")]
pub struct EmissionError {
    pub action: WebhookAction,
    pub failed: usize,
    pub attempted: usize,
}

/// Delivers annotation webhooks to every active subscription of the
/// organization that covers the project and the action.
///
/// All endpoints are attempted concurrently; a failing endpoint does not
/// stop the others, but any failure makes the emission an error.
pub struct WebhookDispatcher {
    pool: PgPool,
    delivery: Arc<WebhookDelivery>,
}

impl WebhookDispatcher {
    pub fn new(pool: PgPool, delivery: Arc<WebhookDelivery>) -> Self {
        Self { pool, delivery }
    }
}

/// Body sent to a subscription. Without `send_payload` only the action
/// name goes out.
pub fn build_payload(
    webhook: &Webhook,
    action: WebhookAction,
    project: &serde_json::Value,
    annotations: &[CreatedAnnotation],
) -> Result<serde_json::Value, serde_json::Error> {
    let mut body = serde_json::Map::new();
    body.insert("action".into(), action.as_str().into());
    if webhook.send_payload {
        body.insert("project".into(), project.clone());
        body.insert(action.payload_key().into(), serde_json::to_value(annotations)?);
    }
    Ok(serde_json::Value::Object(body))
}

/// Custom headers stored on the subscription; non-string values are skipped.
fn configured_headers(webhook: &Webhook) -> Vec<(String, String)> {
    webhook
        .headers
        .as_object()
        .map(|headers| {
            headers
                .iter()
                .filter_map(|(name, value)| value.as_str().map(|v| (name.clone(), v.to_string())))
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl WebhookEmitter for WebhookDispatcher {
    async fn emit_annotations(
        &self,
        organization_id: DbId,
        project_id: DbId,
        action: WebhookAction,
        annotations: &[CreatedAnnotation],
    ) -> Result<(), BoxError> {
        let webhooks: Vec<Webhook> =
            WebhookRepo::list_active_for_project(&self.pool, organization_id, project_id)
                .await?
                .into_iter()
                .filter(|w| w.subscribes_to(action))
                .collect();
        if webhooks.is_empty() {
            return Ok(());
        }

        let project = match ProjectRepo::find_by_id(&self.pool, project_id).await? {
            Some(project) => serde_json::to_value(project)?,
            None => serde_json::Value::Null,
        };

        let mut requests = Vec::with_capacity(webhooks.len());
        for webhook in &webhooks {
            requests.push(WebhookRequest {
                url: webhook.url.clone(),
                body: build_payload(webhook, action, &project, annotations)?,
                headers: configured_headers(webhook),
                secret: webhook.secret.clone(),
            });
        }

        let results = join_all(requests.iter().map(|r| self.delivery.deliver(r))).await;
        let failed = results.iter().filter(|r| r.is_err()).count();

        tracing::info!(
            project_id,
            action = %action,
            endpoints = webhooks.len(),
            failed,
            "Emitted webhooks"
        );

        if failed > 0 {
            return Err(EmissionError {
                action,
                failed,
                attempted: webhooks.len(),
            }
            .into());
        }
        Ok(())
    }
}
