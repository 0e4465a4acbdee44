//! Outgoing webhook subscriptions.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use labelstack_core::types::{DbId, Timestamp};
use labelstack_core::webhook_action::WebhookAction;

/// A row from the `webhooks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Webhook {
    pub id: DbId,
    pub organization_id: DbId,
    /// `None` for organization-wide webhooks.
    pub project_id: Option<DbId>,
    pub url: String,
    #[serde(skip_serializing)]
    pub secret: Option<String>,
    pub send_payload: bool,
    pub send_for_all_actions: bool,
    /// Wire names of the subscribed actions; ignored when
    /// `send_for_all_actions` is set.
    pub actions: Vec<String>,
    /// Extra request headers, `{"Name": "value"}`.
    pub headers: serde_json::Value,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Webhook {
    pub fn subscribes_to(&self, action: WebhookAction) -> bool {
        self.send_for_all_actions || self.actions.iter().any(|a| a == action.as_str())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct CreateWebhook {
    pub organization_id: DbId,
    pub project_id: Option<DbId>,
    pub url: String,
    pub secret: Option<String>,
    pub send_payload: Option<bool>,
    pub send_for_all_actions: Option<bool>,
    pub actions: Option<Vec<String>>,
    pub headers: Option<serde_json::Value>,
}
