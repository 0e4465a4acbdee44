//! Webhook action names and the emission seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::annotation::CreatedAnnotation;
use crate::types::{BoxError, DbId};

/// Events this service emits to external subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WebhookAction {
    AnnotationsCreated,
}

impl WebhookAction {
    /// Return the wire-format string for this variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AnnotationsCreated => "ANNOTATIONS_CREATED",
        }
    }

    /// Payload key the affected instances are sent under.
    pub fn payload_key(self) -> &'static str {
        match self {
            Self::AnnotationsCreated => "annotation",
        }
    }
}

impl std::fmt::Display for WebhookAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Notifies external subscribers that annotations changed.
#[async_trait]
pub trait WebhookEmitter: Send + Sync {
    async fn emit_annotations(
        &self,
        organization_id: DbId,
        project_id: DbId,
        action: WebhookAction,
        annotations: &[CreatedAnnotation],
    ) -> Result<(), BoxError>;
}
