//! Bulk actions offered by the data manager.
//!
//! Each action is an [`ActionHandler`] paired with a static
//! [`ActionDescriptor`] (title, menu order, required permission, optional
//! confirmation dialog). Handlers are registered into an
//! [`ActionCatalog`](catalog::ActionCatalog) once at startup; the catalog
//! gates every call on the descriptor's permission before dispatching.

pub mod catalog;
pub mod predictions_to_annotations;

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use crate::annotation::{Actor, AnnotationEnricher, AnnotationPostProcessor};
use crate::conversion::ConversionStore;
use crate::error::CoreError;
use crate::forms::{FormSpec, ProjectFormContext};
use crate::jobs::JobSubmitter;
use crate::permissions::Permission;
use crate::project::ProjectRef;
use crate::selection::TaskSelection;
use crate::types::BoxError;
use crate::webhook_action::WebhookEmitter;

pub use catalog::{ActionCatalog, ActionSummary};

// ---------------------------------------------------------------------------
// Descriptor
// ---------------------------------------------------------------------------

/// Builds the dialog form from the project's current state.
pub type FormBuilder = fn(&ProjectFormContext) -> Vec<FormSpec>;

/// Static description of a bulk action.
#[derive(Debug, Clone)]
pub struct ActionDescriptor {
    /// Stable slug used in URLs.
    pub id: &'static str,
    pub title: &'static str,
    /// Menu position; lower sorts first.
    pub order: i32,
    /// Capability the caller must hold on the project.
    pub permission: Permission,
    pub experimental: bool,
    /// Hidden actions can be performed but are not listed.
    pub hidden: bool,
    pub dialog: Option<DialogSpec>,
}

#[derive(Debug, Clone)]
pub struct DialogSpec {
    pub text: &'static str,
    pub kind: DialogKind,
    pub form: Option<FormBuilder>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogKind {
    Confirm,
}

// ---------------------------------------------------------------------------
// Invocation
// ---------------------------------------------------------------------------

/// Collaborators an action may call. Built once per process.
#[derive(Clone)]
pub struct ActionServices {
    pub store: Arc<dyn ConversionStore>,
    pub enricher: Arc<dyn AnnotationEnricher>,
    pub post_processor: Arc<dyn AnnotationPostProcessor>,
    pub webhooks: Arc<dyn WebhookEmitter>,
    pub jobs: Arc<dyn JobSubmitter>,
}

/// One invocation of an action.
#[derive(Debug, Clone)]
pub struct ActionRequest {
    pub project: ProjectRef,
    pub selection: TaskSelection,
    pub actor: Actor,
    /// The request body; each action reads its own parameters from it.
    pub params: serde_json::Value,
}

/// Result returned to the data manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResponse {
    pub response_code: u16,
    pub detail: String,
}

impl ActionResponse {
    pub fn ok(detail: impl Into<String>) -> Self {
        Self {
            response_code: 200,
            detail: detail.into(),
        }
    }
}

/// Why an action failed. Collaborator failures are passed through untouched.
#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Storage error: {0}")]
    Storage(#[source] BoxError),

    #[error("Annotation post-processing failed: {0}")]
    PostProcess(#[source] BoxError),

    #[error("Webhook emission failed: {0}")]
    Webhook(#[source] BoxError),

    #[error("Job submission failed: {0}")]
    JobSubmission(#[source] BoxError),
}

#[async_trait]
pub trait ActionHandler: Send + Sync {
    fn descriptor(&self) -> &ActionDescriptor;

    async fn perform(
        &self,
        services: &ActionServices,
        request: ActionRequest,
    ) -> Result<ActionResponse, ActionError>;
}
