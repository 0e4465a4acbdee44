//! Annotation construction: typed drafts, field enrichment, and the
//! post-creation hook.
//!
//! A caller builds an [`AnnotationDraft`] holding only what it knows (the
//! result, the task, the completing user, the source prediction). An
//! [`AnnotationEnricher`] turns it into a fully-populated [`NewAnnotation`]
//! ready for insertion. After persistence, an [`AnnotationPostProcessor`]
//! sees the stored rows as [`CreatedAnnotation`]s.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::project::ProjectRef;
use crate::types::{BoxError, DbId, Timestamp};

// ---------------------------------------------------------------------------
// Origin
// ---------------------------------------------------------------------------

/// How an annotation came to exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationOrigin {
    Manual,
    Prediction,
    Import,
}

impl AnnotationOrigin {
    /// Return the wire-format string for this variant.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Manual => "manual",
            Self::Prediction => "prediction",
            Self::Import => "import",
        }
    }

    /// Parse from a wire-format string.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "manual" => Ok(Self::Manual),
            "prediction" => Ok(Self::Prediction),
            "import" => Ok(Self::Import),
            _ => Err(CoreError::Validation(format!(
                "Invalid annotation origin: '{s}'. Must be one of: manual, prediction, import"
            ))),
        }
    }
}

impl std::fmt::Display for AnnotationOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Actor
// ---------------------------------------------------------------------------

/// The user performing an operation, with the organization they act in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: DbId,
    pub organization_id: DbId,
}

// ---------------------------------------------------------------------------
// Draft -> NewAnnotation -> CreatedAnnotation
// ---------------------------------------------------------------------------

/// The caller-supplied part of a new annotation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDraft {
    pub task_id: DbId,
    pub result: serde_json::Value,
    pub completed_by: DbId,
    pub parent_prediction_id: Option<DbId>,
}

/// A fully-populated annotation row awaiting insertion.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAnnotation {
    pub task_id: DbId,
    pub result: serde_json::Value,
    pub completed_by: DbId,
    pub parent_prediction_id: Option<DbId>,
    /// Seconds the annotator spent; zero for machine-derived annotations.
    pub lead_time: f64,
    pub was_cancelled: bool,
    pub ground_truth: bool,
    pub origin: AnnotationOrigin,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A persisted annotation as seen by post-processing, webhooks and jobs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatedAnnotation {
    pub id: DbId,
    pub task_id: DbId,
    pub result: serde_json::Value,
    pub completed_by: DbId,
    pub parent_prediction_id: Option<DbId>,
    pub lead_time: f64,
    pub was_cancelled: bool,
    pub ground_truth: bool,
    pub origin: AnnotationOrigin,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Collaborators
// ---------------------------------------------------------------------------

/// Fills the default fields every new annotation must carry.
pub trait AnnotationEnricher: Send + Sync {
    fn enrich(&self, draft: AnnotationDraft, actor: &Actor, origin: AnnotationOrigin)
        -> NewAnnotation;
}

/// Runs after a batch of annotations has been committed.
#[async_trait]
pub trait AnnotationPostProcessor: Send + Sync {
    async fn post_process(
        &self,
        project: &ProjectRef,
        actor: &Actor,
        annotations: &[CreatedAnnotation],
        origin: AnnotationOrigin,
    ) -> Result<(), BoxError>;
}

/// Stamps both timestamps with the current time, zero lead time and no
/// cancellation / ground-truth flags.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultAnnotationEnricher;

impl AnnotationEnricher for DefaultAnnotationEnricher {
    fn enrich(
        &self,
        draft: AnnotationDraft,
        _actor: &Actor,
        origin: AnnotationOrigin,
    ) -> NewAnnotation {
        let now = chrono::Utc::now();
        NewAnnotation {
            task_id: draft.task_id,
            result: draft.result,
            completed_by: draft.completed_by,
            parent_prediction_id: draft.parent_prediction_id,
            lead_time: 0.0,
            was_cancelled: false,
            ground_truth: false,
            origin,
            created_at: now,
            updated_at: now,
        }
    }
}
