//! Prediction-to-annotation conversion.
//!
//! Turns every not-yet-converted prediction of the selected tasks into an
//! annotation owned by the acting user, then (only when something was
//! created) runs post-processing, emits `ANNOTATIONS_CREATED`, and submits
//! the three recalculation jobs for the touched tasks.
//!
//! Eligibility ("no child annotations yet") is read before the insert.
//! The store is expected to make the insert itself idempotent per
//! prediction so two overlapping conversions cannot both convert the same
//! prediction; see `PgConversionStore` for how Postgres does it.

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::actions::{ActionError, ActionServices};
use crate::annotation::{
    Actor, AnnotationDraft, AnnotationOrigin, CreatedAnnotation, NewAnnotation,
};
use crate::jobs::{JobHandle, RecalcJob};
use crate::model_version::ModelVersionFilter;
use crate::project::ProjectRef;
use crate::selection::TaskSelection;
use crate::types::{BoxError, DbId};
use crate::webhook_action::WebhookAction;

/// A prediction that has no child annotations yet.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvertiblePrediction {
    pub id: DbId,
    pub task_id: DbId,
    pub result: serde_json::Value,
    pub model_version: String,
}

/// Storage operations the converter needs.
#[async_trait]
pub trait ConversionStore: Send + Sync {
    /// Predictions of the selected tasks of `project_id` that have no child
    /// annotations and pass `filter`. Tasks without predictions contribute
    /// nothing.
    async fn find_convertible_predictions(
        &self,
        project_id: DbId,
        selection: &TaskSelection,
        filter: &ModelVersionFilter,
    ) -> Result<Vec<ConvertiblePrediction>, BoxError>;

    /// Insert `annotations` and stamp `updated_at` / `updated_by` on
    /// `task_ids`, all in one transaction. Returns the rows actually
    /// inserted.
    async fn create_annotations(
        &self,
        annotations: Vec<NewAnnotation>,
        task_ids: &[DbId],
        updated_by: DbId,
    ) -> Result<Vec<CreatedAnnotation>, BoxError>;
}

/// What one conversion did.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionOutcome {
    pub annotations: Vec<CreatedAnnotation>,
    /// Handles of the submitted recalculation jobs (empty when nothing was
    /// created).
    pub jobs: Vec<JobHandle>,
}

impl ConversionOutcome {
    pub fn created_count(&self) -> usize {
        self.annotations.len()
    }
}

/// Draft an annotation that copies `prediction.result` verbatim.
pub fn draft_from_prediction(prediction: &ConvertiblePrediction, actor: &Actor) -> AnnotationDraft {
    AnnotationDraft {
        task_id: prediction.task_id,
        result: prediction.result.clone(),
        completed_by: actor.user_id,
        parent_prediction_id: Some(prediction.id),
    }
}

/// Convert the eligible predictions of `selection` into annotations.
pub async fn convert_predictions(
    services: &ActionServices,
    project: &ProjectRef,
    selection: &TaskSelection,
    actor: &Actor,
    filter: &ModelVersionFilter,
) -> Result<ConversionOutcome, ActionError> {
    let origin = AnnotationOrigin::Prediction;

    let predictions = services
        .store
        .find_convertible_predictions(project.id, selection, filter)
        .await
        .map_err(ActionError::Storage)?;

    let task_ids: Vec<DbId> = predictions
        .iter()
        .map(|p| p.task_id)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let annotations: Vec<_> = predictions
        .iter()
        .map(|p| services.enricher.enrich(draft_from_prediction(p, actor), actor, origin))
        .collect();

    tracing::debug!(
        project_id = project.id,
        count = annotations.len(),
        "Predictions will be converted to annotations"
    );

    let created = if annotations.is_empty() {
        Vec::new()
    } else {
        services
            .store
            .create_annotations(annotations, &task_ids, actor.user_id)
            .await
            .map_err(ActionError::Storage)?
    };

    if created.len() < predictions.len() {
        tracing::warn!(
            project_id = project.id,
            selected = predictions.len(),
            created = created.len(),
            "Some predictions were converted concurrently and skipped"
        );
    }

    if created.is_empty() {
        return Ok(ConversionOutcome {
            annotations: created,
            jobs: Vec::new(),
        });
    }

    services
        .post_processor
        .post_process(project, actor, &created, origin)
        .await
        .map_err(ActionError::PostProcess)?;

    // Recalculation runs even when delivery fails; the error is reported
    // once the jobs are in.
    let emitted = services
        .webhooks
        .emit_annotations(
            project.organization_id,
            project.id,
            WebhookAction::AnnotationsCreated,
            &created,
        )
        .await;

    let recalculations = [
        RecalcJob::UpdateTaskCounters {
            task_ids: task_ids.clone(),
        },
        RecalcJob::UpdateIsLabeled {
            task_ids: task_ids.clone(),
        },
        RecalcJob::UpdateProjectSummary {
            project_id: project.id,
            annotation_ids: created.iter().map(|a| a.id).collect(),
        },
    ];

    let mut jobs = Vec::with_capacity(recalculations.len());
    for job in recalculations {
        let handle = services
            .jobs
            .submit(job)
            .await
            .map_err(ActionError::JobSubmission)?;
        jobs.push(handle);
    }

    if let Err(e) = emitted {
        tracing::error!(
            project_id = project.id,
            created = created.len(),
            error = %e,
            "Annotations created but webhook emission failed"
        );
        return Err(ActionError::Webhook(e));
    }

    tracing::info!(
        project_id = project.id,
        user_id = actor.user_id,
        created = created.len(),
        tasks = task_ids.len(),
        "Converted predictions to annotations"
    );

    Ok(ConversionOutcome {
        annotations: created,
        jobs,
    })
}
