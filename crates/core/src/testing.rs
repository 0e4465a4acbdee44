//! In-memory stand-ins for the collaborator traits, shared by unit tests.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::actions::ActionServices;
use crate::annotation::{
    Actor, AnnotationOrigin, AnnotationPostProcessor, CreatedAnnotation,
    DefaultAnnotationEnricher, NewAnnotation,
};
use crate::conversion::{ConversionStore, ConvertiblePrediction};
use crate::jobs::{JobHandle, JobSubmitter, RecalcJob};
use crate::model_version::ModelVersionFilter;
use crate::project::ProjectRef;
use crate::selection::TaskSelection;
use crate::types::{BoxError, DbId};
use crate::webhook_action::{WebhookAction, WebhookEmitter};

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct StoreState {
    predictions: Vec<ConvertiblePrediction>,
    converted: HashSet<DbId>,
    annotations: Vec<CreatedAnnotation>,
    touched_tasks: Vec<DbId>,
    fail_writes: bool,
    convert_during_next_write: Option<DbId>,
}

/// Single-project store; every task belongs to the fixture project.
#[derive(Default)]
pub struct FakeStore {
    state: Mutex<StoreState>,
}

impl FakeStore {
    pub fn add_prediction(&self, id: DbId, task_id: DbId, version: &str, result: serde_json::Value) {
        self.state.lock().unwrap().predictions.push(ConvertiblePrediction {
            id,
            task_id,
            result,
            model_version: version.to_string(),
        });
    }

    /// Give prediction `id` a child annotation.
    pub fn mark_converted(&self, id: DbId) {
        self.state.lock().unwrap().converted.insert(id);
    }

    pub fn fail_writes(&self) {
        self.state.lock().unwrap().fail_writes = true;
    }

    /// Simulate a concurrent conversion of `id` committing between the
    /// eligibility read and our insert.
    pub fn convert_during_next_write(&self, id: DbId) {
        self.state.lock().unwrap().convert_during_next_write = Some(id);
    }

    pub fn prediction(&self, id: DbId) -> ConvertiblePrediction {
        self.state
            .lock()
            .unwrap()
            .predictions
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .expect("unknown prediction")
    }

    pub fn touched_tasks(&self) -> Vec<DbId> {
        self.state.lock().unwrap().touched_tasks.clone()
    }

    pub fn annotations(&self) -> Vec<CreatedAnnotation> {
        self.state.lock().unwrap().annotations.clone()
    }
}

#[async_trait]
impl ConversionStore for FakeStore {
    async fn find_convertible_predictions(
        &self,
        _project_id: DbId,
        selection: &TaskSelection,
        filter: &ModelVersionFilter,
    ) -> Result<Vec<ConvertiblePrediction>, BoxError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .predictions
            .iter()
            .filter(|p| selection.contains(p.task_id))
            .filter(|p| !state.converted.contains(&p.id))
            .filter(|p| filter.matches(&p.model_version))
            .cloned()
            .collect())
    }

    async fn create_annotations(
        &self,
        annotations: Vec<NewAnnotation>,
        task_ids: &[DbId],
        _updated_by: DbId,
    ) -> Result<Vec<CreatedAnnotation>, BoxError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_writes {
            return Err("connection reset".into());
        }
        if let Some(id) = state.convert_during_next_write.take() {
            state.converted.insert(id);
        }

        let mut created = Vec::new();
        for new in annotations {
            if let Some(parent) = new.parent_prediction_id {
                // Mirrors the unique index on converted predictions.
                if !state.converted.insert(parent) {
                    continue;
                }
            }
            let row = CreatedAnnotation {
                id: 1000 + state.annotations.len() as DbId,
                task_id: new.task_id,
                result: new.result,
                completed_by: new.completed_by,
                parent_prediction_id: new.parent_prediction_id,
                lead_time: new.lead_time,
                was_cancelled: new.was_cancelled,
                ground_truth: new.ground_truth,
                origin: new.origin,
                created_at: new.created_at,
                updated_at: new.updated_at,
            };
            state.annotations.push(row.clone());
            created.push(row);
        }
        state.touched_tasks.extend_from_slice(task_ids);
        Ok(created)
    }
}

// ---------------------------------------------------------------------------
// Side-effect recorders
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeWebhooks {
    emissions: AtomicUsize,
    fail: AtomicBool,
}

impl FakeWebhooks {
    pub fn emissions(&self) -> usize {
        self.emissions.load(Ordering::SeqCst)
    }

    pub fn fail(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl WebhookEmitter for FakeWebhooks {
    async fn emit_annotations(
        &self,
        _organization_id: DbId,
        _project_id: DbId,
        action: WebhookAction,
        annotations: &[CreatedAnnotation],
    ) -> Result<(), BoxError> {
        assert_eq!(action, WebhookAction::AnnotationsCreated);
        assert!(!annotations.is_empty());
        if self.fail.load(Ordering::SeqCst) {
            return Err("endpoint returned 502".into());
        }
        self.emissions.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingJobs {
    submitted: Mutex<Vec<RecalcJob>>,
}

impl RecordingJobs {
    pub fn submitted(&self) -> Vec<RecalcJob> {
        self.submitted.lock().unwrap().clone()
    }
}

#[async_trait]
impl JobSubmitter for RecordingJobs {
    async fn submit(&self, job: RecalcJob) -> Result<JobHandle, BoxError> {
        self.submitted.lock().unwrap().push(job);
        Ok(JobHandle::Completed)
    }
}

#[derive(Default)]
pub struct CountingPostProcessor {
    calls: AtomicUsize,
    last_project: Mutex<Option<DbId>>,
}

impl CountingPostProcessor {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_project(&self) -> Option<DbId> {
        *self.last_project.lock().unwrap()
    }
}

#[async_trait]
impl AnnotationPostProcessor for CountingPostProcessor {
    async fn post_process(
        &self,
        project: &ProjectRef,
        _actor: &Actor,
        _annotations: &[CreatedAnnotation],
        origin: AnnotationOrigin,
    ) -> Result<(), BoxError> {
        assert_eq!(origin, AnnotationOrigin::Prediction);
        *self.last_project.lock().unwrap() = Some(project.id);
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Fixture
// ---------------------------------------------------------------------------

pub struct Fixture {
    pub store: Arc<FakeStore>,
    pub webhooks: Arc<FakeWebhooks>,
    pub jobs: Arc<RecordingJobs>,
    pub post_processor: Arc<CountingPostProcessor>,
    pub services: ActionServices,
    pub project: ProjectRef,
    pub actor: Actor,
}

impl Fixture {
    pub fn new(store: FakeStore) -> Self {
        let store = Arc::new(store);
        let webhooks = Arc::new(FakeWebhooks::default());
        let jobs = Arc::new(RecordingJobs::default());
        let post_processor = Arc::new(CountingPostProcessor::default());

        let services = ActionServices {
            store: store.clone(),
            enricher: Arc::new(DefaultAnnotationEnricher),
            post_processor: post_processor.clone(),
            webhooks: webhooks.clone(),
            jobs: jobs.clone(),
        };

        Self {
            store,
            webhooks,
            jobs,
            post_processor,
            services,
            project: ProjectRef {
                id: 5,
                organization_id: 2,
            },
            actor: Actor {
                user_id: 7,
                organization_id: 2,
            },
        }
    }
}
