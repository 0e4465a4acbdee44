//! Post-creation hook that announces new annotations on the event bus.

use std::sync::Arc;

use async_trait::async_trait;
use labelstack_core::annotation::{
    Actor, AnnotationOrigin, AnnotationPostProcessor, CreatedAnnotation,
};
use labelstack_core::project::ProjectRef;
use labelstack_core::types::BoxError;

use crate::bus::{EventBus, PlatformEvent, EVENT_ANNOTATION_CREATED};

pub struct EventBusPostProcessor {
    bus: Arc<EventBus>,
}

impl EventBusPostProcessor {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self { bus }
    }
}

#[async_trait]
impl AnnotationPostProcessor for EventBusPostProcessor {
    async fn post_process(
        &self,
        project: &ProjectRef,
        actor: &Actor,
        annotations: &[CreatedAnnotation],
        origin: AnnotationOrigin,
    ) -> Result<(), BoxError> {
        for annotation in annotations {
            self.bus.publish(
                PlatformEvent::new(EVENT_ANNOTATION_CREATED)
                    .with_source("annotation", annotation.id)
                    .with_project(project.id)
                    .with_actor(actor.user_id)
                    .with_payload(serde_json::json!({
                        "task_id": annotation.task_id,
                        "parent_prediction_id": annotation.parent_prediction_id,
                        "origin": origin,
                    })),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publishes_one_event_per_annotation() {
        let bus = Arc::new(EventBus::default());
        let mut rx = bus.subscribe();
        let processor = EventBusPostProcessor::new(bus.clone());
        let actor = Actor {
            user_id: 7,
            organization_id: 1,
        };
        let now = chrono::Utc::now();
        let annotation = |id| CreatedAnnotation {
            id,
            task_id: 2,
            result: serde_json::json!([]),
            completed_by: 7,
            parent_prediction_id: Some(id + 100),
            lead_time: 0.0,
            was_cancelled: false,
            ground_truth: false,
            origin: AnnotationOrigin::Prediction,
            created_at: now,
            updated_at: now,
        };

        let project = ProjectRef {
            id: 3,
            organization_id: 1,
        };

        processor
            .post_process(
                &project,
                &actor,
                &[annotation(1), annotation(2)],
                AnnotationOrigin::Prediction,
            )
            .await
            .unwrap();

        let first = rx.recv().await.unwrap();
        let second = rx.recv().await.unwrap();
        assert_eq!(first.source_entity_id, Some(1));
        assert_eq!(second.source_entity_id, Some(2));
        assert_eq!(first.actor_user_id, Some(7));
        assert_eq!(first.project_id, Some(3));
        assert_eq!(second.project_id, Some(3));
        assert_eq!(first.payload["origin"], "prediction");
    }
}
