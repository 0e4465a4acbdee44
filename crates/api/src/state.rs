use std::sync::Arc;
use std::time::Duration;

use labelstack_core::actions::{ActionCatalog, ActionServices};
use labelstack_core::annotation::DefaultAnnotationEnricher;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything is behind `Arc` or a static reference.
#[derive(Clone)]
pub struct AppState {
    pub pool: labelstack_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Centralized event bus for publishing platform events.
    pub event_bus: Arc<labelstack_events::EventBus>,
    /// Collaborators handed to every bulk action.
    pub services: ActionServices,
    pub catalog: &'static ActionCatalog,
}

/// Wire the Postgres-backed collaborators for bulk actions. The job
/// submitter follows `config.job_execution_mode`.
pub fn build_action_services(
    pool: &labelstack_db::DbPool,
    config: &ServerConfig,
    event_bus: Arc<labelstack_events::EventBus>,
) -> Result<ActionServices, labelstack_events::WebhookError> {
    let delivery =
        labelstack_events::WebhookDelivery::new(Duration::from_secs(config.webhook_timeout_secs))?;

    Ok(ActionServices {
        store: Arc::new(labelstack_db::PgConversionStore::new(pool.clone())),
        enricher: Arc::new(DefaultAnnotationEnricher),
        post_processor: Arc::new(labelstack_events::EventBusPostProcessor::new(event_bus)),
        webhooks: Arc::new(labelstack_events::WebhookDispatcher::new(
            pool.clone(),
            Arc::new(delivery),
        )),
        jobs: labelstack_worker::build_job_submitter(config.job_execution_mode, pool.clone()),
    })
}
