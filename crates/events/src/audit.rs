//! Structured audit log of platform events.
//!
//! [`EventLog`] subscribes to the [`EventBus`](crate::bus::EventBus) and
//! writes every event as a `tracing` record. It exits when the bus is
//! dropped.

use tokio::sync::broadcast;

use crate::bus::PlatformEvent;

pub struct EventLog;

impl EventLog {
    /// Log events until the channel closes. Returns how many were logged.
    pub async fn run(mut receiver: broadcast::Receiver<PlatformEvent>) -> u64 {
        let mut logged = 0;
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    tracing::info!(
                        target: "labelstack_events::audit",
                        event_type = %event.event_type,
                        entity_type = event.source_entity_type.as_deref(),
                        entity_id = event.source_entity_id,
                        actor_user_id = event.actor_user_id,
                        payload = %event.payload,
                        "Platform event"
                    );
                    logged += 1;
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event log lagged, some events were not logged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!(logged, "Event bus closed, event log shutting down");
                    return logged;
                }
            }
        }
    }
}
