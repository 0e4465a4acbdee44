//! Event bus and outbound notification plumbing.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`PlatformEvent`]: the domain event envelope.
//! - [`delivery`]: signed webhook POSTs with retry.
//! - [`WebhookDispatcher`]: fans an annotation change out to every
//!   subscribed webhook of the project.
//! - [`EventBusPostProcessor`]: publishes created annotations on the bus.
//! - [`EventLog`]: background task writing every bus event to the log.

pub mod audit;
pub mod bus;
pub mod delivery;
pub mod dispatcher;
pub mod post_process;

pub use audit::EventLog;
pub use bus::{EventBus, PlatformEvent};
pub use delivery::webhook::{WebhookDelivery, WebhookError, WebhookRequest};
pub use dispatcher::WebhookDispatcher;
pub use post_process::EventBusPostProcessor;
