//! Recalculation jobs: the executor, the inline and queued submitters,
//! and the polling worker that drains the queue.

pub mod config;
pub mod executor;
pub mod submitter;
pub mod worker;

pub use config::{JobExecutionMode, WorkerConfig};
pub use executor::{JobError, RecalcExecutor};
pub use submitter::{build_job_submitter, InlineJobRunner, QueuedJobRunner};
pub use worker::JobWorker;
