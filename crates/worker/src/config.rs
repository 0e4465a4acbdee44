use std::str::FromStr;
use std::time::Duration;

/// Where recalculation jobs run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobExecutionMode {
    /// Before `submit` returns, on the caller's task.
    #[default]
    Sync,
    /// Queued in `jobs` and picked up by a worker.
    Async,
}

impl FromStr for JobExecutionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sync" => Ok(Self::Sync),
            "async" => Ok(Self::Async),
            other => Err(format!(
                "Invalid job execution mode '{other}'. Must be one of: sync, async"
            )),
        }
    }
}

impl JobExecutionMode {
    /// Read `JOB_EXECUTION_MODE` (default `sync`).
    ///
    /// Panics on an unrecognized value so misconfiguration fails at startup.
    pub fn from_env() -> Self {
        match std::env::var("JOB_EXECUTION_MODE") {
            Ok(value) => value
                .parse()
                .unwrap_or_else(|e: String| panic!("JOB_EXECUTION_MODE: {e}")),
            Err(_) => Self::default(),
        }
    }
}

/// Worker process configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    pub database_url: String,
    /// Delay between polls when the queue is empty.
    pub poll_interval: Duration,
    /// Recorded on claimed rows.
    pub worker_id: String,
}

impl WorkerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                | Default            |
    /// |------------------------|--------------------|
    /// | `DATABASE_URL`         | required           |
    /// | `JOB_POLL_INTERVAL_MS` | `1000`             |
    /// | `WORKER_ID`            | `worker-<uuid v4>` |
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let poll_interval_ms: u64 = std::env::var("JOB_POLL_INTERVAL_MS")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("JOB_POLL_INTERVAL_MS must be a valid u64");

        let worker_id = std::env::var("WORKER_ID")
            .unwrap_or_else(|_| format!("worker-{}", uuid::Uuid::new_v4()));

        Self {
            database_url,
            poll_interval: Duration::from_millis(poll_interval_ms),
            worker_id,
        }
    }
}
