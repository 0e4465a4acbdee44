/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Boxed error returned by collaborator traits so `core` stays free of
/// storage and transport crates.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;
