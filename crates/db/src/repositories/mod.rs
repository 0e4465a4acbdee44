//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` (or a connection, when they must join a caller's
//! transaction) as the first argument.

pub mod annotation_repo;
pub mod job_repo;
pub mod organization_repo;
pub mod prediction_repo;
pub mod project_repo;
pub mod summary_repo;
pub mod task_repo;
pub mod webhook_repo;

pub use annotation_repo::AnnotationRepo;
pub use job_repo::JobRepo;
pub use organization_repo::{OrganizationRepo, UserRepo};
pub use prediction_repo::PredictionRepo;
pub use project_repo::ProjectRepo;
pub use summary_repo::SummaryRepo;
pub use task_repo::TaskRepo;
pub use webhook_repo::WebhookRepo;
