//! Project entity, its running label summary, and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use labelstack_core::types::{DbId, Timestamp};

/// A row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub organization_id: DbId,
    pub title: String,
    pub maximum_annotations: i32,
    /// The project's current model version, if one is configured.
    pub model_version: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateProject {
    pub organization_id: DbId,
    pub title: String,
    /// Defaults to 1 when omitted.
    pub maximum_annotations: Option<i32>,
    pub model_version: Option<String>,
    pub created_by: Option<DbId>,
}

/// A row from the `project_summaries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProjectSummary {
    pub project_id: DbId,
    pub created_annotations: serde_json::Value,
    pub created_labels: serde_json::Value,
    pub updated_at: Timestamp,
}
