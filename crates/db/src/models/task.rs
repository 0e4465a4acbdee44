use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use labelstack_core::types::{DbId, Timestamp};

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub data: serde_json::Value,
    pub is_labeled: bool,
    pub total_annotations: i32,
    pub cancelled_annotations: i32,
    pub total_predictions: i32,
    pub updated_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub project_id: DbId,
    pub data: serde_json::Value,
}
