//! Model predictions attached to tasks.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use labelstack_core::conversion::ConvertiblePrediction;
use labelstack_core::types::{DbId, Timestamp};

/// A row from the `predictions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Prediction {
    pub id: DbId,
    pub task_id: DbId,
    pub project_id: DbId,
    pub result: serde_json::Value,
    pub score: Option<f64>,
    pub model_version: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreatePrediction {
    pub task_id: DbId,
    pub result: serde_json::Value,
    pub score: Option<f64>,
    /// Stored as an empty string when omitted.
    pub model_version: Option<String>,
}

/// The columns the converter reads.
#[derive(Debug, Clone, FromRow)]
pub struct ConvertibleRow {
    pub id: DbId,
    pub task_id: DbId,
    pub result: serde_json::Value,
    pub model_version: String,
}

impl From<ConvertibleRow> for ConvertiblePrediction {
    fn from(row: ConvertibleRow) -> Self {
        Self {
            id: row.id,
            task_id: row.task_id,
            result: row.result,
            model_version: row.model_version,
        }
    }
}
