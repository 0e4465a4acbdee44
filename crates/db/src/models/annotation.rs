//! Annotation rows.

use serde::Serialize;
use sqlx::FromRow;
use labelstack_core::annotation::{AnnotationOrigin, CreatedAnnotation};
use labelstack_core::error::CoreError;
use labelstack_core::types::{DbId, Timestamp};

/// A row from the `annotations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Annotation {
    pub id: DbId,
    pub task_id: DbId,
    pub project_id: DbId,
    pub result: serde_json::Value,
    pub completed_by: DbId,
    pub parent_prediction_id: Option<DbId>,
    pub lead_time: f64,
    pub was_cancelled: bool,
    pub ground_truth: bool,
    pub origin: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TryFrom<Annotation> for CreatedAnnotation {
    type Error = CoreError;

    fn try_from(row: Annotation) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            task_id: row.task_id,
            result: row.result,
            completed_by: row.completed_by,
            parent_prediction_id: row.parent_prediction_id,
            lead_time: row.lead_time,
            was_cancelled: row.was_cancelled,
            ground_truth: row.ground_truth,
            origin: AnnotationOrigin::parse(&row.origin)?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}
