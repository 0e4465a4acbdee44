//! PostgreSQL implementation of the converter's storage seam.

use async_trait::async_trait;
use sqlx::PgPool;
use labelstack_core::annotation::{CreatedAnnotation, NewAnnotation};
use labelstack_core::conversion::{ConversionStore, ConvertiblePrediction};
use labelstack_core::model_version::ModelVersionFilter;
use labelstack_core::selection::TaskSelection;
use labelstack_core::types::{BoxError, DbId};

use crate::repositories::{AnnotationRepo, PredictionRepo, TaskRepo};

/// Reads eligible predictions and writes annotations plus task touches in
/// a single transaction.
///
/// Overlapping conversions of the same prediction are settled by the
/// `uq_annotations_converted_prediction` index: the loser's row is skipped
/// rather than duplicated.
#[derive(Clone)]
pub struct PgConversionStore {
    pool: PgPool,
}

impl PgConversionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversionStore for PgConversionStore {
    async fn find_convertible_predictions(
        &self,
        project_id: DbId,
        selection: &TaskSelection,
        filter: &ModelVersionFilter,
    ) -> Result<Vec<ConvertiblePrediction>, BoxError> {
        let rows = PredictionRepo::find_convertible(&self.pool, project_id, selection, filter).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn create_annotations(
        &self,
        annotations: Vec<NewAnnotation>,
        task_ids: &[DbId],
        updated_by: DbId,
    ) -> Result<Vec<CreatedAnnotation>, BoxError> {
        let mut tx = self.pool.begin().await?;
        let rows = AnnotationRepo::bulk_create(&mut *tx, &annotations).await?;
        TaskRepo::touch(&mut *tx, task_ids, updated_by).await?;
        tx.commit().await?;

        tracing::debug!(
            requested = annotations.len(),
            inserted = rows.len(),
            "Bulk-created annotations"
        );

        let created = rows
            .into_iter()
            .map(CreatedAnnotation::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(created)
    }
}
