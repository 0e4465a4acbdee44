//! "Create Annotations From Predictions": copy each selected task's
//! unconverted predictions into annotations owned by the caller.

use async_trait::async_trait;
use serde::Deserialize;

use super::{
    ActionDescriptor, ActionError, ActionHandler, ActionRequest, ActionResponse, ActionServices,
    DialogKind, DialogSpec,
};
use crate::conversion::convert_predictions;
use crate::error::CoreError;
use crate::forms::build_model_version_form;
use crate::model_version::ModelVersionFilter;
use crate::permissions::Permission;

pub const ACTION_ID: &str = "predictions_to_annotations";

const CONFIRM_TEXT: &str = "This action will create new annotations from predictions with the \
     selected model version for each selected task.";

/// Parameters read from the request body.
#[derive(Debug, Default, Deserialize)]
struct ConvertParams {
    #[serde(default)]
    model_version: ModelVersionFilter,
}

pub struct PredictionsToAnnotations {
    descriptor: ActionDescriptor,
}

impl PredictionsToAnnotations {
    pub fn new() -> Self {
        Self {
            descriptor: ActionDescriptor {
                id: ACTION_ID,
                title: "Create Annotations From Predictions",
                order: 91,
                permission: Permission::TasksChange,
                experimental: false,
                hidden: false,
                dialog: Some(DialogSpec {
                    text: CONFIRM_TEXT,
                    kind: DialogKind::Confirm,
                    form: Some(build_model_version_form),
                }),
            },
        }
    }
}

impl Default for PredictionsToAnnotations {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionHandler for PredictionsToAnnotations {
    fn descriptor(&self) -> &ActionDescriptor {
        &self.descriptor
    }

    async fn perform(
        &self,
        services: &ActionServices,
        request: ActionRequest,
    ) -> Result<ActionResponse, ActionError> {
        let params: ConvertParams = if request.params.is_null() {
            ConvertParams::default()
        } else {
            serde_json::from_value(request.params)
                .map_err(|e| CoreError::Validation(format!("Invalid action parameters: {e}")))?
        };

        let outcome = convert_predictions(
            services,
            &request.project,
            &request.selection,
            &request.actor,
            &params.model_version,
        )
        .await?;

        Ok(ActionResponse::ok(format!(
            "Created {} annotations",
            outcome.created_count()
        )))
    }
}
