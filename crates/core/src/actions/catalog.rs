//! Registry of bulk actions.

use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use serde::Serialize;

use super::predictions_to_annotations::PredictionsToAnnotations;
use super::{
    ActionDescriptor, ActionError, ActionHandler, ActionRequest, ActionResponse, ActionServices,
    DialogKind,
};
use crate::error::CoreError;
use crate::forms::{FormSpec, ProjectFormContext};
use crate::permissions::Permission;

/// Every registered action, keyed by id.
#[derive(Default)]
pub struct ActionCatalog {
    handlers: HashMap<&'static str, Arc<dyn ActionHandler>>,
}

/// An action as listed to a caller, with its form rendered for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionSummary {
    pub id: &'static str,
    pub title: &'static str,
    pub order: i32,
    pub permission: Permission,
    pub experimental: bool,
    pub dialog: Option<DialogSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DialogSummary {
    pub text: &'static str,
    #[serde(rename = "type")]
    pub kind: DialogKind,
    pub form: Option<Vec<FormSpec>>,
}

impl ActionSummary {
    fn render(descriptor: &ActionDescriptor, project: &ProjectFormContext) -> Self {
        Self {
            id: descriptor.id,
            title: descriptor.title,
            order: descriptor.order,
            permission: descriptor.permission,
            experimental: descriptor.experimental,
            dialog: descriptor.dialog.as_ref().map(|dialog| DialogSummary {
                text: dialog.text,
                kind: dialog.kind,
                form: dialog.form.map(|build| build(project)),
            }),
        }
    }
}

static GLOBAL: OnceLock<ActionCatalog> = OnceLock::new();

impl ActionCatalog {
    /// The process-wide catalog holding every built-in action.
    pub fn global() -> &'static ActionCatalog {
        GLOBAL.get_or_init(Self::builtin)
    }

    /// A fresh catalog with the built-in actions registered.
    pub fn builtin() -> Self {
        let mut catalog = Self::default();
        catalog
            .register(Arc::new(PredictionsToAnnotations::new()))
            .unwrap_or_else(|e| panic!("built-in action registration: {e}"));
        catalog
    }

    /// Add `handler`. Ids must be unique.
    pub fn register(&mut self, handler: Arc<dyn ActionHandler>) -> Result<(), CoreError> {
        let id = handler.descriptor().id;
        if self.handlers.contains_key(id) {
            return Err(CoreError::Validation(format!(
                "Action '{id}' is already registered"
            )));
        }
        self.handlers.insert(id, handler);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn ActionHandler>> {
        self.handlers.get(id)
    }

    /// Visible actions the caller may perform, in menu order.
    pub fn available_for(
        &self,
        granted: &[Permission],
        project: &ProjectFormContext,
    ) -> Vec<ActionSummary> {
        let mut listed: Vec<&ActionDescriptor> = self
            .handlers
            .values()
            .map(|h| h.descriptor())
            .filter(|d| !d.hidden && granted.contains(&d.permission))
            .collect();
        listed.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(b.id)));
        listed
            .into_iter()
            .map(|d| ActionSummary::render(d, project))
            .collect()
    }

    /// Check `granted` against the action's permission, then run it.
    pub async fn perform(
        &self,
        services: &ActionServices,
        id: &str,
        granted: &[Permission],
        request: ActionRequest,
    ) -> Result<ActionResponse, ActionError> {
        let handler = self
            .get(id)
            .ok_or_else(|| CoreError::not_found("Action", id))?;

        let required = handler.descriptor().permission;
        if !granted.contains(&required) {
            return Err(CoreError::Forbidden(format!(
                "Action '{id}' requires the {required} permission"
            ))
            .into());
        }

        tracing::debug!(action = id, project_id = request.project.id, "Performing action");
        handler.perform(services, request).await
    }
}
