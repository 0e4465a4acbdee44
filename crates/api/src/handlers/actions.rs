//! Handlers for data-manager bulk actions.
//!
//! Listing renders each action's dialog form against the project's current
//! state; performing parses the task selection from the body and hands the
//! whole body to the action as its parameters.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;

use labelstack_core::actions::ActionRequest;
use labelstack_core::error::CoreError;
use labelstack_core::forms::ProjectFormContext;
use labelstack_core::project::ProjectRef;
use labelstack_core::selection::TaskSelection;
use labelstack_core::types::DbId;
use labelstack_db::models::project::Project;
use labelstack_db::repositories::ProjectRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Body key holding the task selection.
const SELECTED_ITEMS_KEY: &str = "selected_items";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Load a project of the caller's organization. Projects of other
/// organizations are reported as missing.
async fn find_visible_project(
    state: &AppState,
    auth: &AuthUser,
    project_id: DbId,
) -> AppResult<Project> {
    ProjectRepo::find_in_organization(&state.pool, project_id, auth.organization_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Project", project_id)))
}

/// Parse the raw request body. An empty body means "no parameters".
fn parse_body(body: &[u8]) -> AppResult<serde_json::Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(serde_json::Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
}

/// Task selection carried by the body; nothing is selected when absent.
fn parse_selection(body: &serde_json::Value) -> AppResult<TaskSelection> {
    match body.get(SELECTED_ITEMS_KEY) {
        None | Some(serde_json::Value::Null) => Ok(TaskSelection::default()),
        Some(raw) => serde_json::from_value(raw.clone())
            .map_err(|e| AppError::BadRequest(format!("Invalid {SELECTED_ITEMS_KEY}: {e}"))),
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /projects/{project_id}/actions
///
/// Actions the caller's role may perform, in menu order.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let project = find_visible_project(&state, &auth, project_id).await?;

    let context = ProjectFormContext {
        model_versions: ProjectRepo::model_versions(&state.pool, project.id).await?,
        current_model_version: project.model_version,
    };
    let actions = state.catalog.available_for(auth.permissions(), &context);

    Ok(Json(DataResponse { data: actions }))
}

/// POST /projects/{project_id}/actions/{action_id}
///
/// Run one action over the selected tasks.
pub async fn perform(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_id, action_id)): Path<(DbId, String)>,
    body: Bytes,
) -> AppResult<impl IntoResponse> {
    let project = find_visible_project(&state, &auth, project_id).await?;
    let params = parse_body(&body)?;
    let selection = parse_selection(&params)?;

    let request = ActionRequest {
        project: ProjectRef {
            id: project.id,
            organization_id: project.organization_id,
        },
        selection,
        actor: auth.actor(),
        params,
    };

    let response = state
        .catalog
        .perform(&state.services, &action_id, auth.permissions(), request)
        .await?;

    tracing::info!(
        project_id,
        action = %action_id,
        user_id = auth.user_id,
        detail = %response.detail,
        "Bulk action performed"
    );

    Ok(Json(response))
}
