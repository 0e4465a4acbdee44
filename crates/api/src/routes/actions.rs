//! Route definitions for project bulk actions.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::actions;
use crate::state::AppState;

/// Routes mounted at `/projects/{project_id}/actions`.
///
/// ```text
/// GET    /              -> list
/// POST   /{action_id}   -> perform
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(actions::list))
        .route("/{action_id}", post(actions::perform))
}
