pub mod actions;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /projects/{project_id}/actions      bulk actions (list, perform)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/projects/{project_id}/actions", actions::router())
}
