//! Route definitions for the `/workspaces` resource.
//!
//! Also nests workspace-scoped initiative routes under
//! `/workspaces/{workspace_id}/initiatives`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{initiatives, workspaces};
use crate::state::AppState;

/// Routes mounted at `/workspaces`.
///
/// ```text
/// GET    /                                 -> list
/// POST   /                                 -> create
/// GET    /{id}                             -> get_by_id
/// PATCH  /{id}                             -> update
/// DELETE /{id}                             -> delete
///
/// GET    /{workspace_id}/initiatives       -> list_by_workspace (?status_id)
/// POST   /{workspace_id}/initiatives       -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(workspaces::list).post(workspaces::create))
        .route(
            "/{id}",
            get(workspaces::get_by_id)
                .patch(workspaces::update)
                .delete(workspaces::delete),
        )
        .route(
            "/{workspace_id}/initiatives",
            get(initiatives::list_by_workspace).post(initiatives::create),
        )
}
