//! Route definitions for the `/initiatives` resource.
//!
//! Creation and listing live under `/workspaces/{workspace_id}/initiatives`;
//! this router covers lookups by initiative id, plus nested task routes.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{initiatives, tasks};
use crate::state::AppState;

/// Routes mounted at `/initiatives`.
///
/// ```text
/// GET    /{id}                       -> get_by_id
/// PATCH  /{id}                       -> update
/// DELETE /{id}                       -> delete (soft)
/// POST   /{id}/restore               -> restore
///
/// GET    /{initiative_id}/tasks      -> list_by_initiative (?status_id)
/// POST   /{initiative_id}/tasks      -> create
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(initiatives::get_by_id)
                .patch(initiatives::update)
                .delete(initiatives::delete),
        )
        .route("/{id}/restore", post(initiatives::restore))
        .route(
            "/{initiative_id}/tasks",
            get(tasks::list_by_initiative).post(tasks::create),
        )
}
