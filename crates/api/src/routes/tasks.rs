//! Route definitions for the `/tasks` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Routes mounted at `/tasks`.
///
/// ```text
/// GET    /{id}            -> get_by_id
/// PATCH  /{id}            -> update
/// DELETE /{id}            -> delete (soft)
/// GET    /{id}/checklist  -> get_checklist
/// PUT    /{id}/checklist  -> replace_checklist
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(tasks::get_by_id)
                .patch(tasks::update)
                .delete(tasks::delete),
        )
        .route(
            "/{id}/checklist",
            get(tasks::get_checklist).put(tasks::replace_checklist),
        )
}
