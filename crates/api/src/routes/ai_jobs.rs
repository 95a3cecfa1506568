//! Route definitions for the `/ai` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ai_jobs;
use crate::state::AppState;

/// Routes mounted at `/ai`.
///
/// ```text
/// GET  /jobs              -> list (?status_id, limit, offset)
/// POST /jobs              -> submit
/// GET  /jobs/{id}         -> get_by_id
/// POST /jobs/{id}/cancel  -> cancel
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/jobs", get(ai_jobs::list).post(ai_jobs::submit))
        .route("/jobs/{id}", get(ai_jobs::get_by_id))
        .route("/jobs/{id}/cancel", post(ai_jobs::cancel))
}
