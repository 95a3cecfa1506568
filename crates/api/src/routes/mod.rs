pub mod ai_jobs;
pub mod auth;
pub mod billing;
pub mod health;
pub mod initiatives;
pub mod tasks;
pub mod workspaces;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                        register (public)
/// /auth/login                           login (public)
///
/// /workspaces                           list, create
/// /workspaces/{id}                      get, update, delete
/// /workspaces/{id}/initiatives          list, create
///
/// /initiatives/{id}                     get, update, delete
/// /initiatives/{id}/restore             restore (POST)
/// /initiatives/{id}/tasks               list, create
///
/// /tasks/{id}                           get, update, delete
/// /tasks/{id}/checklist                 get, replace (PUT)
///
/// /ai/jobs                              list, submit
/// /ai/jobs/{id}                         get
/// /ai/jobs/{id}/cancel                  cancel (POST)
///
/// /billing/account                      get caller's account
/// /billing/transactions                 ledger listing
/// /billing/credit                       credit an account (admin only)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Authentication routes (register, login).
        .nest("/auth", auth::router())
        // Workspace routes (also nests initiative creation/listing).
        .nest("/workspaces", workspaces::router())
        // Initiative routes (also nests task creation/listing).
        .nest("/initiatives", initiatives::router())
        // Task routes including checklist replacement.
        .nest("/tasks", tasks::router())
        // AI improvement job queue.
        .nest("/ai", ai_jobs::router())
        // Billing account and ledger.
        .nest("/billing", billing::router())
}
