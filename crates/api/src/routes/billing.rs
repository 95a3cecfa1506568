//! Route definitions for the `/billing` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::billing;
use crate::state::AppState;

/// Routes mounted at `/billing`.
///
/// ```text
/// GET  /account       -> get_account
/// GET  /transactions  -> list_transactions (?limit)
/// POST /credit        -> credit (admin only)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/account", get(billing::get_account))
        .route("/transactions", get(billing::list_transactions))
        .route("/credit", post(billing::credit))
}
