//! Handlers for the `/billing` resource.

use axum::extract::{Query, State};
use axum::Json;
use loopline_core::error::CoreError;
use loopline_core::types::DbId;
use loopline_db::models::billing::{AccountTransaction, BillingAccount};
use loopline_db::repositories::BillingRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Default page size for the ledger listing.
const DEFAULT_TX_LIMIT: i64 = 50;

/// Maximum page size for the ledger listing.
const MAX_TX_LIMIT: i64 = 200;

/// Query parameters for `GET /billing/transactions`.
#[derive(Debug, Deserialize)]
pub struct TransactionsQuery {
    pub limit: Option<i64>,
}

/// Request body for `POST /billing/credit` (admin only).
#[derive(Debug, Deserialize)]
pub struct CreditRequest {
    pub user_id: DbId,
    pub amount_cents: i64,
}

/// GET /api/v1/billing/account
///
/// Return the caller's billing account, creating a zero-balance one on
/// first access.
pub async fn get_account(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<BillingAccount>> {
    let account = BillingRepo::ensure_account(&state.pool, user.user_id).await?;
    Ok(Json(account))
}

/// GET /api/v1/billing/transactions
pub async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<TransactionsQuery>,
) -> AppResult<Json<Vec<AccountTransaction>>> {
    let limit = params.limit.unwrap_or(DEFAULT_TX_LIMIT).clamp(1, MAX_TX_LIMIT);
    let transactions = BillingRepo::list_transactions(&state.pool, user.user_id, limit).await?;
    Ok(Json(transactions))
}

/// POST /api/v1/billing/credit
///
/// Credit a user's account. Admin only.
pub async fn credit(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreditRequest>,
) -> AppResult<Json<BillingAccount>> {
    user.require_admin()?;

    if input.amount_cents <= 0 {
        return Err(AppError::Core(CoreError::Validation(
            "Credit amount must be positive".into(),
        )));
    }

    BillingRepo::ensure_account(&state.pool, input.user_id).await?;
    let account =
        BillingRepo::credit(&state.pool, input.user_id, input.amount_cents, "manual_credit")
            .await?;

    tracing::info!(
        admin_id = user.user_id,
        user_id = input.user_id,
        amount_cents = input.amount_cents,
        "account credited"
    );

    Ok(Json(account))
}
