//! Billing models: per-user account balance and the append-only ledger.

use loopline_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `billing_accounts` table. One per user, created lazily.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct BillingAccount {
    pub id: DbId,
    pub user_id: DbId,
    /// Current balance in cents. Never driven below zero by a debit.
    pub balance_cents: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `account_transactions` ledger.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AccountTransaction {
    pub id: DbId,
    pub account_id: DbId,
    /// Positive for credits, negative for debits.
    pub amount_cents: i64,
    /// Free-form source tag (e.g. `ai_job`, `manual_credit`).
    pub source: String,
    pub job_id: Option<DbId>,
    pub created_at: Timestamp,
}
