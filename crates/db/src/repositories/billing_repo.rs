//! Repository for the `billing_accounts` and `account_transactions` tables.
//!
//! Balances only change together with a ledger row, inside a transaction.
//! Debits refuse to drive the balance below zero.

use loopline_core::types::DbId;
use sqlx::PgPool;

use crate::models::billing::{AccountTransaction, BillingAccount};

/// Column list for `billing_accounts` queries.
const ACCOUNT_COLUMNS: &str = "id, user_id, balance_cents, created_at, updated_at";

/// Column list for `account_transactions` queries.
const TX_COLUMNS: &str = "id, account_id, amount_cents, source, job_id, created_at";

/// Outcome of a debit attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebitOutcome {
    Applied,
    /// The account balance was insufficient; nothing was written.
    InsufficientBalance,
}

/// Provides balance and ledger operations for billing accounts.
pub struct BillingRepo;

impl BillingRepo {
    /// Fetch the user's account, creating a zero-balance one if absent.
    pub async fn ensure_account(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<BillingAccount, sqlx::Error> {
        let query = format!(
            "INSERT INTO billing_accounts (user_id) \
             VALUES ($1) \
             ON CONFLICT (user_id) DO UPDATE SET updated_at = NOW() \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        sqlx::query_as::<_, BillingAccount>(&query)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Find an account by user ID.
    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<BillingAccount>, sqlx::Error> {
        let query = format!("SELECT {ACCOUNT_COLUMNS} FROM billing_accounts WHERE user_id = $1");
        sqlx::query_as::<_, BillingAccount>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Credit an account and append the matching ledger row.
    pub async fn credit(
        pool: &PgPool,
        user_id: DbId,
        amount_cents: i64,
        source: &str,
    ) -> Result<BillingAccount, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE billing_accounts \
             SET balance_cents = balance_cents + $2, updated_at = NOW() \
             WHERE user_id = $1 \
             RETURNING {ACCOUNT_COLUMNS}"
        );
        let account = sqlx::query_as::<_, BillingAccount>(&query)
            .bind(user_id)
            .bind(amount_cents)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO account_transactions (account_id, amount_cents, source) \
             VALUES ($1, $2, $3)",
        )
        .bind(account.id)
        .bind(amount_cents)
        .bind(source)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(account)
    }

    /// Debit an account for a completed AI job, appending the ledger row.
    ///
    /// The balance check and update happen in one guarded statement so a
    /// concurrent debit cannot overdraw the account.
    pub async fn debit_for_job(
        pool: &PgPool,
        user_id: DbId,
        amount_cents: i64,
        job_id: DbId,
    ) -> Result<DebitOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let account_id: Option<DbId> = sqlx::query_scalar(
            "UPDATE billing_accounts \
             SET balance_cents = balance_cents - $2, updated_at = NOW() \
             WHERE user_id = $1 AND balance_cents >= $2 \
             RETURNING id",
        )
        .bind(user_id)
        .bind(amount_cents)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(account_id) = account_id else {
            tx.rollback().await?;
            return Ok(DebitOutcome::InsufficientBalance);
        };

        sqlx::query(
            "INSERT INTO account_transactions (account_id, amount_cents, source, job_id) \
             VALUES ($1, $2, 'ai_job', $3)",
        )
        .bind(account_id)
        .bind(-amount_cents)
        .bind(job_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(DebitOutcome::Applied)
    }

    /// List an account's ledger, newest first.
    pub async fn list_transactions(
        pool: &PgPool,
        user_id: DbId,
        limit: i64,
    ) -> Result<Vec<AccountTransaction>, sqlx::Error> {
        let query = format!(
            "SELECT {TX_COLUMNS} FROM account_transactions \
             WHERE account_id = (SELECT id FROM billing_accounts WHERE user_id = $1) \
             ORDER BY created_at DESC, id DESC \
             LIMIT $2"
        );
        sqlx::query_as::<_, AccountTransaction>(&query)
            .bind(user_id)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
