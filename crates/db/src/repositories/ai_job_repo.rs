//! Repository for the `ai_improvement_jobs` table.
//!
//! Uses `JobStatus` from `models::status` for all status transitions.
//! The poller claims work with `FOR UPDATE SKIP LOCKED` so a second poller
//! instance never double-claims a row.

use loopline_core::types::DbId;
use sqlx::PgPool;

use crate::models::ai_job::{AiImprovementJob, AiJobListQuery, JobUsage, SubmitAiJob};
use crate::models::status::JobStatus;

/// Column list for `ai_improvement_jobs` queries.
const COLUMNS: &str = "\
    id, user_id, workspace_id, lens, mode, status_id, \
    input_data, result_data, error_message, error_kind, \
    input_tokens, output_tokens, cost_microdollars, \
    started_at, completed_at, created_at, updated_at";

/// Maximum page size for job listing.
const MAX_LIMIT: i64 = 100;

/// Default page size for job listing.
const DEFAULT_LIMIT: i64 = 50;

/// Provides queue and CRUD operations for AI improvement jobs.
pub struct AiJobRepo;

impl AiJobRepo {
    /// Create a new pending job. Returns immediately with the job row.
    pub async fn submit(
        pool: &PgPool,
        user_id: DbId,
        input: &SubmitAiJob,
    ) -> Result<AiImprovementJob, sqlx::Error> {
        let query = format!(
            "INSERT INTO ai_improvement_jobs (user_id, workspace_id, lens, mode, status_id, input_data) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AiImprovementJob>(&query)
            .bind(user_id)
            .bind(input.workspace_id)
            .bind(&input.lens)
            .bind(&input.mode)
            .bind(JobStatus::Pending.id())
            .bind(&input.input_data)
            .fetch_one(pool)
            .await
    }

    /// Delete the user's other pending jobs for the same lens.
    ///
    /// Superseded work is cancelled by removing the queued rows; a job
    /// already in `Processing` is never interrupted. Returns the number of
    /// rows removed.
    pub async fn delete_superseded(
        pool: &PgPool,
        user_id: DbId,
        lens: &str,
        keep_job_id: Option<DbId>,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM ai_improvement_jobs \
             WHERE user_id = $1 AND lens = $2 AND status_id = $3 \
               AND ($4::bigint IS NULL OR id <> $4)",
        )
        .bind(user_id)
        .bind(lens)
        .bind(JobStatus::Pending.id())
        .bind(keep_job_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Atomically claim the oldest pending job, transitioning it to
    /// `Processing` and stamping `started_at`.
    ///
    /// Uses `SELECT FOR UPDATE SKIP LOCKED` to prevent double-claims when
    /// multiple poller instances are running.
    pub async fn claim_next(pool: &PgPool) -> Result<Option<AiImprovementJob>, sqlx::Error> {
        let query = format!(
            "UPDATE ai_improvement_jobs \
             SET status_id = $1, started_at = NOW() \
             WHERE id = ( \
                 SELECT id FROM ai_improvement_jobs \
                 WHERE status_id = $2 \
                 ORDER BY created_at ASC \
                 LIMIT 1 \
                 FOR UPDATE SKIP LOCKED \
             ) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AiImprovementJob>(&query)
            .bind(JobStatus::Processing.id())
            .bind(JobStatus::Pending.id())
            .fetch_optional(pool)
            .await
    }

    /// Mark a job as completed with its validated result and usage.
    pub async fn complete(
        pool: &PgPool,
        job_id: DbId,
        result: &serde_json::Value,
        usage: JobUsage,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE ai_improvement_jobs \
             SET status_id = $2, result_data = $3, \
                 input_tokens = $4, output_tokens = $5, cost_microdollars = $6, \
                 completed_at = NOW() \
             WHERE id = $1",
        )
        .bind(job_id)
        .bind(JobStatus::Completed.id())
        .bind(result)
        .bind(usage.input_tokens)
        .bind(usage.output_tokens)
        .bind(usage.cost_microdollars)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Mark a processing job as failed with an error message and
    /// classification. Returns `false` if the job was not in `Processing`,
    /// so a recorded result is never overwritten.
    ///
    /// No automatic retry is performed; the row stays `Failed` until the
    /// user submits a fresh job.
    pub async fn fail(
        pool: &PgPool,
        job_id: DbId,
        error: &str,
        kind: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE ai_improvement_jobs \
             SET status_id = $2, error_message = $3, error_kind = $4, completed_at = NOW() \
             WHERE id = $1 AND status_id = $5",
        )
        .bind(job_id)
        .bind(JobStatus::Failed.id())
        .bind(error)
        .bind(kind)
        .bind(JobStatus::Processing.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Cancel a pending job. Returns `false` if the job had already left
    /// the queue (processing or terminal).
    pub async fn cancel(pool: &PgPool, job_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE ai_improvement_jobs \
             SET status_id = $2, completed_at = NOW() \
             WHERE id = $1 AND status_id = $3",
        )
        .bind(job_id)
        .bind(JobStatus::Canceled.id())
        .bind(JobStatus::Pending.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Find a job by its ID.
    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<AiImprovementJob>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ai_improvement_jobs WHERE id = $1");
        sqlx::query_as::<_, AiImprovementJob>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's jobs, newest first, with optional status filter and
    /// pagination.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
        params: &AiJobListQuery,
    ) -> Result<Vec<AiImprovementJob>, sqlx::Error> {
        let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
        let offset = params.offset.unwrap_or(0).max(0);

        let query = format!(
            "SELECT {COLUMNS} FROM ai_improvement_jobs \
             WHERE user_id = $1 \
               AND ($2::smallint IS NULL OR status_id = $2) \
             ORDER BY created_at DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, AiImprovementJob>(&query)
            .bind(user_id)
            .bind(params.status_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
