//! AI improvement job poller.
//!
//! A single long-lived Tokio task. Each tick claims the oldest pending job
//! (via `FOR UPDATE SKIP LOCKED` in [`AiJobRepo::claim_next`]), flags the
//! referenced entities, dispatches the LLM call, and records the outcome:
//!
//! `Pending -> Processing -> Completed | Failed`
//!
//! State is committed after each phase. A failed cycle is logged and the
//! loop continues; the poller itself never dies on a job error.

use std::time::Duration;

use loopline_ai::{AiError, AiService, JobInput};
use loopline_core::ai::{ChatMode, Lens};
use loopline_core::types::DbId;
use loopline_db::models::ai_job::{AiImprovementJob, JobUsage};
use loopline_db::repositories::billing_repo::DebitOutcome;
use loopline_db::repositories::{AiJobRepo, BillingRepo, InitiativeRepo, TaskRepo};
use serde::Deserialize;
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// Default polling interval for the job loop.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Error kind recorded when the job row itself is malformed.
const KIND_INTERNAL: &str = "internal";

/// Error kind recorded when the queue bookkeeping hits a database error.
const KIND_DATABASE: &str = "database";

/// Entity ids referenced by a job, pulled from `input_data`. Only these
/// rows get the `ai_pending` flag.
#[derive(Debug, Default, Deserialize)]
struct JobScope {
    #[serde(default)]
    initiative_ids: Vec<DbId>,
    #[serde(default)]
    task_ids: Vec<DbId>,
}

/// Background poller for AI improvement jobs.
pub struct JobPoller {
    pool: PgPool,
    service: AiService,
    poll_interval: Duration,
}

impl JobPoller {
    /// Create a poller with the default 1-second interval.
    pub fn new(pool: PgPool, service: AiService) -> Self {
        Self {
            pool,
            service,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Run the poll loop until the cancellation token is triggered.
    /// An in-flight job always finishes before the loop exits.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut ticker = tokio::time::interval(self.poll_interval);
        tracing::info!(
            poll_interval_ms = self.poll_interval.as_millis() as u64,
            "Job poller started",
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::info!("Job poller shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    if let Err(e) = self.tick().await {
                        tracing::error!(error = %e, "Poll cycle failed");
                    }
                }
            }
        }
    }

    /// One poll cycle: claim at most one job and process it to a terminal
    /// state.
    pub async fn tick(&self) -> Result<(), sqlx::Error> {
        let Some(job) = AiJobRepo::claim_next(&self.pool).await? else {
            return Ok(());
        };

        tracing::info!(
            job_id = job.id,
            user_id = job.user_id,
            lens = %job.lens,
            mode = %job.mode,
            "Job claimed",
        );

        if let Err(e) = self.process_job(&job).await {
            // Provider failures are recorded inside process_job; an error
            // here came from the bookkeeping itself. Record it so the row
            // does not sit in Processing forever.
            tracing::error!(job_id = job.id, error = %e, "Job bookkeeping failed");
            let msg = format!("Bookkeeping failed: {e}");
            if let Err(e) = AiJobRepo::fail(&self.pool, job.id, &msg, KIND_DATABASE).await {
                tracing::error!(job_id = job.id, error = %e, "Could not record job failure");
            }
        }

        Ok(())
    }

    async fn process_job(&self, job: &AiImprovementJob) -> Result<(), sqlx::Error> {
        // Malformed lens/mode means the row predates the current enum set;
        // fail it rather than wedging the queue head.
        let (lens, mode) = match (Lens::parse(&job.lens), ChatMode::parse(&job.mode)) {
            (Ok(lens), Ok(mode)) => (lens, mode),
            (lens, mode) => {
                let msg = format!("Unrecognized lens/mode: {:?} / {:?}", lens.err(), mode.err());
                AiJobRepo::fail(&self.pool, job.id, &msg, KIND_INTERNAL).await?;
                return Ok(());
            }
        };

        let scope: JobScope =
            serde_json::from_value(job.input_data.clone()).unwrap_or_default();
        let input: JobInput = match serde_json::from_value(job.input_data.clone()) {
            Ok(input) => input,
            Err(e) => {
                let msg = format!("Job input did not parse: {e}");
                AiJobRepo::fail(&self.pool, job.id, &msg, KIND_INTERNAL).await?;
                return Ok(());
            }
        };

        self.set_scope_pending(&scope, true).await?;

        let outcome = self.service.respond(lens, mode, &input).await;

        // Clear the flags before recording the terminal state so readers
        // never see a completed job with entities still marked pending.
        self.set_scope_pending(&scope, false).await?;

        match outcome {
            Ok(outcome) => {
                let usage = JobUsage {
                    input_tokens: outcome.cost.input_tokens as i64,
                    output_tokens: outcome.cost.output_tokens as i64,
                    cost_microdollars: outcome.cost.total_microdollars as i64,
                };
                AiJobRepo::complete(&self.pool, job.id, &outcome.result, usage).await?;
                self.debit(job, outcome.cost.cents()).await?;

                tracing::info!(
                    job_id = job.id,
                    cost_cents = outcome.cost.cents(),
                    "Job completed",
                );
            }
            Err(e) => {
                AiJobRepo::fail(&self.pool, job.id, &e.to_string(), error_kind(&e)).await?;
                tracing::warn!(
                    job_id = job.id,
                    kind = error_kind(&e),
                    error = %e,
                    "Job failed",
                );
            }
        }

        Ok(())
    }

    async fn set_scope_pending(&self, scope: &JobScope, pending: bool) -> Result<(), sqlx::Error> {
        if !scope.initiative_ids.is_empty() {
            InitiativeRepo::set_ai_pending(&self.pool, &scope.initiative_ids, pending).await?;
        }
        if !scope.task_ids.is_empty() {
            TaskRepo::set_ai_pending(&self.pool, &scope.task_ids, pending).await?;
        }
        Ok(())
    }

    async fn debit(&self, job: &AiImprovementJob, cents: i64) -> Result<(), sqlx::Error> {
        if cents <= 0 {
            return Ok(());
        }
        match BillingRepo::debit_for_job(&self.pool, job.user_id, cents, job.id).await? {
            DebitOutcome::Applied => Ok(()),
            DebitOutcome::InsufficientBalance => {
                // The submit-time balance gate should prevent this; the
                // completed result is kept and the shortfall logged.
                tracing::warn!(
                    job_id = job.id,
                    user_id = job.user_id,
                    cents,
                    "Balance too low to cover completed job",
                );
                Ok(())
            }
        }
    }
}

fn error_kind(e: &AiError) -> &'static str {
    match e {
        AiError::Internal(_) => KIND_INTERNAL,
        other => other.kind(),
    }
}
