//! AI improvement job models and DTOs.
//!
//! An `AiImprovementJob` row is a queued request for the LLM to propose or
//! apply changes to one or more planning entities. The poller in
//! `loopline-worker` walks rows through
//! `Pending -> Processing -> Completed | Failed`.

use loopline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::StatusId;

/// A row from the `ai_improvement_jobs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AiImprovementJob {
    pub id: DbId,
    pub user_id: DbId,
    pub workspace_id: DbId,
    /// Wire form of [`loopline_core::ai::Lens`].
    pub lens: String,
    /// Wire form of [`loopline_core::ai::ChatMode`].
    pub mode: String,
    pub status_id: StatusId,
    /// Entity snapshots plus the chat thread, as submitted.
    pub input_data: serde_json::Value,
    /// Validated model output; set on completion.
    pub result_data: Option<serde_json::Value>,
    pub error_message: Option<String>,
    /// Classification recorded on failure (e.g. `rate_limited`, `timeout`).
    pub error_kind: Option<String>,
    pub input_tokens: Option<i64>,
    pub output_tokens: Option<i64>,
    /// Charge for the call in micro-dollars.
    pub cost_microdollars: Option<i64>,
    pub started_at: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /ai/jobs`.
#[derive(Debug, Deserialize)]
pub struct SubmitAiJob {
    pub workspace_id: DbId,
    pub lens: String,
    pub mode: String,
    /// Entity ids in scope plus the chat thread; stored verbatim.
    pub input_data: serde_json::Value,
}

/// Query parameters for `GET /ai/jobs`.
#[derive(Debug, Deserialize)]
pub struct AiJobListQuery {
    pub status_id: Option<StatusId>,
    /// Maximum number of results. Defaults to 50, capped at 100.
    pub limit: Option<i64>,
    /// Number of results to skip. Defaults to 0.
    pub offset: Option<i64>,
}

/// Usage and cost recorded when a job completes.
#[derive(Debug, Clone, Copy)]
pub struct JobUsage {
    pub input_tokens: i64,
    pub output_tokens: i64,
    pub cost_microdollars: i64,
}
