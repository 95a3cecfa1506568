//! Handlers for the `/ai/jobs` resource.
//!
//! Submitting a job enqueues a row for the worker's poller; the HTTP layer
//! never calls the LLM itself. A new submission supersedes the user's other
//! queued jobs for the same lens.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use loopline_core::ai::{ChatMode, Lens};
use loopline_core::error::CoreError;
use loopline_core::types::DbId;
use loopline_db::models::ai_job::{AiImprovementJob, AiJobListQuery, SubmitAiJob};
use loopline_db::repositories::{AiJobRepo, BillingRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::workspaces;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Fetch a job and verify the caller submitted it.
async fn find_authorized(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> Result<AiImprovementJob, AppError> {
    let job = AiJobRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|j| j.user_id == user.user_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "AiImprovementJob",
            id,
        }))?;
    Ok(job)
}

/// POST /api/v1/ai/jobs
///
/// Enqueue an AI improvement job. Refused when the caller's billing balance
/// is not positive. Other pending jobs for the same lens are deleted; the
/// newest submission wins.
pub async fn submit(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<SubmitAiJob>,
) -> AppResult<(StatusCode, Json<AiImprovementJob>)> {
    // Reject unknown lens/mode values before they reach the queue.
    Lens::parse(&input.lens).map_err(AppError::Core)?;
    ChatMode::parse(&input.mode).map_err(AppError::Core)?;

    workspaces::find_owned(&state, &user, input.workspace_id).await?;

    let account = BillingRepo::ensure_account(&state.pool, user.user_id).await?;
    if account.balance_cents <= 0 {
        return Err(AppError::Core(CoreError::InsufficientBalance(
            "A positive balance is required to submit AI jobs".into(),
        )));
    }

    let job = AiJobRepo::submit(&state.pool, user.user_id, &input).await?;

    let superseded =
        AiJobRepo::delete_superseded(&state.pool, user.user_id, &input.lens, Some(job.id)).await?;
    if superseded > 0 {
        tracing::info!(
            user_id = user.user_id,
            lens = %input.lens,
            superseded,
            "removed superseded pending jobs"
        );
    }

    Ok((StatusCode::CREATED, Json(job)))
}

/// GET /api/v1/ai/jobs
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Query(params): Query<AiJobListQuery>,
) -> AppResult<Json<Vec<AiImprovementJob>>> {
    let jobs = AiJobRepo::list_by_user(&state.pool, user.user_id, &params).await?;
    Ok(Json(jobs))
}

/// GET /api/v1/ai/jobs/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<AiImprovementJob>> {
    let job = find_authorized(&state, &user, id).await?;
    Ok(Json(job))
}

/// POST /api/v1/ai/jobs/{id}/cancel
///
/// Cancel a queued job. Jobs already processing or finished cannot be
/// cancelled; the call returns 409 in that case.
pub async fn cancel(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<AiImprovementJob>> {
    find_authorized(&state, &user, id).await?;

    let cancelled = AiJobRepo::cancel(&state.pool, id).await?;
    if !cancelled {
        return Err(AppError::Core(CoreError::Conflict(
            "Job is no longer pending and cannot be cancelled".into(),
        )));
    }

    let job = find_authorized(&state, &user, id).await?;
    Ok(Json(job))
}
