//! Handlers for the `/initiatives` resource.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use loopline_core::error::CoreError;
use loopline_core::types::DbId;
use loopline_db::models::initiative::{CreateInitiative, Initiative, UpdateInitiative};
use loopline_db::models::status::StatusId;
use loopline_db::repositories::InitiativeRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::workspaces;
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Query parameters for initiative listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status_id: Option<StatusId>,
}

/// Fetch an initiative and verify the caller owns its workspace.
pub(crate) async fn find_authorized(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> Result<Initiative, AppError> {
    let initiative = InitiativeRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Initiative",
            id,
        }))?;
    workspaces::find_owned(state, user, initiative.workspace_id).await?;
    Ok(initiative)
}

/// POST /api/v1/workspaces/{workspace_id}/initiatives
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Json(input): Json<CreateInitiative>,
) -> AppResult<(StatusCode, Json<Initiative>)> {
    workspaces::find_owned(&state, &user, workspace_id).await?;
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Initiative title must not be empty".into(),
        )));
    }
    let initiative = InitiativeRepo::create(&state.pool, workspace_id, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(initiative)))
}

/// GET /api/v1/workspaces/{workspace_id}/initiatives
pub async fn list_by_workspace(
    State(state): State<AppState>,
    user: AuthUser,
    Path(workspace_id): Path<DbId>,
    Query(params): Query<ListQuery>,
) -> AppResult<Json<Vec<Initiative>>> {
    workspaces::find_owned(&state, &user, workspace_id).await?;
    let initiatives =
        InitiativeRepo::list_by_workspace(&state.pool, workspace_id, params.status_id).await?;
    Ok(Json(initiatives))
}

/// GET /api/v1/initiatives/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Initiative>> {
    let initiative = find_authorized(&state, &user, id).await?;
    Ok(Json(initiative))
}

/// PATCH /api/v1/initiatives/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateInitiative>,
) -> AppResult<Json<Initiative>> {
    find_authorized(&state, &user, id).await?;
    if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(
            "Initiative title must not be empty".into(),
        )));
    }
    let initiative = InitiativeRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Initiative",
            id,
        }))?;
    Ok(Json(initiative))
}

/// DELETE /api/v1/initiatives/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_authorized(&state, &user, id).await?;
    let deleted = InitiativeRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Initiative",
            id,
        }))
    }
}

/// POST /api/v1/initiatives/{id}/restore
///
/// Restore a soft-deleted initiative. The ownership check goes through the
/// workspace because the initiative row itself is currently hidden.
pub async fn restore(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Initiative>> {
    let initiative = InitiativeRepo::find_by_id_any(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Initiative",
            id,
        }))?;
    workspaces::find_owned(&state, &user, initiative.workspace_id).await?;

    let restored = InitiativeRepo::restore(&state.pool, id).await?;
    if !restored {
        return Err(AppError::Core(CoreError::Conflict(
            "Initiative is not deleted".into(),
        )));
    }
    let initiative = find_authorized(&state, &user, id).await?;
    Ok(Json(initiative))
}
