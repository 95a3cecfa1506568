//! Handlers for the `/workspaces` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use loopline_core::error::CoreError;
use loopline_core::types::DbId;
use loopline_db::models::workspace::{CreateWorkspace, UpdateWorkspace, Workspace};
use loopline_db::repositories::WorkspaceRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Fetch a workspace and verify the caller owns it.
///
/// Returns `NotFound` for both missing and foreign workspaces so callers
/// cannot probe for other users' workspace ids.
pub(crate) async fn find_owned(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> Result<Workspace, AppError> {
    let workspace = WorkspaceRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|w| w.owner_id == user.user_id)
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Workspace",
            id,
        }))?;
    Ok(workspace)
}

/// POST /api/v1/workspaces
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Json(input): Json<CreateWorkspace>,
) -> AppResult<(StatusCode, Json<Workspace>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Workspace name must not be empty".into(),
        )));
    }
    let workspace = WorkspaceRepo::create(&state.pool, user.user_id, &input).await?;
    Ok((StatusCode::CREATED, Json(workspace)))
}

/// GET /api/v1/workspaces
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<Vec<Workspace>>> {
    let workspaces = WorkspaceRepo::list_by_owner(&state.pool, user.user_id).await?;
    Ok(Json(workspaces))
}

/// GET /api/v1/workspaces/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Workspace>> {
    let workspace = find_owned(&state, &user, id).await?;
    Ok(Json(workspace))
}

/// PATCH /api/v1/workspaces/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateWorkspace>,
) -> AppResult<Json<Workspace>> {
    find_owned(&state, &user, id).await?;
    if input.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(
            "Workspace name must not be empty".into(),
        )));
    }
    let workspace = WorkspaceRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Workspace",
            id,
        }))?;
    Ok(Json(workspace))
}

/// DELETE /api/v1/workspaces/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_owned(&state, &user, id).await?;
    let deleted = WorkspaceRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Workspace",
            id,
        }))
    }
}
