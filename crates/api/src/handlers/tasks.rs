//! Handlers for the `/tasks` resource, including checklist replacement.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use loopline_core::error::CoreError;
use loopline_core::types::DbId;
use loopline_db::models::status::StatusId;
use loopline_db::models::task::{ChecklistEntry, ChecklistItem, CreateTask, Task, UpdateTask};
use loopline_db::repositories::TaskRepo;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::{initiatives, workspaces};
use crate::middleware::AuthUser;
use crate::state::AppState;

/// Query parameters for task listing.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status_id: Option<StatusId>,
}

/// Fetch a task and verify the caller owns its workspace.
pub(crate) async fn find_authorized(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> Result<Task, AppError> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    workspaces::find_owned(state, user, task.workspace_id).await?;
    Ok(task)
}

/// POST /api/v1/initiatives/{initiative_id}/tasks
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(initiative_id): Path<DbId>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<Task>)> {
    let initiative = initiatives::find_authorized(&state, &user, initiative_id).await?;
    if input.title.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Task title must not be empty".into(),
        )));
    }
    let task = TaskRepo::create(
        &state.pool,
        initiative.id,
        initiative.workspace_id,
        user.user_id,
        &input,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/v1/initiatives/{initiative_id}/tasks
pub async fn list_by_initiative(
    State(state): State<AppState>,
    user: AuthUser,
    Path(initiative_id): Path<DbId>,
    Query(params): Query<ListQuery>,
) -> AppResult<Json<Vec<Task>>> {
    initiatives::find_authorized(&state, &user, initiative_id).await?;
    let tasks = TaskRepo::list_by_initiative(&state.pool, initiative_id, params.status_id).await?;
    Ok(Json(tasks))
}

/// GET /api/v1/tasks/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Task>> {
    let task = find_authorized(&state, &user, id).await?;
    Ok(Json(task))
}

/// PATCH /api/v1/tasks/{id}
pub async fn update(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<Task>> {
    find_authorized(&state, &user, id).await?;
    if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(
            "Task title must not be empty".into(),
        )));
    }
    let task = TaskRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Task", id }))?;
    Ok(Json(task))
}

/// DELETE /api/v1/tasks/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    find_authorized(&state, &user, id).await?;
    let deleted = TaskRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: "Task", id }))
    }
}

/// GET /api/v1/tasks/{id}/checklist
pub async fn get_checklist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<ChecklistItem>>> {
    find_authorized(&state, &user, id).await?;
    let items = TaskRepo::list_checklist(&state.pool, id).await?;
    Ok(Json(items))
}

/// PUT /api/v1/tasks/{id}/checklist
///
/// Replace the task's checklist wholesale. Submission order becomes the
/// persisted sort order.
pub async fn replace_checklist(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(entries): Json<Vec<ChecklistEntry>>,
) -> AppResult<Json<Vec<ChecklistItem>>> {
    find_authorized(&state, &user, id).await?;
    if entries.iter().any(|e| e.title.trim().is_empty()) {
        return Err(AppError::Core(CoreError::Validation(
            "Checklist item titles must not be empty".into(),
        )));
    }
    let items = TaskRepo::replace_checklist(&state.pool, id, &entries).await?;
    Ok(Json(items))
}
