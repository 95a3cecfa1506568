//! Task and checklist entity models and DTOs.

use loopline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::StatusId;

/// A row from the `tasks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Task {
    pub id: DbId,
    pub initiative_id: DbId,
    pub workspace_id: DbId,
    /// Human identifier, unique per workspace (e.g. `T-017`).
    pub identifier: String,
    pub title: String,
    pub description: Option<String>,
    pub status_id: StatusId,
    pub user_id: DbId,
    /// True while a queued AI improvement job references this task.
    pub ai_pending: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `checklist_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChecklistItem {
    pub id: DbId,
    pub task_id: DbId,
    pub title: String,
    pub is_complete: bool,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /initiatives/{id}/tasks`.
#[derive(Debug, Deserialize)]
pub struct CreateTask {
    pub title: String,
    pub description: Option<String>,
    pub status_id: Option<StatusId>,
}

/// DTO for `PATCH /tasks/{id}`. Only non-`None` fields are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTask {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status_id: Option<StatusId>,
}

/// One entry in a full checklist replacement (`PUT /tasks/{id}/checklist`).
/// Order in the submitted vector becomes `sort_order`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChecklistEntry {
    pub title: String,
    #[serde(default)]
    pub is_complete: bool,
}
