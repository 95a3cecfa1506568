//! Initiative entity models and DTOs.

use loopline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::StatusId;

/// A row from the `initiatives` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Initiative {
    pub id: DbId,
    pub workspace_id: DbId,
    /// Human identifier, unique per workspace (e.g. `I-003`).
    pub identifier: String,
    pub title: String,
    pub description: Option<String>,
    pub status_id: StatusId,
    /// Creator.
    pub user_id: DbId,
    /// True while a queued AI improvement job references this initiative.
    pub ai_pending: bool,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /workspaces/{id}/initiatives`.
///
/// `identifier` is minted by the repository from the workspace counter,
/// never supplied by the caller.
#[derive(Debug, Deserialize)]
pub struct CreateInitiative {
    pub title: String,
    pub description: Option<String>,
    pub status_id: Option<StatusId>,
}

/// DTO for `PATCH /initiatives/{id}`. Only non-`None` fields are applied.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateInitiative {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status_id: Option<StatusId>,
}
