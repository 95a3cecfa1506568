//! Workspace entity models and DTOs.
//!
//! A workspace owns initiatives and tasks and carries the per-workspace
//! identifier counters (`initiative_seq`, `task_seq`) used to mint
//! human-readable identifiers like `I-003` / `T-017`.

use loopline_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `workspaces` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Workspace {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub owner_id: DbId,
    pub initiative_seq: i64,
    pub task_seq: i64,
    pub deleted_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for `POST /workspaces`.
#[derive(Debug, Deserialize)]
pub struct CreateWorkspace {
    pub name: String,
    pub description: Option<String>,
}

/// DTO for `PATCH /workspaces/{id}`. Only non-`None` fields are applied.
#[derive(Debug, Deserialize)]
pub struct UpdateWorkspace {
    pub name: Option<String>,
    pub description: Option<String>,
}
