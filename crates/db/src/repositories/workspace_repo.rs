//! Repository for the `workspaces` table.

use loopline_core::types::DbId;
use sqlx::PgPool;

use crate::models::workspace::{CreateWorkspace, UpdateWorkspace, Workspace};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, description, owner_id, initiative_seq, task_seq, \
     deleted_at, created_at, updated_at";

/// Provides CRUD operations for workspaces.
pub struct WorkspaceRepo;

impl WorkspaceRepo {
    /// Insert a new workspace owned by `owner_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        input: &CreateWorkspace,
    ) -> Result<Workspace, sqlx::Error> {
        let query = format!(
            "INSERT INTO workspaces (name, description, owner_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workspace>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Find a workspace by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Workspace>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM workspaces WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Workspace>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List workspaces owned by `owner_id`, newest first. Excludes soft-deleted rows.
    pub async fn list_by_owner(pool: &PgPool, owner_id: DbId) -> Result<Vec<Workspace>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM workspaces \
             WHERE owner_id = $1 AND deleted_at IS NULL \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Workspace>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Update a workspace. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateWorkspace,
    ) -> Result<Option<Workspace>, sqlx::Error> {
        let query = format!(
            "UPDATE workspaces SET
                name = COALESCE($2, name),
                description = COALESCE($3, description)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Workspace>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a workspace by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE workspaces SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Bump and return the next initiative sequence number for a workspace.
    ///
    /// The returned value is the number to embed in the human identifier
    /// (`I-<n>`). Sequence values are never reused, even after deletes.
    pub async fn next_initiative_seq(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "UPDATE workspaces SET initiative_seq = initiative_seq + 1 \
             WHERE id = $1 RETURNING initiative_seq",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    /// Bump and return the next task sequence number for a workspace.
    pub async fn next_task_seq(pool: &PgPool, id: DbId) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "UPDATE workspaces SET task_seq = task_seq + 1 \
             WHERE id = $1 RETURNING task_seq",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }
}
