//! Repository for the `initiatives` table.

use loopline_core::types::DbId;
use sqlx::PgPool;

use crate::models::initiative::{CreateInitiative, Initiative, UpdateInitiative};
use crate::models::status::{StatusId, WorkflowStatus};
use crate::repositories::{escape_like, WorkspaceRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, workspace_id, identifier, title, description, status_id, \
     user_id, ai_pending, deleted_at, created_at, updated_at";

/// Provides CRUD operations for initiatives.
pub struct InitiativeRepo;

impl InitiativeRepo {
    /// Insert a new initiative, minting its `I-<n>` identifier from the
    /// workspace counter. Returns the created row.
    ///
    /// If `status_id` is `None` in the input, defaults to Backlog.
    pub async fn create(
        pool: &PgPool,
        workspace_id: DbId,
        user_id: DbId,
        input: &CreateInitiative,
    ) -> Result<Initiative, sqlx::Error> {
        let seq = WorkspaceRepo::next_initiative_seq(pool, workspace_id).await?;
        let identifier = format!("I-{seq:03}");

        let query = format!(
            "INSERT INTO initiatives (workspace_id, identifier, title, description, status_id, user_id)
             VALUES ($1, $2, $3, $4, COALESCE($5, $6), $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Initiative>(&query)
            .bind(workspace_id)
            .bind(&identifier)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status_id)
            .bind(WorkflowStatus::Backlog.id())
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Find an initiative by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Initiative>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM initiatives WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Initiative>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an initiative by its internal ID, including soft-deleted rows.
    /// Used by the restore path, which must authorize before undeleting.
    pub async fn find_by_id_any(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<Initiative>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM initiatives WHERE id = $1");
        sqlx::query_as::<_, Initiative>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List a workspace's initiatives, newest first, with optional status
    /// filter. Excludes soft-deleted rows.
    pub async fn list_by_workspace(
        pool: &PgPool,
        workspace_id: DbId,
        status_id: Option<StatusId>,
    ) -> Result<Vec<Initiative>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM initiatives \
             WHERE workspace_id = $1 \
               AND deleted_at IS NULL \
               AND ($2::smallint IS NULL OR status_id = $2) \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Initiative>(&query)
            .bind(workspace_id)
            .bind(status_id)
            .fetch_all(pool)
            .await
    }

    /// Update an initiative. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateInitiative,
    ) -> Result<Option<Initiative>, sqlx::Error> {
        let query = format!(
            "UPDATE initiatives SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status_id = COALESCE($4, status_id)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Initiative>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status_id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete an initiative by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE initiatives SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted initiative. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE initiatives SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete an initiative by ID. Returns `true` if a row was removed.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM initiatives WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set or clear the `ai_pending` flag on a set of initiatives.
    pub async fn set_ai_pending(
        pool: &PgPool,
        ids: &[DbId],
        pending: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE initiatives SET ai_pending = $2 WHERE id = ANY($1)")
            .bind(ids)
            .bind(pending)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Case-insensitive substring search over titles and descriptions
    /// within a workspace. Used by the MCP `search_workspace` tool.
    pub async fn search(
        pool: &PgPool,
        workspace_id: DbId,
        needle: &str,
        limit: i64,
    ) -> Result<Vec<Initiative>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM initiatives \
             WHERE workspace_id = $1 \
               AND deleted_at IS NULL \
               AND (title ILIKE $2 OR description ILIKE $2) \
             ORDER BY created_at DESC \
             LIMIT $3"
        );
        sqlx::query_as::<_, Initiative>(&query)
            .bind(workspace_id)
            .bind(format!("%{}%", escape_like(needle)))
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
