//! Repository for the `tasks` and `checklist_items` tables.

use loopline_core::types::DbId;
use sqlx::PgPool;

use crate::models::status::{StatusId, WorkflowStatus};
use crate::models::task::{ChecklistEntry, ChecklistItem, CreateTask, Task, UpdateTask};
use crate::repositories::{escape_like, WorkspaceRepo};

/// Column list shared across task queries.
const COLUMNS: &str = "id, initiative_id, workspace_id, identifier, title, description, \
     status_id, user_id, ai_pending, deleted_at, created_at, updated_at";

/// Column list for checklist item queries.
const CHECKLIST_COLUMNS: &str =
    "id, task_id, title, is_complete, sort_order, created_at, updated_at";

/// Provides CRUD operations for tasks and their checklists.
pub struct TaskRepo;

impl TaskRepo {
    /// Insert a new task under an initiative, minting its `T-<n>` identifier
    /// from the workspace counter. Returns the created row.
    ///
    /// If `status_id` is `None` in the input, defaults to Backlog.
    pub async fn create(
        pool: &PgPool,
        initiative_id: DbId,
        workspace_id: DbId,
        user_id: DbId,
        input: &CreateTask,
    ) -> Result<Task, sqlx::Error> {
        let seq = WorkspaceRepo::next_task_seq(pool, workspace_id).await?;
        let identifier = format!("T-{seq:03}");

        let query = format!(
            "INSERT INTO tasks \
                 (initiative_id, workspace_id, identifier, title, description, status_id, user_id)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, $7), $8)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(initiative_id)
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

    /// Find a task by its internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List an initiative's tasks, newest first, with optional status
    /// filter. Excludes soft-deleted rows.
    pub async fn list_by_initiative(
        pool: &PgPool,
        initiative_id: DbId,
        status_id: Option<StatusId>,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks \
             WHERE initiative_id = $1 \
               AND deleted_at IS NULL \
               AND ($2::smallint IS NULL OR status_id = $2) \
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(initiative_id)
            .bind(status_id)
            .fetch_all(pool)
            .await
    }

    /// Update a task. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no live row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                status_id = COALESCE($4, status_id)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.status_id)
            .fetch_optional(pool)
            .await
    }

    /// Soft-delete a task by ID. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted task. Returns `true` if a row was restored.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tasks SET deleted_at = NULL WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a task by ID. Returns `true` if a row was removed.
    /// Checklist items cascade at the database level.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Set or clear the `ai_pending` flag on a set of tasks.
    pub async fn set_ai_pending(
        pool: &PgPool,
        ids: &[DbId],
        pending: bool,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE tasks SET ai_pending = $2 WHERE id = ANY($1)")
            .bind(ids)
            .bind(pending)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// List a task's checklist items in sort order.
    pub async fn list_checklist(
        pool: &PgPool,
        task_id: DbId,
    ) -> Result<Vec<ChecklistItem>, sqlx::Error> {
        let query = format!(
            "SELECT {CHECKLIST_COLUMNS} FROM checklist_items \
             WHERE task_id = $1 ORDER BY sort_order ASC"
        );
        sqlx::query_as::<_, ChecklistItem>(&query)
            .bind(task_id)
            .fetch_all(pool)
            .await
    }

    /// Replace a task's checklist wholesale. Submission order becomes
    /// `sort_order`. Runs in a transaction so readers never observe a
    /// half-replaced list.
    pub async fn replace_checklist(
        pool: &PgPool,
        task_id: DbId,
        entries: &[ChecklistEntry],
    ) -> Result<Vec<ChecklistItem>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM checklist_items WHERE task_id = $1")
            .bind(task_id)
            .execute(&mut *tx)
            .await?;

        for (idx, entry) in entries.iter().enumerate() {
            sqlx::query(
                "INSERT INTO checklist_items (task_id, title, is_complete, sort_order) \
                 VALUES ($1, $2, $3, $4)",
            )
            .bind(task_id)
            .bind(&entry.title)
            .bind(entry.is_complete)
            .bind(idx as i32)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Self::list_checklist(pool, task_id).await
    }

    /// Case-insensitive substring search over titles and descriptions
    /// within a workspace. Used by the MCP `search_workspace` tool.
    pub async fn search(
        pool: &PgPool,
        workspace_id: DbId,
        needle: &str,
        limit: i64,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks \
             WHERE workspace_id = $1 \
               AND deleted_at IS NULL \
               AND (title ILIKE $2 OR description ILIKE $2) \
             ORDER BY created_at DESC \
             LIMIT $3"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(workspace_id)
            .bind(format!("%{}%", escape_like(needle)))
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
