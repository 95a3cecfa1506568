//! MCP server exposing Loopline planning entities as agent tools.
//!
//! Runs over stdio and talks straight to the database through the shared
//! repositories. Tool output is plain text formatted for an LLM reader,
//! not the JSON bodies the HTTP API returns.

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router,
    ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;

use loopline_core::types::DbId;
use loopline_db::models::initiative::{CreateInitiative, UpdateInitiative};
use loopline_db::models::status::WorkflowStatus;
use loopline_db::models::task::{CreateTask, UpdateTask};
use loopline_db::repositories::{InitiativeRepo, TaskRepo, WorkspaceRepo};
use loopline_db::DbPool;

pub mod summary;

use summary::{format_initiative, format_task};

/// Default result cap for the search tool.
const DEFAULT_SEARCH_LIMIT: i64 = 20;

// ---------------------------------------------------------------------------
// Tool parameter structs
// ---------------------------------------------------------------------------

#[derive(Deserialize, JsonSchema)]
pub struct ListInitiativesRequest {
    /// Workspace to list initiatives from
    pub workspace_id: DbId,
    /// Optional workflow status filter (backlog, to_do, in_progress, done, blocked, archived)
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
pub struct GetInitiativeRequest {
    /// Initiative id
    pub id: DbId,
}

#[derive(Deserialize, JsonSchema)]
pub struct CreateInitiativeRequest {
    /// Workspace the initiative belongs to
    pub workspace_id: DbId,
    /// Acting user id (the agent operates on behalf of this user)
    pub user_id: DbId,
    /// Initiative title
    pub title: String,
    /// Optional longer description
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
pub struct UpdateInitiativeRequest {
    /// Initiative id
    pub id: DbId,
    /// New title
    #[serde(default)]
    pub title: Option<String>,
    /// New description
    #[serde(default)]
    pub description: Option<String>,
    /// New workflow status (backlog, to_do, in_progress, done, blocked, archived)
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
pub struct DeleteInitiativeRequest {
    /// Initiative id
    pub id: DbId,
}

#[derive(Deserialize, JsonSchema)]
pub struct ListTasksRequest {
    /// Initiative to list tasks from
    pub initiative_id: DbId,
    /// Optional workflow status filter (backlog, to_do, in_progress, done, blocked, archived)
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
pub struct CreateTaskRequest {
    /// Initiative the task belongs to
    pub initiative_id: DbId,
    /// Acting user id (the agent operates on behalf of this user)
    pub user_id: DbId,
    /// Task title
    pub title: String,
    /// Optional longer description
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
pub struct UpdateTaskRequest {
    /// Task id
    pub id: DbId,
    /// New title
    #[serde(default)]
    pub title: Option<String>,
    /// New description
    #[serde(default)]
    pub description: Option<String>,
    /// New workflow status (backlog, to_do, in_progress, done, blocked, archived)
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize, JsonSchema)]
pub struct SearchWorkspaceRequest {
    /// Workspace to search
    pub workspace_id: DbId,
    /// Case-insensitive substring to match against titles and descriptions
    pub query: String,
    /// Maximum number of results per entity kind (default 20)
    #[serde(default)]
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// MCP server handing agents CRUD and search over planning entities.
#[derive(Clone)]
pub struct LooplineMcpServer {
    pool: DbPool,
    tool_router: ToolRouter<Self>,
}

/// Parse an optional status name, mapping unknown names to an MCP error.
fn parse_status(status: &Option<String>) -> Result<Option<WorkflowStatus>, McpError> {
    match status {
        None => Ok(None),
        Some(name) => WorkflowStatus::parse_name(name).map(Some).ok_or_else(|| {
            McpError::invalid_params(
                format!(
                    "Unknown status '{name}'. Valid: backlog, to_do, in_progress, done, \
                     blocked, archived"
                ),
                None,
            )
        }),
    }
}

/// Map a database error to an MCP internal error.
fn db_error(e: sqlx::Error) -> McpError {
    McpError::internal_error(format!("Database error: {e}"), None)
}

#[tool_router]
impl LooplineMcpServer {
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "List the initiatives in a workspace, optionally filtered by status")]
    async fn list_initiatives(
        &self,
        params: Parameters<ListInitiativesRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let status = parse_status(&req.status)?;
        let initiatives =
            InitiativeRepo::list_by_workspace(&self.pool, req.workspace_id, status.map(|s| s.id()))
                .await
                .map_err(db_error)?;

        let content = if initiatives.is_empty() {
            "No initiatives found.".to_string()
        } else {
            initiatives
                .iter()
                .map(format_initiative)
                .collect::<Vec<_>>()
                .join("\n")
        };
        Ok(CallToolResult::success(vec![Content::text(content)]))
    }

    #[tool(description = "Get one initiative by id, including its tasks")]
    async fn get_initiative(
        &self,
        params: Parameters<GetInitiativeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let initiative = InitiativeRepo::find_by_id(&self.pool, req.id)
            .await
            .map_err(db_error)?
            .ok_or_else(|| {
                McpError::invalid_params(format!("Initiative {} not found", req.id), None)
            })?;

        let tasks = TaskRepo::list_by_initiative(&self.pool, initiative.id, None)
            .await
            .map_err(db_error)?;

        let mut content = format_initiative(&initiative);
        if tasks.is_empty() {
            content.push_str("\nTasks: none");
        } else {
            content.push_str("\nTasks:\n");
            content.push_str(
                &tasks
                    .iter()
                    .map(|t| format!("  {}", format_task(t)))
                    .collect::<Vec<_>>()
                    .join("\n"),
            );
        }
        Ok(CallToolResult::success(vec![Content::text(content)]))
    }

    #[tool(description = "Create a new initiative in a workspace")]
    async fn create_initiative(
        &self,
        params: Parameters<CreateInitiativeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        if req.title.trim().is_empty() {
            return Err(McpError::invalid_params("Title must not be empty", None));
        }
        WorkspaceRepo::find_by_id(&self.pool, req.workspace_id)
            .await
            .map_err(db_error)?
            .ok_or_else(|| {
                McpError::invalid_params(format!("Workspace {} not found", req.workspace_id), None)
            })?;

        let initiative = InitiativeRepo::create(
            &self.pool,
            req.workspace_id,
            req.user_id,
            &CreateInitiative {
                title: req.title,
                description: req.description,
                status_id: None,
            },
        )
        .await
        .map_err(db_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Created initiative:\n{}",
            format_initiative(&initiative)
        ))]))
    }

    #[tool(description = "Update an initiative's title, description, or status")]
    async fn update_initiative(
        &self,
        params: Parameters<UpdateInitiativeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        if req.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(McpError::invalid_params("Title must not be empty", None));
        }
        let status = parse_status(&req.status)?;
        let initiative = InitiativeRepo::update(
            &self.pool,
            req.id,
            &UpdateInitiative {
                title: req.title,
                description: req.description,
                status_id: status.map(|s| s.id()),
            },
        )
        .await
        .map_err(db_error)?
        .ok_or_else(|| McpError::invalid_params(format!("Initiative {} not found", req.id), None))?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Updated initiative:\n{}",
            format_initiative(&initiative)
        ))]))
    }

    #[tool(description = "Soft-delete an initiative (it can be restored via the API)")]
    async fn delete_initiative(
        &self,
        params: Parameters<DeleteInitiativeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let deleted = InitiativeRepo::soft_delete(&self.pool, req.id)
            .await
            .map_err(db_error)?;
        if !deleted {
            return Err(McpError::invalid_params(
                format!("Initiative {} not found", req.id),
                None,
            ));
        }
        Ok(CallToolResult::success(vec![Content::text(format!(
            "Deleted initiative {}",
            req.id
        ))]))
    }

    #[tool(description = "List the tasks under an initiative, optionally filtered by status")]
    async fn list_tasks(
        &self,
        params: Parameters<ListTasksRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let status = parse_status(&req.status)?;
        let tasks =
            TaskRepo::list_by_initiative(&self.pool, req.initiative_id, status.map(|s| s.id()))
                .await
                .map_err(db_error)?;

        let content = if tasks.is_empty() {
            "No tasks found.".to_string()
        } else {
            tasks.iter().map(format_task).collect::<Vec<_>>().join("\n")
        };
        Ok(CallToolResult::success(vec![Content::text(content)]))
    }

    #[tool(description = "Create a new task under an initiative")]
    async fn create_task(
        &self,
        params: Parameters<CreateTaskRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        if req.title.trim().is_empty() {
            return Err(McpError::invalid_params("Title must not be empty", None));
        }
        let initiative = InitiativeRepo::find_by_id(&self.pool, req.initiative_id)
            .await
            .map_err(db_error)?
            .ok_or_else(|| {
                McpError::invalid_params(
                    format!("Initiative {} not found", req.initiative_id),
                    None,
                )
            })?;

        let task = TaskRepo::create(
            &self.pool,
            initiative.id,
            initiative.workspace_id,
            req.user_id,
            &CreateTask {
                title: req.title,
                description: req.description,
                status_id: None,
            },
        )
        .await
        .map_err(db_error)?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Created task:\n{}",
            format_task(&task)
        ))]))
    }

    #[tool(description = "Update a task's title, description, or status")]
    async fn update_task(
        &self,
        params: Parameters<UpdateTaskRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        if req.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(McpError::invalid_params("Title must not be empty", None));
        }
        let status = parse_status(&req.status)?;
        let task = TaskRepo::update(
            &self.pool,
            req.id,
            &UpdateTask {
                title: req.title,
                description: req.description,
                status_id: status.map(|s| s.id()),
            },
        )
        .await
        .map_err(db_error)?
        .ok_or_else(|| McpError::invalid_params(format!("Task {} not found", req.id), None))?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Updated task:\n{}",
            format_task(&task)
        ))]))
    }

    #[tool(
        description = "Search a workspace's initiatives and tasks by title/description substring"
    )]
    async fn search_workspace(
        &self,
        params: Parameters<SearchWorkspaceRequest>,
    ) -> Result<CallToolResult, McpError> {
        let req = params.0;
        let needle = req.query.trim();
        if needle.is_empty() {
            return Err(McpError::invalid_params("Query must not be empty", None));
        }
        let limit = req.limit.unwrap_or(DEFAULT_SEARCH_LIMIT).clamp(1, 100);

        let initiatives = InitiativeRepo::search(&self.pool, req.workspace_id, needle, limit)
            .await
            .map_err(db_error)?;
        let tasks = TaskRepo::search(&self.pool, req.workspace_id, needle, limit)
            .await
            .map_err(db_error)?;

        let mut sections = Vec::new();
        if !initiatives.is_empty() {
            sections.push(format!(
                "Initiatives:\n{}",
                initiatives
                    .iter()
                    .map(format_initiative)
                    .collect::<Vec<_>>()
                    .join("\n")
            ));
        }
        if !tasks.is_empty() {
            sections.push(format!(
                "Tasks:\n{}",
                tasks.iter().map(format_task).collect::<Vec<_>>().join("\n")
            ));
        }
        let content = if sections.is_empty() {
            format!("No matches for '{needle}'.")
        } else {
            sections.join("\n\n")
        };
        Ok(CallToolResult::success(vec![Content::text(content)]))
    }
}

#[tool_handler]
impl ServerHandler for LooplineMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Loopline planning server. Workspaces contain initiatives (I-xxx) which \
                 contain tasks (T-xxx). Use list_initiatives/list_tasks to orient yourself \
                 before writing; create_* and update_* tools validate titles and statuses \
                 and return the stored entity so you can confirm the result. Deletes are \
                 soft and reversible through the HTTP API. Valid workflow statuses: \
                 backlog, to_do, in_progress, done, blocked, archived."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
