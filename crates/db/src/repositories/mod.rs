pub mod ai_job_repo;
pub mod billing_repo;
pub mod initiative_repo;
pub mod task_repo;
pub mod user_repo;
pub mod workspace_repo;

/// Escape `\`, `%`, and `_` so a search needle matches literally inside
/// an ILIKE pattern.
pub(crate) fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

pub use ai_job_repo::AiJobRepo;
pub use billing_repo::BillingRepo;
pub use initiative_repo::InitiativeRepo;
pub use task_repo::TaskRepo;
pub use user_repo::UserRepo;
pub use workspace_repo::WorkspaceRepo;
