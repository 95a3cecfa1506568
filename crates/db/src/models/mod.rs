pub mod ai_job;
pub mod billing;
pub mod initiative;
pub mod status;
pub mod task;
pub mod user;
pub mod workspace;
