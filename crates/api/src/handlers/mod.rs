//! HTTP request handlers, grouped by resource.

pub mod ai_jobs;
pub mod auth;
pub mod billing;
pub mod initiatives;
pub mod tasks;
pub mod workspaces;
