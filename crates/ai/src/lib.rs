//! LLM agent subsystem: chat-completion client, prompt rendering for the
//! four prompt classes, typed response schemas, and the dispatch service.

pub mod client;
pub mod dispatch;
pub mod error;
pub mod prompts;
pub mod schemas;

pub use client::{ChatClient, ChatCompletion, ChatConfig, ChatMessage, ChatProvider, ChatUsage};
pub use dispatch::{AiOutcome, AiService, JobInput};
pub use error::AiError;
