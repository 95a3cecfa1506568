//! Prompt rendering for the four prompt classes.
//!
//! Each (lens, mode) pair gets a system prompt stating the contract and a
//! user message carrying entity snapshots plus the chat thread. Edit-mode
//! prompts pin the exact JSON schema the parser in `schemas` expects.

use loopline_core::ai::{ChatMode, Lens};

use crate::client::ChatMessage;
use crate::dispatch::JobInput;

/// Shared JSON contract for edit mode, minus the lens-specific notes.
const EDIT_CONTRACT: &str = r#"Respond with a single JSON object and nothing else:
{
  "message": "<one-paragraph summary of what you changed and why>",
  "operations": [
    { "op": "create", "title": "...", "description": "..." },
    { "op": "update", "id": <existing id>, "title": "...", "description": "...", "status": "..." },
    { "op": "delete", "id": <existing id> }
  ]
}
Valid status values: backlog, to_do, in_progress, done, blocked, archived.
Only reference ids that appear in the snapshot. Do not invent ids."#;

fn system_prompt(lens: Lens, mode: ChatMode) -> String {
    let entity = match lens {
        Lens::Initiatives => "initiatives (units of planned work)",
        Lens::Tasks => "tasks (sub-steps of an initiative, each with an optional checklist)",
    };

    match mode {
        ChatMode::Edit => {
            let checklist_note = match lens {
                Lens::Initiatives => "Never include a \"checklist\" field; initiatives have none.",
                Lens::Tasks => {
                    "A create or update operation may include \"checklist\": \
                     [ { \"title\": \"...\", \"is_complete\": false } ] to replace \
                     the task's checklist wholesale."
                }
            };
            format!(
                "You are a planning assistant for a product-management tool. \
                 You are editing {entity} on the user's behalf.\n\n\
                 {EDIT_CONTRACT}\n{checklist_note}"
            )
        }
        ChatMode::Discuss => format!(
            "You are a planning assistant for a product-management tool. \
             The user wants to discuss their {entity}. Give concrete, specific \
             advice grounded in the snapshot provided. Do NOT propose structured \
             edits and do NOT output JSON; reply in plain prose."
        ),
    }
}

/// Render the full message list for one LLM call.
pub fn render(lens: Lens, mode: ChatMode, input: &JobInput) -> Vec<ChatMessage> {
    let mut messages = vec![ChatMessage::system(system_prompt(lens, mode))];

    let snapshot = serde_json::to_string_pretty(&input.entities).unwrap_or_default();
    messages.push(ChatMessage::user(format!(
        "Current {} snapshot:\n{snapshot}",
        lens.as_str()
    )));

    for turn in &input.thread {
        messages.push(ChatMessage {
            role: turn.role.clone(),
            content: turn.content.clone(),
        });
    }

    messages
}
