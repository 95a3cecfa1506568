//! Typed schemas for model output, and strict parsing helpers.
//!
//! Edit-mode responses must be a JSON object with a `message` and a list of
//! entity operations; discuss-mode responses carry prose only. Anything the
//! model returns that does not fit is an `InvalidResponse` error, never a
//! panic.

use serde::{Deserialize, Serialize};

use crate::error::AiError;

/// One proposed change to a planning entity.
///
/// `checklist` is only meaningful under the tasks lens; the initiatives
/// prompt instructs the model to omit it, and validation rejects it there.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EntityOperation {
    Create {
        title: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        checklist: Option<Vec<ChecklistDraft>>,
    },
    Update {
        id: i64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        checklist: Option<Vec<ChecklistDraft>>,
    },
    Delete {
        id: i64,
    },
}

impl EntityOperation {
    fn has_checklist(&self) -> bool {
        match self {
            EntityOperation::Create { checklist, .. }
            | EntityOperation::Update { checklist, .. } => checklist.is_some(),
            EntityOperation::Delete { .. } => false,
        }
    }
}

/// Checklist entry proposed by the model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChecklistDraft {
    pub title: String,
    #[serde(default)]
    pub is_complete: bool,
}

/// Edit-mode contract: a summary message plus the operation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditResponse {
    pub message: String,
    pub operations: Vec<EntityOperation>,
}

/// Discuss-mode contract: advisory prose, no entity changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscussResponse {
    pub message: String,
}

/// Strip a Markdown code fence if the model wrapped its JSON in one.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop an optional language tag on the opening fence line.
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    rest.trim_start_matches('\n')
        .strip_suffix("```")
        .map(str::trim)
        .unwrap_or(trimmed)
}

/// Parse and validate an edit-mode response.
///
/// `allow_checklist` is true under the tasks lens only.
pub fn parse_edit_response(raw: &str, allow_checklist: bool) -> Result<EditResponse, AiError> {
    let parsed: EditResponse = serde_json::from_str(strip_code_fence(raw))
        .map_err(|e| AiError::InvalidResponse(format!("Edit response did not parse: {e}")))?;

    if !allow_checklist {
        if let Some(op) = parsed.operations.iter().find(|op| op.has_checklist()) {
            return Err(AiError::InvalidResponse(format!(
                "Checklist payload is not valid for the initiatives lens: {op:?}"
            )));
        }
    }

    for op in &parsed.operations {
        if let EntityOperation::Create { title, .. } = op {
            if title.trim().is_empty() {
                return Err(AiError::InvalidResponse(
                    "Create operation with empty title".into(),
                ));
            }
        }
    }

    Ok(parsed)
}

/// Parse a discuss-mode response. Accepts either the JSON contract or, as a
/// fallback, bare prose (some models ignore the JSON instruction in
/// discuss mode, and prose is all the contract carries anyway).
pub fn parse_discuss_response(raw: &str) -> Result<DiscussResponse, AiError> {
    let cleaned = strip_code_fence(raw);
    if let Ok(parsed) = serde_json::from_str::<DiscussResponse>(cleaned) {
        return Ok(parsed);
    }
    let message = cleaned.trim();
    if message.is_empty() {
        return Err(AiError::InvalidResponse("Empty discuss response".into()));
    }
    Ok(DiscussResponse {
        message: message.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_well_formed_edit_response() {
        let raw = r#"{
            "message": "Split the initiative",
            "operations": [
                { "op": "create", "title": "Phase 1" },
                { "op": "update", "id": 7, "status": "in_progress" },
                { "op": "delete", "id": 9 }
            ]
        }"#;
        let parsed = parse_edit_response(raw, false).unwrap();
        assert_eq!(parsed.operations.len(), 3);
        assert_matches!(&parsed.operations[0], EntityOperation::Create { title, .. } if title == "Phase 1");
        assert_matches!(&parsed.operations[2], EntityOperation::Delete { id: 9 });
    }

    #[test]
    fn strips_markdown_fences() {
        let raw = "```json\n{ \"message\": \"ok\", \"operations\": [] }\n```";
        let parsed = parse_edit_response(raw, true).unwrap();
        assert_eq!(parsed.message, "ok");
    }

    #[test]
    fn rejects_checklist_under_initiatives_lens() {
        let raw = r#"{
            "message": "x",
            "operations": [
                { "op": "update", "id": 1, "checklist": [ { "title": "A" } ] }
            ]
        }"#;
        assert!(parse_edit_response(raw, true).is_ok());
        assert_matches!(
            parse_edit_response(raw, false),
            Err(AiError::InvalidResponse(_))
        );
    }

    #[test]
    fn rejects_empty_create_title() {
        let raw = r#"{ "message": "x", "operations": [ { "op": "create", "title": "  " } ] }"#;
        assert_matches!(
            parse_edit_response(raw, true),
            Err(AiError::InvalidResponse(_))
        );
    }

    #[test]
    fn rejects_non_json_edit_output() {
        assert_matches!(
            parse_edit_response("Sure! Here's what I'd do:", true),
            Err(AiError::InvalidResponse(_))
        );
    }

    #[test]
    fn discuss_accepts_json_and_bare_prose() {
        let parsed = parse_discuss_response(r#"{ "message": "Consider splitting." }"#).unwrap();
        assert_eq!(parsed.message, "Consider splitting.");

        let parsed = parse_discuss_response("Consider splitting.").unwrap();
        assert_eq!(parsed.message, "Consider splitting.");

        assert_matches!(
            parse_discuss_response("   "),
            Err(AiError::InvalidResponse(_))
        );
    }

    #[test]
    fn unknown_op_tag_is_invalid() {
        let raw = r#"{ "message": "x", "operations": [ { "op": "merge", "id": 1 } ] }"#;
        assert_matches!(
            parse_edit_response(raw, true),
            Err(AiError::InvalidResponse(_))
        );
    }
}
