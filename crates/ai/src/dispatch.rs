//! `AiService`: routes a job to one of the four prompt classes, calls the
//! provider, validates the response, and prices the call.

use std::sync::Arc;

use loopline_core::ai::{ChatMode, Lens};
use loopline_core::pricing::{self, EstimatedCost};
use serde::{Deserialize, Serialize};

use crate::client::{ChatMessage, ChatProvider};
use crate::error::AiError;
use crate::prompts;
use crate::schemas;

/// One turn of the chat thread submitted with a job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadMessage {
    pub role: String,
    pub content: String,
}

/// Deserialized `input_data` of an AI improvement job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobInput {
    /// Snapshot of the entities in scope, as the submitting client saw them.
    #[serde(default)]
    pub entities: serde_json::Value,
    /// The chat thread so far, oldest first.
    #[serde(default)]
    pub thread: Vec<ThreadMessage>,
}

/// Result of a dispatched call: the validated payload to persist plus the
/// priced usage.
#[derive(Debug, Clone)]
pub struct AiOutcome {
    pub result: serde_json::Value,
    pub cost: EstimatedCost,
}

/// Routes requests to the four prompt classes and enforces their response
/// contracts.
pub struct AiService {
    provider: Arc<dyn ChatProvider>,
}

impl AiService {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    /// Run one request end to end: render, call, validate, price.
    pub async fn respond(
        &self,
        lens: Lens,
        mode: ChatMode,
        input: &JobInput,
    ) -> Result<AiOutcome, AiError> {
        let messages = prompts::render(lens, mode, input);
        let completion = self.provider.complete(&messages).await?;

        let result = match mode {
            ChatMode::Edit => {
                let allow_checklist = lens == Lens::Tasks;
                let parsed = schemas::parse_edit_response(&completion.content, allow_checklist)?;
                serde_json::to_value(&parsed)
                    .map_err(|e| AiError::Internal(format!("Result serialization failed: {e}")))?
            }
            ChatMode::Discuss => {
                let parsed = schemas::parse_discuss_response(&completion.content)?;
                serde_json::to_value(&parsed)
                    .map_err(|e| AiError::Internal(format!("Result serialization failed: {e}")))?
            }
        };

        let model = self.provider.model();
        let cost = match completion.usage {
            Some(usage) => {
                pricing::cost_for_usage(model, usage.prompt_tokens, usage.completion_tokens)
            }
            None => {
                // No usage block from the provider; fall back to the
                // chars/4 heuristic over the rendered prompt and reply.
                let prompt_text: String = messages
                    .iter()
                    .map(|m| m.content.as_str())
                    .collect::<Vec<_>>()
                    .join("\n");
                pricing::cost_for_text(model, &prompt_text, &completion.content)
            }
        };

        tracing::debug!(
            lens = lens.as_str(),
            mode = mode.as_str(),
            input_tokens = cost.input_tokens,
            output_tokens = cost.output_tokens,
            cost_microdollars = cost.total_microdollars,
            "AI dispatch complete",
        );

        Ok(AiOutcome { result, cost })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{ChatCompletion, ChatUsage};
    use assert_matches::assert_matches;
    use async_trait::async_trait;
    use serde_json::json;

    /// Stub provider returning a canned reply.
    struct StubProvider {
        reply: String,
        usage: Option<ChatUsage>,
    }

    #[async_trait]
    impl ChatProvider for StubProvider {
        async fn complete(&self, _messages: &[ChatMessage]) -> Result<ChatCompletion, AiError> {
            Ok(ChatCompletion {
                content: self.reply.clone(),
                usage: self.usage,
            })
        }

        fn model(&self) -> &str {
            "gpt-4o-mini"
        }
    }

    fn service(reply: &str, usage: Option<ChatUsage>) -> AiService {
        AiService::new(Arc::new(StubProvider {
            reply: reply.to_string(),
            usage,
        }))
    }

    fn input() -> JobInput {
        JobInput {
            entities: json!([{ "id": 3, "title": "Q3 roadmap" }]),
            thread: vec![],
        }
    }

    #[tokio::test]
    async fn edit_mode_returns_validated_operations() {
        let svc = service(
            r#"{ "message": "ok", "operations": [ { "op": "delete", "id": 3 } ] }"#,
            Some(ChatUsage {
                prompt_tokens: 100,
                completion_tokens: 20,
            }),
        );

        let outcome = svc
            .respond(Lens::Initiatives, ChatMode::Edit, &input())
            .await
            .unwrap();
        assert_eq!(outcome.result["operations"][0]["op"], "delete");
        assert_eq!(outcome.cost.input_tokens, 100);
        assert!(outcome.cost.total_microdollars > 0);
    }

    #[tokio::test]
    async fn edit_mode_rejects_malformed_output() {
        let svc = service("I would suggest deleting initiative 3.", None);
        let err = svc
            .respond(Lens::Initiatives, ChatMode::Edit, &input())
            .await
            .unwrap_err();
        assert_matches!(err, AiError::InvalidResponse(_));
    }

    #[tokio::test]
    async fn discuss_mode_wraps_prose() {
        let svc = service("Focus on the onboarding flow first.", None);
        let outcome = svc
            .respond(Lens::Tasks, ChatMode::Discuss, &input())
            .await
            .unwrap();
        assert_eq!(
            outcome.result["message"],
            "Focus on the onboarding flow first."
        );
        // Heuristic pricing kicks in when the provider reports no usage.
        assert!(outcome.cost.input_tokens > 0);
    }
}
