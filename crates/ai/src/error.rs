//! Error type and failure classification for the AI subsystem.
//!
//! The `kind()` string is persisted in `ai_improvement_jobs.error_kind`
//! when a job fails, so keep the values stable.

#[derive(Debug, thiserror::Error)]
pub enum AiError {
    /// Provider returned HTTP 429.
    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    /// Request timed out, including after retries.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Provider returned 5xx; retryable.
    #[error("Provider unavailable: {0}")]
    Unavailable(String),

    /// Provider returned a non-retryable error (4xx other than 429, or a
    /// transport failure).
    #[error("Provider error: {0}")]
    Provider(String),

    /// The model's output did not parse or validate against the expected
    /// schema.
    #[error("Invalid model response: {0}")]
    InvalidResponse(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AiError {
    /// Stable classification tag recorded on failed jobs.
    pub fn kind(&self) -> &'static str {
        match self {
            AiError::RateLimited(_) => "rate_limited",
            AiError::Timeout(_) => "timeout",
            AiError::Unavailable(_) | AiError::Provider(_) => "provider",
            AiError::InvalidResponse(_) => "invalid_response",
            AiError::Internal(_) => "internal",
        }
    }

    /// Whether the client should retry the request.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AiError::RateLimited(_) | AiError::Timeout(_) | AiError::Unavailable(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_stable() {
        assert_eq!(AiError::RateLimited("x".into()).kind(), "rate_limited");
        assert_eq!(AiError::Timeout("x".into()).kind(), "timeout");
        assert_eq!(AiError::Unavailable("x".into()).kind(), "provider");
        assert_eq!(AiError::Provider("x".into()).kind(), "provider");
        assert_eq!(AiError::InvalidResponse("x".into()).kind(), "invalid_response");
        assert_eq!(AiError::Internal("x".into()).kind(), "internal");
    }

    #[test]
    fn transient_errors_are_the_retryable_ones() {
        assert!(AiError::RateLimited("x".into()).is_transient());
        assert!(AiError::Timeout("x".into()).is_transient());
        assert!(AiError::Unavailable("x".into()).is_transient());
        assert!(!AiError::Provider("x".into()).is_transient());
        assert!(!AiError::InvalidResponse("x".into()).is_transient());
    }
}
