//! LLM client: the single point of entry for all model calls in the service.
//!
//! ARCHITECTURAL RULE: No other module may talk to a vendor API directly.
//! Route handlers and business operations go through `LlmClient`, which wraps
//! one `ChatProvider` adapter (OpenAI or Anthropic) and normalizes its output.
use thiserror::Error;

pub mod anthropic;
pub mod openai;
pub mod orchestrator;
pub mod parser;
pub mod pricing;
pub mod prompts;
pub mod provider;
#[cfg(test)]
pub mod testing;
pub mod types;

pub use orchestrator::{LlmClient, LlmRouter};
pub use pricing::openai_models;
pub use types::{context_sizes, temperatures, CallOptions, NormalizedResponse, ToolDefinition};

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        kind: Option<String>,
        message: String,
    },

    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: f64 },

    #[error("No content generated")]
    EmptyContent,

    #[error("No function arguments in tool call")]
    MissingToolArguments,

    #[error("JSON parse error: {0}")]
    Parse(String),

    #[error("Failed to complete response even with continuation: {0}")]
    Continuation(String),

    #[error("Invalid response shape: {0}")]
    InvalidShape(String),

    #[error("No provider configured for model '{0}'")]
    ProviderNotConfigured(String),
}

impl LlmError {
    /// Vendor HTTP status, when the failure came from the vendor.
    pub fn status(&self) -> Option<u16> {
        match self {
            LlmError::Api { status, .. } => Some(*status),
            LlmError::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status() == Some(429)
    }

    /// 5xx or Anthropic's 529 "overloaded".
    pub fn is_unavailable(&self) -> bool {
        matches!(self.status(), Some(s) if s >= 500)
            || matches!(self, LlmError::Api { kind: Some(k), .. } if k == "overloaded_error")
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status(), Some(401) | Some(403))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, kind: Option<&str>) -> LlmError {
        LlmError::Api {
            status,
            code: None,
            kind: kind.map(String::from),
            message: "boom".to_string(),
        }
    }

    #[test]
    fn test_timeout_message_includes_seconds() {
        let err = LlmError::Timeout { seconds: 240.0 };
        assert_eq!(err.to_string(), "Request timed out after 240 seconds");
    }

    #[test]
    fn test_classification() {
        assert!(api(429, None).is_rate_limited());
        assert!(api(529, Some("overloaded_error")).is_unavailable());
        assert!(api(503, None).is_unavailable());
        assert!(api(401, None).is_auth_failure());
        assert!(!api(400, None).is_unavailable());
        assert_eq!(LlmError::EmptyContent.status(), None);
    }
}
