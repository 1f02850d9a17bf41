//! Request/response types shared by every provider adapter and the orchestrator.

use std::time::Duration;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use super::LlmError;

/// Token-budget presets.
pub mod context_sizes {
    pub const NORMAL: u32 = 4_000;
    pub const LARGE: u32 = 8_000;
}

/// Temperature presets.
pub mod temperatures {
    pub const LOW: f32 = 0.1;
    pub const NORMAL: f32 = 0.3;
}

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(240);

/// A tool (function) the model may be forced to call.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema of the arguments object.
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn new(name: &str, description: &str, parameters: Value) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolChoice {
    /// Force a call to the named tool.
    Tool(String),
}

/// Per-call options. `model: None` means "use the provider's default model".
#[derive(Debug, Clone)]
pub struct CallOptions {
    pub model: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
    pub system_prompt: Option<String>,
    pub enforce_json: bool,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: Option<ToolChoice>,
    pub retry_on_incomplete: bool,
    /// Substituted for the tool payload when it cannot be parsed even after repair.
    pub fallback: Option<Value>,
}

impl Default for CallOptions {
    fn default() -> Self {
        Self {
            model: None,
            max_tokens: context_sizes::NORMAL,
            temperature: temperatures::NORMAL,
            timeout: DEFAULT_TIMEOUT,
            system_prompt: None,
            enforce_json: false,
            tools: Vec::new(),
            tool_choice: None,
            retry_on_incomplete: true,
            fallback: None,
        }
    }
}

impl CallOptions {
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system_prompt = Some(system.into());
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn json(mut self) -> Self {
        self.enforce_json = true;
        self
    }

    /// Attaches `tool` and forces the model to call it.
    pub fn force_tool(mut self, tool: ToolDefinition) -> Self {
        self.tool_choice = Some(ToolChoice::Tool(tool.name.clone()));
        self.tools = vec![tool];
        self
    }

    pub fn with_fallback(mut self, fallback: Value) -> Self {
        self.fallback = Some(fallback);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One block of a multimodal user message.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Text(String),
    /// Base64-encoded image bytes.
    Image { media_type: String, data: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

impl MessageContent {
    /// Total characters of text carried by the message (images excluded).
    pub fn text_len(&self) -> usize {
        match self {
            MessageContent::Text(t) => t.len(),
            MessageContent::Parts(parts) => parts
                .iter()
                .map(|p| match p {
                    ContentPart::Text(t) => t.len(),
                    ContentPart::Image { .. } => 0,
                })
                .sum(),
        }
    }
}

impl From<&str> for MessageContent {
    fn from(value: &str) -> Self {
        MessageContent::Text(value.to_string())
    }
}

impl From<String> for MessageContent {
    fn from(value: String) -> Self {
        MessageContent::Text(value)
    }
}

impl From<Vec<ContentPart>> for MessageContent {
    fn from(value: Vec<ContentPart>) -> Self {
        MessageContent::Parts(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn user(content: impl Into<MessageContent>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: MessageContent::Text(text.into()),
        }
    }
}

/// Vendor-neutral request handed to a `ChatProvider`.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub model: String,
    pub system: Option<String>,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
    pub json_mode: bool,
    pub tools: Vec<ToolDefinition>,
    pub tool_choice: Option<ToolChoice>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageRecord {
    pub input_tokens: u32,
    pub output_tokens: u32,
    pub total_tokens: u32,
}

impl UsageRecord {
    pub fn new(input_tokens: u32, output_tokens: u32) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens.saturating_add(output_tokens),
        }
    }

    pub fn add(self, other: UsageRecord) -> Self {
        Self::new(
            self.input_tokens.saturating_add(other.input_tokens),
            self.output_tokens.saturating_add(other.output_tokens),
        )
    }
}

/// The two response shapes a vendor can produce, resolved once by the adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseContent {
    /// Structured payload from a tool/function call, as raw JSON text.
    ToolCall { name: String, arguments: String },
    Text(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    pub content: ResponseContent,
    pub usage: UsageRecord,
    pub finish_reason: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedResponse<T> {
    pub data: T,
    pub usage: UsageRecord,
    /// USD.
    pub cost: f64,
    pub processing_time_ms: u64,
    pub finish_reason: String,
    pub used_tool_call: bool,
    pub used_continuation: bool,
    pub used_fallback: bool,
}

impl<T> NormalizedResponse<T> {
    pub fn try_map<U, E>(
        self,
        f: impl FnOnce(T) -> Result<U, E>,
    ) -> Result<NormalizedResponse<U>, E> {
        let data = f(self.data)?;
        Ok(NormalizedResponse {
            data,
            usage: self.usage,
            cost: self.cost,
            processing_time_ms: self.processing_time_ms,
            finish_reason: self.finish_reason,
            used_tool_call: self.used_tool_call,
            used_continuation: self.used_continuation,
            used_fallback: self.used_fallback,
        })
    }
}

impl NormalizedResponse<Value> {
    /// Deserializes `data` into `T`, reporting mismatches as parse errors.
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<NormalizedResponse<T>, LlmError> {
        self.try_map(|data| {
            serde_json::from_value(data)
                .map_err(|e| LlmError::Parse(format!("unexpected response structure: {e}")))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_total_is_sum() {
        let usage = UsageRecord::new(120, 30);
        assert_eq!(usage.total_tokens, 150);
        let merged = usage.add(UsageRecord::new(10, 5));
        assert_eq!(merged, UsageRecord::new(130, 35));
        assert_eq!(merged.total_tokens, 165);
    }

    #[test]
    fn test_usage_saturates_on_huge_counts() {
        let usage = UsageRecord::new(u32::MAX, 10);
        assert_eq!(usage.total_tokens, u32::MAX);
        let merged = usage.add(UsageRecord::new(5, 5));
        assert_eq!(merged.input_tokens, u32::MAX);
        assert_eq!(merged.output_tokens, 15);
    }

    #[test]
    fn test_force_tool_sets_choice() {
        let tool = ToolDefinition::new("t", "d", serde_json::json!({"type": "object"}));
        let opts = CallOptions::default().force_tool(tool);
        assert_eq!(opts.tool_choice, Some(ToolChoice::Tool("t".to_string())));
        assert_eq!(opts.tools.len(), 1);
    }

    #[test]
    fn test_default_options() {
        let opts = CallOptions::default();
        assert_eq!(opts.max_tokens, 4000);
        assert!((opts.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(opts.timeout, Duration::from_secs(240));
        assert!(opts.retry_on_incomplete);
        assert!(!opts.enforce_json);
    }

    #[test]
    fn test_into_typed_reports_parse_error() {
        let response = NormalizedResponse {
            data: serde_json::json!({"a": "not a number"}),
            usage: UsageRecord::default(),
            cost: 0.0,
            processing_time_ms: 0,
            finish_reason: "stop".to_string(),
            used_tool_call: true,
            used_continuation: false,
            used_fallback: false,
        };

        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Shape {
            a: u32,
        }

        let err = response.into_typed::<Shape>().unwrap_err();
        assert!(matches!(err, LlmError::Parse(_)));
    }

    #[test]
    fn test_text_len_ignores_images() {
        let content = MessageContent::Parts(vec![
            ContentPart::Text("abcd".to_string()),
            ContentPart::Image {
                media_type: "image/png".to_string(),
                data: "xxxxxxxx".to_string(),
            },
        ]);
        assert_eq!(content.text_len(), 4);
    }
}
