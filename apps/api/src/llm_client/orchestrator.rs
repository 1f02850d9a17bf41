//! Call orchestration: request assembly, timeout, response-shape handling,
//! one-shot continuation for truncated JSON, and usage/cost accounting.

use std::sync::Arc;

use serde_json::Value;
use tokio::time::Instant;
use tracing::{debug, error, info, info_span, warn, Instrument};

use super::parser::{
    is_content_incomplete, parse_json_response, parse_tool_arguments, strip_json_fences,
};
use super::prompts::{CONTINUATION_INSTRUCTION, JSON_ONLY_SYSTEM};
use super::provider::ChatProvider;
use super::types::{
    CallOptions, ChatMessage, ChatRequest, MessageContent, NormalizedResponse, RawResponse,
    ResponseContent, ToolDefinition, UsageRecord,
};
use super::LlmError;

/// Upper bound on the token budget of a continuation request.
const CONTINUATION_MAX_TOKENS: u32 = 20_000;

/// Wraps one `ChatProvider` and returns vendor-independent `NormalizedResponse`s.
/// Cheap to clone; all clones share the same provider.
#[derive(Clone)]
pub struct LlmClient {
    provider: Arc<dyn ChatProvider>,
}

struct Continued {
    data: Value,
    usage: UsageRecord,
    finish_reason: String,
}

impl LlmClient {
    pub fn new(provider: Arc<dyn ChatProvider>) -> Self {
        Self { provider }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub fn default_model(&self) -> &str {
        self.provider.default_model()
    }

    /// Generic entry point. `content` is a plain prompt or a multimodal part list.
    ///
    /// Text replies without any `{` come back as `Value::String`; JSON-looking
    /// replies are parsed (with repair, and one continuation when truncated).
    pub async fn call(
        &self,
        content: impl Into<MessageContent>,
        options: CallOptions,
    ) -> Result<NormalizedResponse<Value>, LlmError> {
        let model = options
            .model
            .clone()
            .unwrap_or_else(|| self.provider.default_model().to_string());
        let span = info_span!("llm_call", provider = self.provider.name(), model = %model);
        let started = Instant::now();

        let result = self
            .call_inner(content.into(), model, options, started)
            .instrument(span.clone())
            .await;

        if let Err(e) = &result {
            let _guard = span.enter();
            error!(
                error = %e,
                status = ?e.status(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                "LLM call failed"
            );
        }
        result
    }

    /// Attaches `tool`, forces the model to call it, and returns its arguments.
    pub async fn call_tool(
        &self,
        content: impl Into<MessageContent>,
        tool: ToolDefinition,
        options: CallOptions,
    ) -> Result<NormalizedResponse<Value>, LlmError> {
        self.call(content, options.force_tool(tool)).await
    }

    async fn call_inner(
        &self,
        content: MessageContent,
        model: String,
        options: CallOptions,
        started: Instant,
    ) -> Result<NormalizedResponse<Value>, LlmError> {
        let deadline = started + options.timeout;

        info!(
            max_tokens = options.max_tokens,
            temperature = options.temperature,
            enforce_json = options.enforce_json,
            has_tools = !options.tools.is_empty(),
            prompt_len = content.text_len(),
            "Starting LLM call"
        );

        let request = ChatRequest {
            model: model.clone(),
            system: options
                .system_prompt
                .clone()
                .filter(|s| !s.is_empty())
                .or_else(|| options.enforce_json.then(|| JSON_ONLY_SYSTEM.to_string())),
            messages: vec![ChatMessage::user(content)],
            max_tokens: options.max_tokens,
            temperature: options.temperature,
            json_mode: options.enforce_json,
            tools: options.tools.clone(),
            tool_choice: options.tool_choice.clone(),
        };

        let raw = self.complete_before(&request, deadline, &options).await?;
        debug!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            "LLM API call completed"
        );

        let mut usage = raw.usage;
        let mut finish_reason = raw.finish_reason;
        let mut used_tool_call = false;
        let mut used_continuation = false;
        let mut used_fallback = false;

        let data = match raw.content {
            ResponseContent::ToolCall { name, arguments } => {
                used_tool_call = true;
                debug!(tool = %name, "Tool call response received");
                match parse_tool_arguments(&arguments) {
                    Ok(value) => value,
                    Err(e) => match &options.fallback {
                        Some(fallback) => {
                            warn!(tool = %name, error = %e, "Tool arguments unparseable, using fallback");
                            used_fallback = true;
                            fallback.clone()
                        }
                        None => return Err(e),
                    },
                }
            }
            ResponseContent::Text(text) if options.enforce_json => {
                serde_json::from_str(strip_json_fences(&text)).map_err(|e| {
                    LlmError::Parse(format!(
                        "Failed to parse JSON response despite enforcement: {e}"
                    ))
                })?
            }
            ResponseContent::Text(text) if !text.contains('{') => {
                debug!("No JSON braces found, returning plain text");
                Value::String(text)
            }
            ResponseContent::Text(text) => match parse_json_response(&text) {
                Ok(value) => value,
                Err(_) if options.retry_on_incomplete && is_content_incomplete(&text) => {
                    info!(partial_len = text.len(), "Content appears incomplete, requesting continuation");
                    let continued = self
                        .continue_truncated(&request, text, deadline, &options)
                        .await?;
                    usage = usage.add(continued.usage);
                    finish_reason = continued.finish_reason;
                    used_continuation = true;
                    continued.data
                }
                Err(e) => {
                    debug!(error = %e, "Text is not JSON, returning plain text");
                    Value::String(text)
                }
            },
        };

        let cost = self
            .provider
            .pricing()
            .cost(&model, usage.input_tokens, usage.output_tokens);
        let processing_time_ms = started.elapsed().as_millis() as u64;

        info!(
            processing_time_ms,
            total_tokens = usage.total_tokens,
            cost,
            used_tool_call,
            used_continuation,
            used_fallback,
            "LLM call completed"
        );

        Ok(NormalizedResponse {
            data,
            usage,
            cost,
            processing_time_ms,
            finish_reason,
            used_tool_call,
            used_continuation,
            used_fallback,
        })
    }

    /// Issues one follow-up request carrying the partial reply and parses the
    /// concatenation. Shares the original call's deadline.
    async fn continue_truncated(
        &self,
        original: &ChatRequest,
        partial: String,
        deadline: Instant,
        options: &CallOptions,
    ) -> Result<Continued, LlmError> {
        // The follow-up must be answered as text, so no tool is attached.
        let mut request = original.clone();
        request.tools.clear();
        request.tool_choice = None;
        request.max_tokens = original.max_tokens.min(CONTINUATION_MAX_TOKENS);
        request.messages.push(ChatMessage::assistant(partial.clone()));
        request.messages.push(ChatMessage::user(CONTINUATION_INSTRUCTION));

        let raw = match self.complete_before(&request, deadline, options).await {
            Ok(raw) => raw,
            Err(e @ LlmError::Timeout { .. }) => return Err(e),
            Err(e) => return Err(LlmError::Continuation(e.to_string())),
        };

        let tail = match raw.content {
            ResponseContent::Text(text) => text,
            ResponseContent::ToolCall { arguments, .. } => arguments,
        };
        let combined = partial + &tail;
        debug!(combined_len = combined.len(), "Continuation received, parsing combined content");

        let data = parse_json_response(&combined)
            .map_err(|e| LlmError::Continuation(e.to_string()))?;

        Ok(Continued {
            data,
            usage: raw.usage,
            finish_reason: raw.finish_reason,
        })
    }

    async fn complete_before(
        &self,
        request: &ChatRequest,
        deadline: Instant,
        options: &CallOptions,
    ) -> Result<RawResponse, LlmError> {
        match tokio::time::timeout_at(deadline, self.provider.complete(request)).await {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout {
                seconds: options.timeout.as_secs_f64(),
            }),
        }
    }
}

/// Picks the vendor client for a model name: `claude*` goes to Anthropic,
/// everything else to OpenAI.
#[derive(Clone)]
pub struct LlmRouter {
    openai: Option<LlmClient>,
    anthropic: Option<LlmClient>,
    default_model: String,
}

impl LlmRouter {
    /// When the vendor of `default_model` is not configured, the other
    /// vendor's default model is used instead.
    pub fn new(
        openai: Option<LlmClient>,
        anthropic: Option<LlmClient>,
        default_model: String,
    ) -> Self {
        let mut router = Self {
            openai,
            anthropic,
            default_model,
        };
        if router.for_model(None).is_err() {
            let replacement = match (&router.openai, &router.anthropic) {
                (Some(c), _) | (None, Some(c)) => Some(c.default_model().to_string()),
                (None, None) => None,
            };
            if let Some(model) = replacement {
                warn!(
                    configured = %router.default_model,
                    using = %model,
                    "Default model's provider is not configured"
                );
                router.default_model = model;
            }
        }
        router
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    /// Resolves `model` (or the configured default) to a client and the model
    /// name to request.
    pub fn for_model(&self, model: Option<&str>) -> Result<(&LlmClient, String), LlmError> {
        let model = model
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(&self.default_model)
            .to_string();
        let client = if model.starts_with("claude") {
            self.anthropic.as_ref()
        } else {
            self.openai.as_ref()
        };
        match client {
            Some(client) => Ok((client, model)),
            None => Err(LlmError::ProviderNotConfigured(model)),
        }
    }
}
