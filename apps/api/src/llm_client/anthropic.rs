//! Anthropic Messages API adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::pricing::{anthropic_models, PricingTable, ANTHROPIC_PRICING};
use super::provider::ChatProvider;
use super::types::{
    ChatRequest, ContentPart, MessageContent, RawResponse, ResponseContent, Role, ToolChoice,
    UsageRecord,
};
use super::LlmError;

pub const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<AnthropicMessage<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<AnthropicTool<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<AnthropicToolChoice<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: Role,
    content: AnthropicContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum AnthropicContent<'a> {
    Text(&'a str),
    Blocks(Vec<AnthropicBlock<'a>>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicBlock<'a> {
    Text { text: &'a str },
    Image { source: ImageSource<'a> },
}

#[derive(Debug, Serialize)]
struct ImageSource<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    media_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
struct AnthropicTool<'a> {
    name: &'a str,
    description: &'a str,
    input_schema: &'a Value,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum AnthropicToolChoice<'a> {
    Tool { name: &'a str },
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
    usage: Option<Usage>,
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseBlock {
    Text {
        text: String,
    },
    ToolUse {
        name: String,
        #[serde(default)]
        input: Value,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    #[serde(rename = "type")]
    kind: Option<String>,
    message: String,
}

fn build_request(request: &ChatRequest) -> AnthropicRequest<'_> {
    let messages = request
        .messages
        .iter()
        .filter(|m| m.role != Role::System)
        .map(|m| AnthropicMessage {
            role: m.role,
            content: match &m.content {
                MessageContent::Text(text) => AnthropicContent::Text(text),
                MessageContent::Parts(parts) => AnthropicContent::Blocks(
                    parts
                        .iter()
                        .map(|p| match p {
                            ContentPart::Text(text) => AnthropicBlock::Text { text },
                            ContentPart::Image { media_type, data } => AnthropicBlock::Image {
                                source: ImageSource {
                                    kind: "base64",
                                    media_type,
                                    data,
                                },
                            },
                        })
                        .collect(),
                ),
            },
        })
        .collect();

    let tools = request
        .tools
        .iter()
        .map(|t| AnthropicTool {
            name: &t.name,
            description: &t.description,
            input_schema: &t.parameters,
        })
        .collect::<Vec<_>>();

    let tool_choice = if tools.is_empty() {
        None
    } else {
        request.tool_choice.as_ref().map(|c| match c {
            ToolChoice::Tool(name) => AnthropicToolChoice::Tool { name },
        })
    };

    AnthropicRequest {
        model: &request.model,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        system: request.system.as_deref().filter(|s| !s.is_empty()),
        messages,
        tools,
        tool_choice,
    }
}

fn into_raw(response: AnthropicResponse) -> Result<RawResponse, LlmError> {
    if response.content.is_empty() {
        return Err(LlmError::EmptyContent);
    }

    let usage = response
        .usage
        .map(|u| UsageRecord::new(u.input_tokens, u.output_tokens))
        .unwrap_or_default();
    let finish_reason = response.stop_reason.unwrap_or_else(|| "end_turn".to_string());

    let tool_use = response.content.iter().find_map(|b| match b {
        ResponseBlock::ToolUse { name, input } => Some((name, input)),
        _ => None,
    });

    let content = if let Some((name, input)) = tool_use {
        if input.is_null() {
            return Err(LlmError::MissingToolArguments);
        }
        ResponseContent::ToolCall {
            name: name.clone(),
            arguments: serde_json::to_string(input)
                .map_err(|e| LlmError::Parse(e.to_string()))?,
        }
    } else {
        let text = response
            .content
            .iter()
            .find_map(|b| match b {
                ResponseBlock::Text { text } => Some(text.clone()),
                _ => None,
            })
            .ok_or(LlmError::EmptyContent)?;
        ResponseContent::Text(text)
    };

    Ok(RawResponse {
        content,
        usage,
        finish_reason,
    })
}

/// Anthropic adapter. Cheap to clone; the inner `reqwest::Client` is shared.
#[derive(Clone)]
pub struct AnthropicProvider {
    client: Client,
    api_key: String,
    api_url: String,
    default_model: String,
}

impl AnthropicProvider {
    pub fn new(api_key: String, api_url: Option<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .connect_timeout(Duration::from_secs(15))
                .build()?,
            api_key,
            api_url: api_url.unwrap_or_else(|| ANTHROPIC_API_URL.to_string()),
            default_model: anthropic_models::SONNET.to_string(),
        })
    }
}

#[async_trait]
impl ChatProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn pricing(&self) -> &'static PricingTable {
        &ANTHROPIC_PRICING
    }

    async fn complete(&self, request: &ChatRequest) -> Result<RawResponse, LlmError> {
        let body = build_request(request);

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<AnthropicError>(&body) {
                Ok(e) => LlmError::Api {
                    status: status.as_u16(),
                    code: None,
                    kind: e.error.kind,
                    message: e.error.message,
                },
                Err(_) => LlmError::Api {
                    status: status.as_u16(),
                    code: None,
                    kind: None,
                    message: body,
                },
            });
        }

        let parsed: AnthropicResponse = response.json().await?;
        debug!(
            stop_reason = ?parsed.stop_reason,
            blocks = parsed.content.len(),
            "Anthropic response received"
        );
        into_raw(parsed)
    }
}
