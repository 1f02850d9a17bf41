//! OpenAI Chat Completions adapter.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use super::pricing::{openai_models, PricingTable, OPENAI_PRICING};
use super::provider::ChatProvider;
use super::types::{
    ChatRequest, ContentPart, MessageContent, RawResponse, ResponseContent, Role, ToolChoice,
    UsageRecord,
};
use super::LlmError;

pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<OpenAiMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<Value>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage<'a> {
    role: Role,
    content: OpenAiContent<'a>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum OpenAiContent<'a> {
    Text(&'a str),
    Parts(Vec<Value>),
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    tool_calls: Option<Vec<ToolCall>>,
}

#[derive(Debug, Deserialize)]
struct ToolCall {
    function: Option<FunctionCall>,
}

#[derive(Debug, Deserialize)]
struct FunctionCall {
    name: String,
    arguments: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
    #[serde(rename = "type")]
    kind: Option<String>,
    code: Option<Value>,
}

fn build_request(request: &ChatRequest) -> OpenAiRequest<'_> {
    let mut messages = Vec::with_capacity(request.messages.len() + 1);
    if let Some(system) = request.system.as_deref().filter(|s| !s.is_empty()) {
        messages.push(OpenAiMessage {
            role: Role::System,
            content: OpenAiContent::Text(system),
        });
    }
    for m in &request.messages {
        let content = match &m.content {
            MessageContent::Text(text) => OpenAiContent::Text(text),
            MessageContent::Parts(parts) => OpenAiContent::Parts(
                parts
                    .iter()
                    .map(|p| match p {
                        ContentPart::Text(text) => json!({"type": "text", "text": text}),
                        ContentPart::Image { media_type, data } => json!({
                            "type": "image_url",
                            "image_url": {
                                "url": format!("data:{media_type};base64,{data}"),
                                "detail": "high"
                            }
                        }),
                    })
                    .collect(),
            ),
        };
        messages.push(OpenAiMessage {
            role: m.role,
            content,
        });
    }

    let tools: Vec<Value> = request
        .tools
        .iter()
        .map(|t| {
            json!({
                "type": "function",
                "function": {
                    "name": t.name,
                    "description": t.description,
                    "parameters": t.parameters,
                }
            })
        })
        .collect();

    let tool_choice = if tools.is_empty() {
        None
    } else {
        request.tool_choice.as_ref().map(|c| match c {
            ToolChoice::Tool(name) => json!({"type": "function", "function": {"name": name}}),
        })
    };

    // JSON mode is only valid when no tools are attached.
    let response_format = (request.json_mode && tools.is_empty())
        .then(|| json!({"type": "json_object"}));

    OpenAiRequest {
        model: &request.model,
        messages,
        max_tokens: request.max_tokens,
        temperature: request.temperature,
        response_format,
        tools,
        tool_choice,
    }
}

fn into_raw(response: OpenAiResponse) -> Result<RawResponse, LlmError> {
    let usage = response
        .usage
        .map(|u| UsageRecord::new(u.prompt_tokens, u.completion_tokens))
        .unwrap_or_default();

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyContent)?;
    let finish_reason = choice.finish_reason.unwrap_or_else(|| "stop".to_string());
    let message = choice.message.ok_or(LlmError::EmptyContent)?;

    let content = if let Some(call) = message.tool_calls.unwrap_or_default().into_iter().next() {
        let function = call.function.ok_or(LlmError::MissingToolArguments)?;
        let arguments = function
            .arguments
            .filter(|a| !a.trim().is_empty())
            .ok_or(LlmError::MissingToolArguments)?;
        ResponseContent::ToolCall {
            name: function.name,
            arguments,
        }
    } else {
        let text = message
            .content
            .filter(|c| !c.is_empty())
            .ok_or(LlmError::EmptyContent)?;
        ResponseContent::Text(text)
    };

    Ok(RawResponse {
        content,
        usage,
        finish_reason,
    })
}

/// OpenAI adapter. Cheap to clone; the inner `reqwest::Client` is shared.
#[derive(Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    api_url: String,
    default_model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, api_url: Option<String>) -> Result<Self, LlmError> {
        Ok(Self {
            client: Client::builder()
                .connect_timeout(Duration::from_secs(15))
                .build()?,
            api_key,
            api_url: api_url.unwrap_or_else(|| OPENAI_API_URL.to_string()),
            default_model: openai_models::MINI.to_string(),
        })
    }
}

#[async_trait]
impl ChatProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn default_model(&self) -> &str {
        &self.default_model
    }

    fn pricing(&self) -> &'static PricingTable {
        &OPENAI_PRICING
    }

    async fn complete(&self, request: &ChatRequest) -> Result<RawResponse, LlmError> {
        let body = build_request(request);

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(match serde_json::from_str::<OpenAiError>(&body) {
                Ok(e) => LlmError::Api {
                    status: status.as_u16(),
                    code: e.error.code.map(|c| match c {
                        Value::String(s) => s,
                        other => other.to_string(),
                    }),
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

        let parsed: OpenAiResponse = response.json().await?;
        debug!(choices = parsed.choices.len(), "OpenAI response received");
        into_raw(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::types::{ChatMessage, ToolDefinition};

    fn request(json_mode: bool, with_tool: bool) -> ChatRequest {
        ChatRequest {
            model: openai_models::MINI.to_string(),
            system: Some("sys".to_string()),
            messages: vec![ChatMessage::user("hello")],
            max_tokens: 100,
            temperature: 0.1,
            json_mode,
            tools: if with_tool {
                vec![ToolDefinition::new("extract_resume_content", "d", json!({"type": "object"}))]
            } else {
                vec![]
            },
            tool_choice: with_tool.then(|| ToolChoice::Tool("extract_resume_content".to_string())),
        }
    }

    #[test]
    fn test_system_prompt_first_message() {
        let wire = serde_json::to_value(build_request(&request(false, false))).unwrap();
        assert_eq!(wire["messages"][0]["role"], "system");
        assert_eq!(wire["messages"][0]["content"], "sys");
        assert_eq!(wire["messages"][1]["role"], "user");
        assert!(wire.get("tools").is_none());
    }

    #[test]
    fn test_json_mode_only_without_tools() {
        let wire = serde_json::to_value(build_request(&request(true, false))).unwrap();
        assert_eq!(wire["response_format"], json!({"type": "json_object"}));

        let wire = serde_json::to_value(build_request(&request(true, true))).unwrap();
        assert!(wire.get("response_format").is_none());
        assert_eq!(
            wire["tool_choice"],
            json!({"type": "function", "function": {"name": "extract_resume_content"}})
        );
        assert_eq!(wire["tools"][0]["type"], "function");
    }

    #[test]
    fn test_image_parts_become_data_urls() {
        let mut req = request(false, false);
        req.messages = vec![ChatMessage::user(vec![ContentPart::Image {
            media_type: "image/png".to_string(),
            data: "AAAA".to_string(),
        }])];
        let wire = serde_json::to_value(build_request(&req)).unwrap();
        assert_eq!(
            wire["messages"][1]["content"][0]["image_url"]["url"],
            "data:image/png;base64,AAAA"
        );
    }

    #[test]
    fn test_function_call_response() {
        let response: OpenAiResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {"content": null, "tool_calls": [{
                    "id": "c1", "type": "function",
                    "function": {"name": "extract_resume_content", "arguments": "{\"markdown\":\"# A\"}"}
                }]},
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 7, "completion_tokens": 3, "total_tokens": 10}
        }))
        .unwrap();
        let raw = into_raw(response).unwrap();
        assert_eq!(raw.usage, UsageRecord::new(7, 3));
        assert_eq!(raw.finish_reason, "tool_calls");
        assert_eq!(
            raw.content,
            ResponseContent::ToolCall {
                name: "extract_resume_content".to_string(),
                arguments: "{\"markdown\":\"# A\"}".to_string()
            }
        );
    }

    #[test]
    fn test_tool_call_without_arguments() {
        let response: OpenAiResponse = serde_json::from_value(json!({
            "choices": [{"message": {"tool_calls": [{"function": {"name": "x"}}]}}]
        }))
        .unwrap();
        assert!(matches!(
            into_raw(response),
            Err(LlmError::MissingToolArguments)
        ));
    }

    #[test]
    fn test_no_choices_is_empty_content() {
        let response: OpenAiResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(into_raw(response), Err(LlmError::EmptyContent)));
    }
}
