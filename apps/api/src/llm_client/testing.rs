//! Scripted in-process provider for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use super::pricing::{
    anthropic_models, openai_models, PricingTable, ANTHROPIC_PRICING, OPENAI_PRICING,
};
use super::provider::ChatProvider;
use super::types::{ChatRequest, RawResponse, ResponseContent, UsageRecord};
use super::{LlmClient, LlmError, LlmRouter};

/// Replays queued replies in order and records every request it receives.
/// An exhausted queue answers with `LlmError::EmptyContent`.
pub struct FakeProvider {
    name: &'static str,
    default_model: &'static str,
    pricing: &'static PricingTable,
    delay: Option<Duration>,
    replies: Mutex<VecDeque<Result<RawResponse, LlmError>>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl FakeProvider {
    pub fn openai() -> Self {
        Self::with_vendor("openai", openai_models::MINI, &OPENAI_PRICING)
    }

    pub fn anthropic() -> Self {
        Self::with_vendor("anthropic", anthropic_models::SONNET, &ANTHROPIC_PRICING)
    }

    fn with_vendor(
        name: &'static str,
        default_model: &'static str,
        pricing: &'static PricingTable,
    ) -> Self {
        Self {
            name,
            default_model,
            pricing,
            delay: None,
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Every reply is delivered after `delay`.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn push(&self, reply: Result<RawResponse, LlmError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn push_tool(&self, name: &str, arguments: &Value) {
        self.push(Ok(tool_reply(name, &arguments.to_string(), 100, 50)));
    }

    pub fn push_text(&self, text: &str) {
        self.push(Ok(text_reply(text, 100, 50)));
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatProvider for FakeProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn default_model(&self) -> &str {
        self.default_model
    }

    fn pricing(&self) -> &'static PricingTable {
        self.pricing
    }

    async fn complete(&self, request: &ChatRequest) -> Result<RawResponse, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let reply = self.replies.lock().unwrap().pop_front();
        reply.unwrap_or(Err(LlmError::EmptyContent))
    }
}

pub fn text_reply(text: &str, input_tokens: u32, output_tokens: u32) -> RawResponse {
    RawResponse {
        content: ResponseContent::Text(text.to_string()),
        usage: UsageRecord::new(input_tokens, output_tokens),
        finish_reason: "stop".to_string(),
    }
}

pub fn tool_reply(name: &str, arguments: &str, input_tokens: u32, output_tokens: u32) -> RawResponse {
    RawResponse {
        content: ResponseContent::ToolCall {
            name: name.to_string(),
            arguments: arguments.to_string(),
        },
        usage: UsageRecord::new(input_tokens, output_tokens),
        finish_reason: "tool_calls".to_string(),
    }
}

/// An OpenAI-only client over a fresh fake, plus the fake for scripting.
pub fn fake_client() -> (LlmClient, Arc<FakeProvider>) {
    let fake = Arc::new(FakeProvider::openai());
    (LlmClient::new(fake.clone()), fake)
}

/// A router whose OpenAI slot is backed by a fresh fake.
pub fn fake_router() -> (LlmRouter, Arc<FakeProvider>) {
    let (client, fake) = fake_client();
    (
        LlmRouter::new(Some(client), None, openai_models::MINI.to_string()),
        fake,
    )
}
