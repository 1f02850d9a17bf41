use async_trait::async_trait;

use super::pricing::PricingTable;
use super::types::{ChatRequest, RawResponse};
use super::LlmError;

/// A chat-completion vendor. Adapters translate the vendor-neutral
/// `ChatRequest` onto the wire and resolve the reply into a `RawResponse`.
///
/// Implementations hold no per-call state and may be shared across tasks.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    /// Short vendor label used in logs ("openai", "anthropic").
    fn name(&self) -> &'static str;

    fn default_model(&self) -> &str;

    fn pricing(&self) -> &'static PricingTable;

    async fn complete(&self, request: &ChatRequest) -> Result<RawResponse, LlmError>;
}
