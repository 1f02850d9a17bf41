use std::time::Duration;

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::{CallOptions, LlmClient, LlmRouter};

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmRouter,
    pub config: Config,
}

/// A resolved vendor client plus the model name to request from it.
pub struct LlmTarget<'a> {
    pub client: &'a LlmClient,
    pub model: String,
    timeout: Duration,
}

impl LlmTarget<'_> {
    /// Base options for this target: model and configured timeout set.
    pub fn options(&self) -> CallOptions {
        CallOptions::default()
            .with_model(self.model.clone())
            .with_timeout(self.timeout)
    }
}

impl AppState {
    pub fn new(llm: LlmRouter, config: Config) -> Self {
        Self { llm, config }
    }

    /// Resolves a request's optional `model` field (default model when absent).
    pub fn llm_for(&self, model: Option<&str>) -> Result<LlmTarget<'_>, AppError> {
        let (client, model) = self.llm.for_model(model)?;
        tracing::debug!(provider = client.provider_name(), model = %model, "Resolved LLM target");
        Ok(LlmTarget {
            client,
            model,
            timeout: self.config.llm_timeout,
        })
    }
}
