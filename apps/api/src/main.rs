mod analysis;
mod config;
mod errors;
mod extraction;
mod interview;
mod jobs;
mod llm_client;
mod models;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::anthropic::AnthropicProvider;
use crate::llm_client::openai::OpenAiProvider;
use crate::llm_client::{LlmClient, LlmRouter};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Fails when neither vendor key is set
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Roaster API v{}", env!("CARGO_PKG_VERSION"));

    let llm = build_llm_router(&config)?;
    info!(default_model = llm.default_model(), "LLM router initialized");

    let state = AppState::new(llm, config.clone());

    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// One client per vendor whose key is configured.
fn build_llm_router(config: &Config) -> Result<LlmRouter> {
    let openai = match &config.openai_api_key {
        Some(key) => {
            let provider = OpenAiProvider::new(key.clone(), config.openai_base_url.clone())
                .context("Failed to build OpenAI client")?;
            info!("OpenAI provider configured");
            Some(LlmClient::new(Arc::new(provider)))
        }
        None => None,
    };

    let anthropic = match &config.anthropic_api_key {
        Some(key) => {
            let provider = AnthropicProvider::new(key.clone(), config.anthropic_base_url.clone())
                .context("Failed to build Anthropic client")?;
            info!("Anthropic provider configured");
            Some(LlmClient::new(Arc::new(provider)))
        }
        None => None,
    };

    Ok(LlmRouter::new(openai, anthropic, config.default_model.clone()))
}
