use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::openai_models;

/// Application configuration loaded from environment variables.
/// Startup fails if neither vendor API key is set.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub anthropic_base_url: Option<String>,
    pub default_model: String,
    pub llm_timeout: Duration,
    /// Job descriptions longer than this many characters are summarized first.
    pub job_summary_threshold: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let optional = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let openai_api_key = optional("OPENAI_API_KEY");
        let anthropic_api_key = optional("ANTHROPIC_API_KEY");
        if openai_api_key.is_none() && anthropic_api_key.is_none() {
            bail!("At least one of OPENAI_API_KEY or ANTHROPIC_API_KEY must be set");
        }

        Ok(Config {
            openai_api_key,
            anthropic_api_key,
            openai_base_url: optional("OPENAI_BASE_URL"),
            anthropic_base_url: optional("ANTHROPIC_BASE_URL"),
            default_model: optional("DEFAULT_LLM_MODEL")
                .unwrap_or_else(|| openai_models::MINI.to_string()),
            llm_timeout: Duration::from_secs(parse_or(
                optional("LLM_TIMEOUT_SECS"),
                "LLM_TIMEOUT_SECS",
                240u64,
            )?),
            job_summary_threshold: parse_or(
                optional("JOB_SUMMARY_THRESHOLD"),
                "JOB_SUMMARY_THRESHOLD",
                3000usize,
            )?,
            port: parse_or(optional("PORT"), "PORT", 8080u16)?,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: '{value}'")),
        None => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    pub fn for_tests() -> Self {
        Config {
            openai_api_key: Some("test-key".to_string()),
            anthropic_api_key: None,
            openai_base_url: None,
            anthropic_base_url: None,
            default_model: openai_models::MINI.to_string(),
            llm_timeout: Duration::from_secs(240),
            job_summary_threshold: 3000,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("ANTHROPIC_API_KEY", "sk-ant")]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.llm_timeout, Duration::from_secs(240));
        assert_eq!(config.job_summary_threshold, 3000);
        assert_eq!(config.default_model, "gpt-4.1-mini");
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_requires_a_vendor_key() {
        let err = load(&[("PORT", "9000"), ("OPENAI_API_KEY", "  ")]).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn test_overrides_and_invalid_values() {
        let config = load(&[
            ("OPENAI_API_KEY", "sk"),
            ("LLM_TIMEOUT_SECS", "30"),
            ("DEFAULT_LLM_MODEL", "claude-sonnet-4-20250514"),
        ])
        .unwrap();
        assert_eq!(config.llm_timeout, Duration::from_secs(30));
        assert_eq!(config.default_model, "claude-sonnet-4-20250514");

        let err = load(&[("OPENAI_API_KEY", "sk"), ("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
