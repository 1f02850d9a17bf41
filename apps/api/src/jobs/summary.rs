use serde::{Deserialize, Serialize};

use crate::jobs::prompts::{job_summary_prompt, summarize_job_tool, JOB_SUMMARY_SYSTEM};
use crate::llm_client::{
    context_sizes, temperatures, CallOptions, LlmClient, LlmError, NormalizedResponse,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummary {
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub key_requirements: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
}

impl JobSummary {
    /// The posting itself, used when it is short enough to need no summary.
    pub fn passthrough(job_description: &str) -> Self {
        Self {
            summary: job_description.trim().to_string(),
            ..Default::default()
        }
    }
}

/// True when the description is longer than `threshold` characters.
pub fn should_summarize(job_description: &str, threshold: usize) -> bool {
    job_description.chars().count() > threshold
}

/// Condenses a job description into a `JobSummary`.
pub async fn summarize_job(
    llm: &LlmClient,
    options: CallOptions,
    job_description: &str,
) -> Result<NormalizedResponse<JobSummary>, LlmError> {
    let options = options
        .with_system(JOB_SUMMARY_SYSTEM)
        .with_max_tokens(context_sizes::NORMAL)
        .with_temperature(temperatures::LOW);

    let response = llm
        .call_tool(job_summary_prompt(job_description), summarize_job_tool(), options)
        .await?
        .into_typed::<JobSummary>()?;

    response.try_map(|mut summary| {
        summary.summary = summary.summary.trim().to_string();
        if summary.summary.is_empty() {
            return Err(LlmError::InvalidShape("job summary is empty".to_string()));
        }
        summary.key_requirements = summary
            .key_requirements
            .into_iter()
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty())
            .collect();
        Ok(summary)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::fake_client;
    use crate::llm_client::types::ToolChoice;
    use serde_json::json;

    #[tokio::test]
    async fn test_summarize_job_returns_summary_and_requirements() {
        let (llm, fake) = fake_client();
        fake.push_tool(
            "summarize_job_description",
            &json!({
                "summary": "Senior backend role building payment APIs in Rust.",
                "keyRequirements": ["5+ years Rust", "  PostgreSQL ", ""],
                "companyName": "Acme Pay",
                "jobTitle": "Senior Backend Engineer"
            }),
        );

        let response = summarize_job(
            &llm,
            CallOptions::default(),
            "Summarize this job: Acme Pay is hiring a senior backend engineer...",
        )
        .await
        .unwrap();

        assert!(!response.data.summary.is_empty());
        assert_eq!(response.data.key_requirements, vec!["5+ years Rust", "PostgreSQL"]);
        assert_eq!(response.data.company_name.as_deref(), Some("Acme Pay"));

        let sent = &fake.requests()[0];
        assert_eq!(
            sent.tool_choice,
            Some(ToolChoice::Tool("summarize_job_description".to_string()))
        );
        assert_eq!(sent.tools[0].name, "summarize_job_description");
    }

    #[tokio::test]
    async fn test_blank_summary_is_invalid_shape() {
        let (llm, fake) = fake_client();
        fake.push_tool("summarize_job_description", &json!({"summary": "  ", "keyRequirements": []}));

        let err = summarize_job(&llm, CallOptions::default(), "job")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::InvalidShape(_)));
    }

    #[test]
    fn test_should_summarize_threshold() {
        let exactly = "a".repeat(3000);
        assert!(!should_summarize(&exactly, 3000));
        assert!(should_summarize(&format!("{exactly}b"), 3000));
        // Counted in characters, not bytes.
        assert!(!should_summarize(&"é".repeat(3000), 3000));
    }

    #[test]
    fn test_passthrough_trims() {
        let summary = JobSummary::passthrough("  Short posting.\n");
        assert_eq!(summary.summary, "Short posting.");
        assert!(summary.key_requirements.is_empty());
    }
}
