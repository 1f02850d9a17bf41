//! Resume scoring and optimization over the LLM client.

use serde::Serialize;
use serde_json::Value;

use crate::analysis::models::ResumeAnalysis;
use crate::analysis::prompts::{
    analysis_prompt, analyze_resume_tool, optimization_prompt, optimize_resume_tool,
    ANALYSIS_SYSTEM, OPTIMIZATION_SYSTEM,
};
use crate::analysis::validation::{normalize_analysis, Repair};
use crate::llm_client::{
    context_sizes, temperatures, CallOptions, LlmClient, LlmError, NormalizedResponse,
};
use crate::models::resume::ResumeData;

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub analysis: ResumeAnalysis,
    pub repairs: Vec<Repair>,
}

/// Scores `resume_text` against `job_description` and normalizes the result.
pub async fn analyze_resume(
    llm: &LlmClient,
    options: CallOptions,
    resume_text: &str,
    job_description: &str,
) -> Result<NormalizedResponse<AnalysisResult>, LlmError> {
    let options = options
        .with_system(ANALYSIS_SYSTEM)
        .with_max_tokens(context_sizes::NORMAL)
        .with_temperature(temperatures::NORMAL);

    let response = llm
        .call_tool(
            analysis_prompt(resume_text, job_description),
            analyze_resume_tool(),
            options,
        )
        .await?;

    response.try_map(|data| {
        let (analysis, repairs) = normalize_analysis(&data)?;
        tracing::info!(
            overall_score = analysis.overall_score,
            repairs = repairs.len(),
            "Resume analysis normalized"
        );
        Ok(AnalysisResult { analysis, repairs })
    })
}

/// Rewrites the resume for the target job. The result must carry `personalInfo`.
pub async fn optimize_resume(
    llm: &LlmClient,
    options: CallOptions,
    resume_text: &str,
    job_description: &str,
    analysis: Option<&ResumeAnalysis>,
) -> Result<NormalizedResponse<ResumeData>, LlmError> {
    let options = options
        .with_system(OPTIMIZATION_SYSTEM)
        .with_max_tokens(context_sizes::LARGE)
        .with_temperature(temperatures::NORMAL);

    let response = llm
        .call_tool(
            optimization_prompt(resume_text, job_description, analysis),
            optimize_resume_tool(),
            options,
        )
        .await?;

    if !response
        .data
        .get("personalInfo")
        .is_some_and(Value::is_object)
    {
        return Err(LlmError::InvalidShape(
            "optimized resume is missing personalInfo".to_string(),
        ));
    }
    response.into_typed()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::fake_client;
    use crate::llm_client::types::ToolChoice;
    use serde_json::json;

    #[tokio::test]
    async fn test_analysis_score_over_100_is_clamped() {
        let (llm, fake) = fake_client();
        fake.push_tool(
            "analyze_resume",
            &json!({
                "overallScore": 150,
                "scoringBreakdown": {"skills": 40, "experience": 35, "achievements": 20, "presentation": 5},
                "scoreLabel": "Exceptional Match",
                "strengths": ["Deep Rust experience"],
                "weaknesses": ["Few metrics"],
                "suggestions": [],
                "keywordMatch": {"matched": ["Rust"], "missing": [], "matchPercentage": 100},
                "atsIssues": []
            }),
        );

        let response = analyze_resume(&llm, CallOptions::default(), "Jane, Rust engineer", "Rust role")
            .await
            .unwrap();

        assert_eq!(response.data.analysis.overall_score, 100);
        assert_eq!(response.data.repairs.len(), 1);
        assert!(response.used_tool_call);

        let sent = &fake.requests()[0];
        assert_eq!(sent.tool_choice, Some(ToolChoice::Tool("analyze_resume".to_string())));
        assert_eq!(sent.system.as_deref(), Some(ANALYSIS_SYSTEM));
    }

    #[tokio::test]
    async fn test_analysis_prose_reply_is_invalid_shape() {
        let (llm, fake) = fake_client();
        fake.push_text("I'm sorry, I can't score this resume.");

        let err = analyze_resume(&llm, CallOptions::default(), "r", "j")
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::InvalidShape(_)));
    }

    #[tokio::test]
    async fn test_optimized_resume_is_typed() {
        let (llm, fake) = fake_client();
        fake.push_tool(
            "optimize_resume_data",
            &json!({
                "personalInfo": {"name": "Jane Doe", "email": "jane@example.com"},
                "summary": "Backend engineer focused on Rust services",
                "skills": {"technical": ["Rust", "PostgreSQL"]}
            }),
        );

        let response = optimize_resume(&llm, CallOptions::default(), "resume", "job", None)
            .await
            .unwrap();
        assert_eq!(response.data.personal_info.name, "Jane Doe");
        assert_eq!(response.data.skills.technical, vec!["Rust", "PostgreSQL"]);
        assert_eq!(fake.requests()[0].max_tokens, context_sizes::LARGE);
    }

    #[tokio::test]
    async fn test_optimized_resume_requires_personal_info() {
        let (llm, fake) = fake_client();
        fake.push_tool("optimize_resume_data", &json!({"summary": "no header"}));

        let err = optimize_resume(&llm, CallOptions::default(), "resume", "job", None)
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::InvalidShape(_)));
    }

    #[test]
    fn test_optimization_prompt_includes_insights() {
        let (analysis, _) = normalize_analysis(&json!({
            "overallScore": 58,
            "strengths": ["Rust"],
            "weaknesses": ["No cloud"],
            "keywordMatch": {"matched": ["Rust"], "missing": ["AWS", "Terraform"]}
        }))
        .unwrap();
        let prompt = optimization_prompt("resume body", "job body", Some(&analysis));
        assert!(prompt.contains("Overall Score: 58%"));
        assert!(prompt.contains("Missing Keywords: AWS, Terraform"));
        assert!(prompt.contains("resume body"));

        let bare = optimization_prompt("resume body", "job body", None);
        assert!(!bare.contains("ANALYSIS INSIGHTS"));
    }
}
