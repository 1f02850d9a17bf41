//! Interview question generation and practice-answer evaluation.

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::analysis::models::ResumeAnalysis;
use crate::analysis::validation::{as_number, string_list};
use crate::interview::models::{AnswerEvaluation, InterviewPrep, InterviewQuestion};
use crate::interview::prompts::{
    evaluate_answer_tool, evaluation_prompt, interview_prep_prompt, interview_prep_tool,
    AnswerToEvaluate, EVALUATION_SYSTEM, INTERVIEW_PREP_SYSTEM,
};
use crate::llm_client::{
    context_sizes, temperatures, CallOptions, LlmClient, LlmError, NormalizedResponse,
};
use crate::models::resume::ResumeData;

fn text(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn list(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    string_list(obj.get(key)).unwrap_or_default()
}

/// Lenient enum read: unknown or missing values fall back to the default.
fn variant<T: serde::de::DeserializeOwned + Default>(obj: &Map<String, Value>, key: &str) -> T {
    obj.get(key)
        .and_then(Value::as_str)
        .and_then(|s| serde_json::from_value(Value::String(s.trim().to_lowercase())).ok())
        .unwrap_or_default()
}

/// Builds an `InterviewPrep` from the tool payload. Questions without text are
/// dropped, missing ids become `question_{n}` (1-based position in the
/// payload), and missing optional lists become empty.
pub fn normalize_prep(raw: &Value) -> Result<InterviewPrep, LlmError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| LlmError::InvalidShape("interview prep is not an object".to_string()))?;
    let items = obj.get("questions").and_then(Value::as_array).ok_or_else(|| {
        LlmError::InvalidShape("interview prep is missing the questions array".to_string())
    })?;

    let questions: Vec<InterviewQuestion> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let q = item.as_object()?;
            let question = text(q, "question");
            if question.is_empty() {
                warn!(index, "Dropping interview question without text");
                return None;
            }
            let id = Some(text(q, "id"))
                .filter(|id| !id.is_empty())
                .unwrap_or_else(|| format!("question_{}", index + 1));
            Some(InterviewQuestion {
                id,
                question,
                category: variant(q, "category"),
                difficulty: variant(q, "difficulty"),
                suggested_answer: text(q, "suggestedAnswer"),
                tips: list(q, "tips"),
                follow_up_questions: list(q, "followUpQuestions"),
            })
        })
        .collect();

    if questions.is_empty() {
        return Err(LlmError::InvalidShape(
            "interview prep contains no questions".to_string(),
        ));
    }

    Ok(InterviewPrep {
        questions,
        overall_tips: list(obj, "overallTips"),
        company_research: list(obj, "companyResearch"),
        salary_negotiation: list(obj, "salaryNegotiation"),
    })
}

/// Builds an `AnswerEvaluation`, clamping the score to 0-100.
pub fn normalize_evaluation(raw: &Value) -> Result<AnswerEvaluation, LlmError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| LlmError::InvalidShape("answer evaluation is not an object".to_string()))?;

    let score = match as_number(obj.get("score")) {
        Some(n) => {
            if !(0.0..=100.0).contains(&n) {
                warn!(original = n, "Clamping answer score");
            }
            n.round().clamp(0.0, 100.0) as u32
        }
        None => {
            warn!("Answer score missing or non-numeric, using 0");
            0
        }
    };

    Ok(AnswerEvaluation {
        score,
        overall_feedback: text(obj, "overallFeedback"),
        strengths: list(obj, "strengths"),
        improvements: list(obj, "improvements"),
        missing_key_points: list(obj, "missingKeyPoints"),
        suggestions: list(obj, "suggestions"),
    })
}

pub async fn generate_interview_prep(
    llm: &LlmClient,
    options: CallOptions,
    resume: &ResumeData,
    job_description: Option<&str>,
    analysis: Option<&ResumeAnalysis>,
) -> Result<NormalizedResponse<InterviewPrep>, LlmError> {
    let options = options
        .with_system(INTERVIEW_PREP_SYSTEM)
        .with_max_tokens(context_sizes::LARGE)
        .with_temperature(temperatures::NORMAL);

    let response = llm
        .call_tool(
            interview_prep_prompt(resume, job_description, analysis),
            interview_prep_tool(),
            options,
        )
        .await?;

    response.try_map(|data| {
        let prep = normalize_prep(&data)?;
        info!(questions = prep.questions.len(), "Interview prep generated");
        Ok(prep)
    })
}

/// Scores a practice answer. An unparseable tool payload yields
/// `AnswerEvaluation::fallback()` with `used_fallback` set.
pub async fn evaluate_answer(
    llm: &LlmClient,
    options: CallOptions,
    answer: &AnswerToEvaluate<'_>,
) -> Result<NormalizedResponse<AnswerEvaluation>, LlmError> {
    let fallback = serde_json::to_value(AnswerEvaluation::fallback())
        .map_err(|e| LlmError::Parse(e.to_string()))?;
    let options = options
        .with_system(EVALUATION_SYSTEM)
        .with_max_tokens(context_sizes::NORMAL)
        .with_temperature(temperatures::LOW)
        .with_fallback(fallback);

    let response = llm
        .call_tool(evaluation_prompt(answer), evaluate_answer_tool(), options)
        .await?;
    response.try_map(|data| normalize_evaluation(&data))
}
