//! Axum route handlers for interview preparation.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::analysis::models::ResumeAnalysis;
use crate::errors::{require_non_empty, AppError};
use crate::interview::models::{AnswerEvaluation, InterviewPrep};
use crate::interview::prompts::AnswerToEvaluate;
use crate::interview::service::{evaluate_answer, generate_interview_prep};
use crate::models::metadata::ResponseMetadata;
use crate::models::resume::ResumeData;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewPrepRequest {
    pub resume_data: ResumeData,
    pub job_description: Option<String>,
    pub analysis: Option<ResumeAnalysis>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewPrepResponse {
    pub interview_prep: InterviewPrep,
    /// True when generation failed and the generic question set was served.
    pub fallback: bool,
    #[serde(flatten)]
    pub metadata: Option<ResponseMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateAnswerRequest {
    pub user_answer: String,
    pub question: String,
    pub suggested_answer: String,
    #[serde(default)]
    pub tips: Vec<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EvaluateAnswerResponse {
    pub evaluation: AnswerEvaluation,
    #[serde(flatten)]
    pub metadata: ResponseMetadata,
}

/// POST /api/v1/interview-prep
pub async fn handle_interview_prep(
    State(state): State<AppState>,
    Json(req): Json<InterviewPrepRequest>,
) -> Result<Json<InterviewPrepResponse>, AppError> {
    let target = state.llm_for(req.model.as_deref())?;
    let result = generate_interview_prep(
        target.client,
        target.options(),
        &req.resume_data,
        req.job_description.as_deref(),
        req.analysis.as_ref(),
    )
    .await;

    let response = match result {
        Ok(response) => InterviewPrepResponse {
            metadata: Some(ResponseMetadata::new(&target.model, &response)),
            interview_prep: response.data,
            fallback: false,
        },
        Err(e) => {
            warn!(error = %e, "Interview prep generation failed, serving default questions");
            InterviewPrepResponse {
                interview_prep: InterviewPrep::fallback(),
                fallback: true,
                metadata: None,
            }
        }
    };
    Ok(Json(response))
}

/// POST /api/v1/evaluate-answer
pub async fn handle_evaluate_answer(
    State(state): State<AppState>,
    Json(req): Json<EvaluateAnswerRequest>,
) -> Result<Json<EvaluateAnswerResponse>, AppError> {
    require_non_empty("userAnswer", &req.user_answer)?;
    require_non_empty("question", &req.question)?;
    require_non_empty("suggestedAnswer", &req.suggested_answer)?;

    let target = state.llm_for(req.model.as_deref())?;
    let answer = AnswerToEvaluate {
        question: &req.question,
        user_answer: &req.user_answer,
        suggested_answer: &req.suggested_answer,
        tips: &req.tips,
        category: req.category.as_deref(),
        difficulty: req.difficulty.as_deref(),
    };
    let response = evaluate_answer(target.client, target.options(), &answer).await?;

    let metadata = ResponseMetadata::new(&target.model, &response);
    Ok(Json(EvaluateAnswerResponse {
        evaluation: response.data,
        metadata,
    }))
}
