//! Axum route handlers for resume analysis and optimization.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::analysis::models::ResumeAnalysis;
use crate::analysis::service::{analyze_resume, optimize_resume};
use crate::analysis::validation::Repair;
use crate::errors::{require_non_empty, AppError};
use crate::models::metadata::ResponseMetadata;
use crate::models::resume::ResumeData;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_description: String,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: ResumeAnalysis,
    pub repairs: Vec<Repair>,
    #[serde(flatten)]
    pub metadata: ResponseMetadata,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub resume_text: String,
    pub job_description: String,
    pub analysis: Option<ResumeAnalysis>,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OptimizeResponse {
    pub resume: ResumeData,
    #[serde(flatten)]
    pub metadata: ResponseMetadata,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analyze-resume
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    require_non_empty("resumeText", &req.resume_text)?;
    require_non_empty("jobDescription", &req.job_description)?;

    let target = state.llm_for(req.model.as_deref())?;
    let response = analyze_resume(
        target.client,
        target.options(),
        &req.resume_text,
        &req.job_description,
    )
    .await?;

    let metadata = ResponseMetadata::new(&target.model, &response);
    Ok(Json(AnalyzeResponse {
        analysis: response.data.analysis,
        repairs: response.data.repairs,
        metadata,
    }))
}

/// POST /api/v1/optimize-resume
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(req): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    require_non_empty("resumeText", &req.resume_text)?;
    require_non_empty("jobDescription", &req.job_description)?;

    let target = state.llm_for(req.model.as_deref())?;
    let response = optimize_resume(
        target.client,
        target.options(),
        &req.resume_text,
        &req.job_description,
        req.analysis.as_ref(),
    )
    .await?;

    let metadata = ResponseMetadata::new(&target.model, &response);
    Ok(Json(OptimizeResponse {
        resume: response.data,
        metadata,
    }))
}
