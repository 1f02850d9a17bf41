//! Axum route handlers for job-description summarization.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::{require_non_empty, AppError};
use crate::jobs::summary::{should_summarize, summarize_job, JobSummary};
use crate::models::metadata::ResponseMetadata;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummaryRequest {
    pub job_description: String,
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobSummaryResponse {
    pub summarized: bool,
    pub job_summary: JobSummary,
    /// Absent when the description was short enough to pass through.
    #[serde(flatten)]
    pub metadata: Option<ResponseMetadata>,
}

/// POST /api/v1/job-summary
pub async fn handle_job_summary(
    State(state): State<AppState>,
    Json(req): Json<JobSummaryRequest>,
) -> Result<Json<JobSummaryResponse>, AppError> {
    require_non_empty("jobDescription", &req.job_description)?;

    if !should_summarize(&req.job_description, state.config.job_summary_threshold) {
        tracing::debug!(
            len = req.job_description.len(),
            "Job description below summary threshold, passing through"
        );
        return Ok(Json(JobSummaryResponse {
            summarized: false,
            job_summary: JobSummary::passthrough(&req.job_description),
            metadata: None,
        }));
    }

    let target = state.llm_for(req.model.as_deref())?;
    let response = summarize_job(target.client, target.options(), &req.job_description).await?;

    let metadata = ResponseMetadata::new(&target.model, &response);
    Ok(Json(JobSummaryResponse {
        summarized: true,
        job_summary: response.data,
        metadata: Some(metadata),
    }))
}
