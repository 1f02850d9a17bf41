pub mod health;
pub mod pricing;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers::{handle_analyze, handle_optimize};
use crate::extraction::handlers::handle_extract_pdf;
use crate::interview::handlers::{handle_evaluate_answer, handle_interview_prep};
use crate::jobs::handlers::handle_job_summary;
use crate::state::AppState;

/// Upload cap for PDF extraction: the file plus its page renders.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/analyze-resume", post(handle_analyze))
        .route("/api/v1/optimize-resume", post(handle_optimize))
        .route("/api/v1/job-summary", post(handle_job_summary))
        .route(
            "/api/v1/extract-pdf",
            post(handle_extract_pdf).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/interview-prep", post(handle_interview_prep))
        .route("/api/v1/evaluate-answer", post(handle_evaluate_answer))
        .route("/api/v1/pricing", get(pricing::handle_pricing))
        .with_state(state)
}
