//! Axum route handler for PDF upload and extraction.

use axum::{
    extract::{multipart::MultipartError, Multipart, State},
    Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::extraction::pdf_text::{extract_text, ExtractionStage};
use crate::extraction::service::{extract_markdown, extract_structured, ExtractedContent, PageImage};
use crate::models::metadata::ResponseMetadata;
use crate::models::resume::ResumeData;
use crate::state::AppState;

/// Parsed multipart form of an extraction request.
#[derive(Debug, Default)]
struct PdfUpload {
    file_name: String,
    bytes: Bytes,
    images: Vec<PageImage>,
    model: Option<String>,
    structured: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractPdfResponse {
    /// Text from the local extraction cascade.
    pub text: String,
    pub extraction_stage: ExtractionStage,
    pub ai_enhanced: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<ExtractedContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resume_data: Option<ResumeData>,
    #[serde(flatten)]
    pub metadata: Option<ResponseMetadata>,
}

fn bad_form(e: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid multipart body: {}", e.body_text()))
}

fn is_pdf(file_name: &str, content_type: Option<&str>) -> bool {
    content_type == Some("application/pdf") || file_name.to_ascii_lowercase().ends_with(".pdf")
}

async fn read_upload(mut multipart: Multipart) -> Result<PdfUpload, AppError> {
    let mut upload = PdfUpload::default();
    let mut has_file = false;

    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload.pdf").to_string();
                if !is_pdf(&file_name, field.content_type()) {
                    return Err(AppError::Validation("file must be a PDF".to_string()));
                }
                upload.file_name = file_name;
                upload.bytes = field.bytes().await.map_err(bad_form)?;
                has_file = true;
            }
            "image" => {
                let media_type = field.content_type().unwrap_or("image/png").to_string();
                if !media_type.starts_with("image/") {
                    return Err(AppError::Validation(format!(
                        "image parts must be images, got {media_type}"
                    )));
                }
                let bytes = field.bytes().await.map_err(bad_form)?;
                upload.images.push(PageImage {
                    media_type,
                    data: BASE64.encode(&bytes),
                });
            }
            "model" => {
                let model = field.text().await.map_err(bad_form)?;
                upload.model = Some(model.trim().to_string()).filter(|m| !m.is_empty());
            }
            "structured" => {
                let flag = field.text().await.map_err(bad_form)?;
                upload.structured = matches!(flag.trim(), "true" | "1");
            }
            other => warn!(field = other, "Ignoring unknown multipart field"),
        }
    }

    if !has_file || upload.bytes.is_empty() {
        return Err(AppError::Validation("file cannot be empty".to_string()));
    }
    Ok(upload)
}

/// POST /api/v1/extract-pdf
///
/// Runs the local text cascade, then asks the model to format the text
/// (with page images when supplied). Model failures degrade to the cascade
/// text with `aiEnhanced=false`.
pub async fn handle_extract_pdf(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<ExtractPdfResponse>, AppError> {
    let upload = read_upload(multipart).await?;
    let target = state.llm_for(upload.model.as_deref())?;

    info!(
        file_name = %upload.file_name,
        size = upload.bytes.len(),
        images = upload.images.len(),
        "Extracting PDF"
    );

    let file_name = upload.file_name.clone();
    let bytes = upload.bytes;
    let extracted = tokio::task::spawn_blocking(move || extract_text(&bytes, &file_name))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("PDF extraction task failed: {e}")))?;

    let mut response = ExtractPdfResponse {
        text: extracted.text,
        extraction_stage: extracted.stage,
        ai_enhanced: false,
        content: None,
        resume_data: None,
        metadata: None,
    };

    if extracted.stage == ExtractionStage::Placeholder && upload.images.is_empty() {
        info!("No readable text and no page images, skipping AI extraction");
        return Ok(Json(response));
    }

    let markdown =
        extract_markdown(target.client, target.options(), &response.text, &upload.images).await;
    match markdown {
        Ok(result) => {
            ResponseMetadata::record(&mut response.metadata, &target.model, &result);
            response.content = Some(result.data);
            response.ai_enhanced = true;
        }
        Err(e) => warn!(error = %e, "AI extraction failed, returning cascade text"),
    }

    if upload.structured {
        let source = response
            .content
            .as_ref()
            .map_or(response.text.as_str(), |c| c.markdown.as_str());
        let structured = extract_structured(target.client, target.options(), source).await;
        match structured {
            Ok(result) => {
                ResponseMetadata::record(&mut response.metadata, &target.model, &result);
                response.resume_data = Some(result.data);
                response.ai_enhanced = true;
            }
            Err(e) => warn!(error = %e, "Structured resume extraction failed"),
        }
    }

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pdf_detection() {
        assert!(is_pdf("Resume.PDF", None));
        assert!(is_pdf("upload", Some("application/pdf")));
        assert!(!is_pdf("resume.docx", Some("application/msword")));
    }
}
