//! LLM passes over extracted resume text.

use serde::{Deserialize, Serialize};

use crate::extraction::prompts::{
    extract_content_tool, extract_data_tool, markdown_prompt, structured_prompt, MARKDOWN_SYSTEM,
    STRUCTURED_SYSTEM,
};
use crate::llm_client::types::ContentPart;
use crate::llm_client::{
    context_sizes, temperatures, CallOptions, LlmClient, LlmError, NormalizedResponse,
};
use crate::models::resume::ResumeData;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractedContent {
    pub markdown: String,
    pub summary: String,
    pub sections: Vec<String>,
}

/// A rendered page, base64 encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct PageImage {
    pub media_type: String,
    pub data: String,
}

/// Formats raw PDF text as markdown. Page images, when present, follow the
/// text in the same user message.
pub async fn extract_markdown(
    llm: &LlmClient,
    options: CallOptions,
    raw_text: &str,
    images: &[PageImage],
) -> Result<NormalizedResponse<ExtractedContent>, LlmError> {
    let options = options
        .with_system(MARKDOWN_SYSTEM)
        .with_max_tokens(context_sizes::LARGE)
        .with_temperature(temperatures::LOW);

    let mut parts = vec![ContentPart::Text(markdown_prompt(raw_text, !images.is_empty()))];
    parts.extend(images.iter().map(|image| ContentPart::Image {
        media_type: image.media_type.clone(),
        data: image.data.clone(),
    }));

    let response: NormalizedResponse<ExtractedContent> = llm
        .call_tool(parts, extract_content_tool(), options)
        .await?
        .into_typed()?;

    if response.data.markdown.trim().is_empty() {
        return Err(LlmError::InvalidShape(
            "extracted content has no markdown".to_string(),
        ));
    }
    tracing::info!(
        markdown_len = response.data.markdown.len(),
        sections = response.data.sections.len(),
        images = images.len(),
        "Resume markdown extracted"
    );
    Ok(response)
}

/// Parses resume text into `ResumeData`.
pub async fn extract_structured(
    llm: &LlmClient,
    options: CallOptions,
    resume_text: &str,
) -> Result<NormalizedResponse<ResumeData>, LlmError> {
    let options = options
        .with_system(STRUCTURED_SYSTEM)
        .with_max_tokens(context_sizes::LARGE)
        .with_temperature(temperatures::LOW);

    llm.call_tool(structured_prompt(resume_text), extract_data_tool(), options)
        .await?
        .into_typed()
}
