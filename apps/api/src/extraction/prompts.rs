use serde_json::json;

use crate::llm_client::prompts::TRUTHFULNESS_INSTRUCTION;
use crate::llm_client::ToolDefinition;

pub const MARKDOWN_SYSTEM: &str = "\
You are an expert resume parser and markdown formatter. \
You receive text extracted from a resume PDF and, when available, images of its pages.

Format ALL of the content as clean, professional markdown:
- # for the person's name
- ## for major sections (EXPERIENCE, EDUCATION, SKILLS, ...)
- ### for job titles, companies, or subsections
- **bold** for contact details, company names, and dates
- - for bullet points
- markdown tables for tabular content

Use the page images to recover layout: columns, headers, section breaks, and emphasis. \
Combine multiple pages into one coherent document. Never drop contact information, dates, or skills.";

pub const STRUCTURED_SYSTEM: &str = "\
You are a precise resume data extractor. \
Extract the resume into structured fields exactly as written.";

pub fn markdown_prompt(raw_text: &str, has_images: bool) -> String {
    let visual = if has_images {
        "Images of the PDF pages follow the text; use them for layout and formatting context.\n\n"
    } else {
        ""
    };
    format!(
        "Please process this extracted resume text and format it as clean, professional markdown.\n\
         {visual}\
         RAW EXTRACTED TEXT:\n{raw_text}\n\n\
         Return the markdown, a brief summary of the resume, and the list of main sections.\n\n\
         {TRUTHFULNESS_INSTRUCTION}"
    )
}

pub fn structured_prompt(resume_text: &str) -> String {
    format!(
        "Extract structured data from this resume.\n\n\
         RESUME:\n{resume_text}\n\n\
         {TRUTHFULNESS_INSTRUCTION}"
    )
}

pub fn extract_content_tool() -> ToolDefinition {
    ToolDefinition::new(
        "extract_resume_content",
        "Extracts and formats resume content from PDF as clean, professional markdown",
        json!({
            "type": "object",
            "properties": {
                "markdown": {"type": "string", "description": "The extracted content formatted as clean markdown"},
                "summary": {"type": "string", "description": "A brief summary of the resume content"},
                "sections": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Array of main sections found in the resume"
                }
            },
            "required": ["markdown", "summary", "sections"]
        }),
    )
}

pub fn extract_data_tool() -> ToolDefinition {
    let strings = json!({"type": "array", "items": {"type": "string"}});
    ToolDefinition::new(
        "extract_resume_data",
        "Extract structured data from a resume PDF",
        json!({
            "type": "object",
            "properties": {
                "personalInfo": {
                    "type": "object",
                    "properties": {
                        "name": {"type": "string"},
                        "email": {"type": "string"},
                        "phone": {"type": "string"},
                        "location": {"type": "string"},
                        "linkedin": {"type": "string"},
                        "github": {"type": "string"},
                        "website": {"type": "string"}
                    },
                    "required": ["name"]
                },
                "summary": {"type": "string"},
                "experience": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "title": {"type": "string"},
                            "company": {"type": "string"},
                            "location": {"type": "string"},
                            "startDate": {"type": "string"},
                            "endDate": {"type": "string"},
                            "description": strings,
                            "achievements": strings
                        },
                        "required": ["title", "company", "startDate", "endDate"]
                    }
                },
                "education": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "degree": {"type": "string"},
                            "school": {"type": "string"},
                            "location": {"type": "string"},
                            "graduationDate": {"type": "string"},
                            "gpa": {"type": "string"},
                            "honors": strings
                        },
                        "required": ["degree", "school"]
                    }
                },
                "skills": {
                    "type": "object",
                    "properties": {
                        "technical": strings,
                        "soft": strings,
                        "languages": strings
                    }
                },
                "certifications": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "issuer": {"type": "string"},
                            "date": {"type": "string"}
                        },
                        "required": ["name", "issuer"]
                    }
                },
                "projects": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "description": {"type": "string"},
                            "technologies": strings,
                            "url": {"type": "string"}
                        },
                        "required": ["name", "description"]
                    }
                }
            },
            "required": ["personalInfo", "experience", "education", "skills"]
        }),
    )
}
