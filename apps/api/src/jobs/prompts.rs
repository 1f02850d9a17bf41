use serde_json::json;

use crate::llm_client::ToolDefinition;

pub const JOB_SUMMARY_SYSTEM: &str = "\
You are an expert recruiter. \
Summarize job descriptions accurately and concisely, keeping every hard requirement. \
Never invent requirements, salary figures, or company details that are not in the posting.";

pub fn job_summary_prompt(job_description: &str) -> String {
    format!(
        "Summarize this job description. Capture the role, core responsibilities, \
         required and preferred qualifications, and company context in at most 500 words.\n\n\
         JOB DESCRIPTION:\n{job_description}"
    )
}

pub fn summarize_job_tool() -> ToolDefinition {
    ToolDefinition::new(
        "summarize_job_description",
        "Analyzes and summarizes a job description, extracting key information",
        json!({
            "type": "object",
            "properties": {
                "summary": {
                    "type": "string",
                    "description": "A concise 2-3 paragraph summary of the role, responsibilities, and company (max 500 words)"
                },
                "keyRequirements": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Essential skills and qualifications required for the role"
                },
                "companyName": {"type": "string", "description": "Company name if mentioned in the job description"},
                "jobTitle": {"type": "string", "description": "Job title or position name"},
                "location": {"type": "string", "description": "Job location if mentioned"},
                "salaryRange": {"type": "string", "description": "Salary range if mentioned"}
            },
            "required": ["summary", "keyRequirements"]
        }),
    )
}
