// Resume analysis and optimization prompts and tool schemas.

use serde_json::json;

use crate::analysis::models::ResumeAnalysis;
use crate::llm_client::prompts::TRUTHFULNESS_INSTRUCTION;
use crate::llm_client::ToolDefinition;

pub const ANALYSIS_SYSTEM: &str = "\
You are an expert resume reviewer and career coach. \
Analyze a resume against a specific job description and give brutally honest, actionable feedback. \
Use the FULL range of scores from 0-100; do not default to safe middle scores.

SCORING RUBRIC (the four bands sum to 100):
- skills (0-40): start at 40; -5 per missing required skill, -2 per missing preferred skill, \
-3 per skill without evidence of proficiency.
- experience (0-35): start at 35; -5 to -10 for a similar role in a different industry, \
-10 to -15 for a different role with similar skills, -3 per year of experience short.
- achievements (0-20): start at 0; +4 per quantified achievement relevant to the job, \
+2 per achievement without metrics.
- presentation (0-5): start at 5; -2 for poor formatting, -1 per typo, -1 per missing key section.

overallScore is the sum of the four bands. \
scoreLabel is one of: Exceptional Match (90+), Strong Match (80-89), Good Match (70-79), \
Fair Match (60-69), Weak Match (40-59), Poor Match (below 40). \
scoreJustification explains the score in markdown and lists quick wins that take under five minutes.";

pub const OPTIMIZATION_SYSTEM: &str = "\
You are an expert resume optimizer and career coach. \
Optimize resume data for ATS systems and the target job while staying truthful to the original. \
Keep it concise: a resume, not a novel, at most 1000 words.";

pub fn analysis_prompt(resume_text: &str, job_description: &str) -> String {
    format!(
        "Please analyze this resume against the job description and provide detailed feedback.\n\n\
         RESUME:\n{resume_text}\n\n\
         JOB DESCRIPTION:\n{job_description}\n\n\
         Be thorough and honest in your assessment."
    )
}

pub fn optimization_prompt(
    resume_text: &str,
    job_description: &str,
    analysis: Option<&ResumeAnalysis>,
) -> String {
    let mut prompt = format!(
        "Optimize the following resume for the target job description.\n\n\
         TARGET JOB DESCRIPTION:\n{job_description}\n\n\
         BASE RESUME:\n{resume_text}\n"
    );

    if let Some(a) = analysis {
        let first = |items: &[String], n: usize| {
            items.iter().take(n).cloned().collect::<Vec<_>>().join(", ")
        };
        prompt.push_str(&format!(
            "\nANALYSIS INSIGHTS:\n\
             - Overall Score: {}%\n\
             - Key Strengths: {}\n\
             - Areas for Improvement: {}\n\
             - Matched Keywords: {}\n\
             - Missing Keywords: {}\n",
            a.overall_score,
            first(&a.strengths, 3),
            first(&a.weaknesses, 3),
            first(&a.keyword_match.matched, 5),
            first(&a.keyword_match.missing, 5),
        ));
    }

    prompt.push_str(
        "\nOptimizations to apply:\n\
         1. Naturally incorporate missing keywords from the job description.\n\
         2. Quantify achievements where the resume supports it.\n\
         3. Prioritize the technical and soft skills the job asks for.\n\
         4. Emphasize the most relevant experience and responsibilities.\n\
         5. Write a summary that matches the job requirements.\n\
         6. Keep dates in MM/YYYY format.\n\n",
    );
    prompt.push_str(TRUTHFULNESS_INSTRUCTION);
    prompt
}

fn string_array() -> serde_json::Value {
    json!({"type": "array", "items": {"type": "string"}})
}

pub fn analyze_resume_tool() -> ToolDefinition {
    ToolDefinition::new(
        "analyze_resume",
        "Scores a resume against a job description and lists strengths, weaknesses and fixes",
        json!({
            "type": "object",
            "properties": {
                "overallScore": {"type": "number", "description": "Total score 0-100"},
                "scoringBreakdown": {
                    "type": "object",
                    "properties": {
                        "skills": {"type": "number", "description": "0-40"},
                        "experience": {"type": "number", "description": "0-35"},
                        "achievements": {"type": "number", "description": "0-20"},
                        "presentation": {"type": "number", "description": "0-5"}
                    },
                    "required": ["skills", "experience", "achievements", "presentation"]
                },
                "scoreJustification": {"type": "string"},
                "scoreLabel": {
                    "type": "string",
                    "enum": ["Exceptional Match", "Strong Match", "Good Match", "Fair Match", "Weak Match", "Poor Match"]
                },
                "strengths": string_array(),
                "weaknesses": string_array(),
                "suggestions": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "section": {"type": "string"},
                            "issue": {"type": "string"},
                            "solution": {"type": "string"},
                            "priority": {"type": "string", "enum": ["critical", "high", "medium", "low"]}
                        },
                        "required": ["section", "issue", "solution", "priority"]
                    }
                },
                "keywordMatch": {
                    "type": "object",
                    "properties": {
                        "matched": string_array(),
                        "missing": string_array(),
                        "matchPercentage": {"type": "number"}
                    }
                },
                "atsIssues": string_array()
            },
            "required": ["overallScore", "scoringBreakdown", "scoreLabel", "strengths", "weaknesses", "suggestions", "keywordMatch"]
        }),
    )
}

pub fn optimize_resume_tool() -> ToolDefinition {
    ToolDefinition::new(
        "optimize_resume_data",
        "Optimizes resume data for ATS systems and job requirements while maintaining truthfulness",
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
                        "website": {"type": "string"},
                        "jobTitle": {"type": "string"}
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
                            "startDate": {"type": "string"},
                            "endDate": {"type": "string"},
                            "location": {"type": "string"},
                            "achievements": string_array(),
                            "description": string_array()
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
                            "graduationDate": {"type": "string"},
                            "gpa": {"type": "string"},
                            "location": {"type": "string"},
                            "honors": string_array()
                        },
                        "required": ["degree", "school"]
                    }
                },
                "skills": {
                    "type": "object",
                    "properties": {
                        "technical": string_array(),
                        "soft": string_array(),
                        "languages": string_array()
                    }
                },
                "certifications": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "name": {"type": "string"},
                            "issuer": {"type": "string"},
                            "date": {"type": "string"},
                            "expirationDate": {"type": "string"}
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
                            "technologies": string_array(),
                            "url": {"type": "string"}
                        },
                        "required": ["name", "description"]
                    }
                }
            },
            "required": ["personalInfo"]
        }),
    )
}
