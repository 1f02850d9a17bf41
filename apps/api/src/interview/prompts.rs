// Interview prep and answer evaluation prompts and tool schemas.

use serde_json::json;

use crate::analysis::models::ResumeAnalysis;
use crate::llm_client::ToolDefinition;
use crate::models::resume::ResumeData;

pub const INTERVIEW_PREP_SYSTEM: &str = "\
You are an expert interview coach who prepares candidates for technical and behavioral interviews. \
Write hyper-personalized questions that an interviewer at THIS company would actually ask.

RULES:
1. Never generate generic questions such as \"Tell me about yourself\".
2. Reference specific details from the resume: companies, projects, technologies, achievements.
3. Align every question with the job requirements and company context.
4. Include follow-up questions that drill deeper into specific experiences.
5. Match question depth to the candidate's seniority.

Generate 8-12 questions across the behavioral, technical, situational, and general categories. \
Each suggestedAnswer is an answer framework naming the examples the candidate should mention.";

pub const EVALUATION_SYSTEM: &str = "\
You are an experienced interviewer evaluating a candidate's practice answer. \
Score from 0 to 100 and keep feedback concise and actionable.";

pub fn interview_prep_prompt(
    resume: &ResumeData,
    job_description: Option<&str>,
    analysis: Option<&ResumeAnalysis>,
) -> String {
    let mut prompt = format!(
        "CANDIDATE RESUME:\n{}\n\n",
        resume.to_prompt_text()
    );

    match job_description.map(str::trim).filter(|jd| !jd.is_empty()) {
        Some(jd) => prompt.push_str(&format!(
            "TARGET JOB DESCRIPTION:\n{jd}\n\n\
             Create questions a hiring manager at this company would ask, based on the \
             candidate's background, the exact requirements of this posting, and the gaps \
             between the two.\n"
        )),
        None => prompt.push_str(
            "No job description was provided. Create questions based on the candidate's \
             background, common interview patterns for their role, and the depth of their \
             claimed expertise.\n",
        ),
    }

    if let Some(a) = analysis {
        prompt.push_str(&format!(
            "\nRESUME ANALYSIS INSIGHTS:\n\
             - Strengths: {}\n\
             - Weaknesses: {}\n\
             - Missing Keywords: {}\n\
             Probe the weaknesses and let the candidate showcase the strengths.\n",
            a.strengths.join("; "),
            a.weaknesses.join("; "),
            a.keyword_match.missing.join(", "),
        ));
    }
    prompt
}

/// Practice answer plus the reference material it is scored against.
#[derive(Debug, Clone)]
pub struct AnswerToEvaluate<'a> {
    pub question: &'a str,
    pub user_answer: &'a str,
    pub suggested_answer: &'a str,
    pub tips: &'a [String],
    pub category: Option<&'a str>,
    pub difficulty: Option<&'a str>,
}

pub fn evaluation_prompt(answer: &AnswerToEvaluate<'_>) -> String {
    let tips = if answer.tips.is_empty() {
        String::new()
    } else {
        let numbered: Vec<String> = answer
            .tips
            .iter()
            .enumerate()
            .map(|(i, tip)| format!("{}. {tip}", i + 1))
            .collect();
        format!("TIPS TO CONSIDER:\n{}\n\n", numbered.join("\n"))
    };

    format!(
        "Please evaluate this interview answer:\n\n\
         INTERVIEW QUESTION:\n{}\n\n\
         QUESTION CATEGORY: {}\n\
         DIFFICULTY LEVEL: {}\n\n\
         USER'S ANSWER:\n{}\n\n\
         SUGGESTED ANSWER (for reference):\n{}\n\n\
         {tips}\
         Judge content relevance, structure, use of specific examples, and alignment with \
         best practice for this type of question. Give at most 3 strengths, improvements, \
         missing key points, and suggestions each, and keep overall feedback to 1-2 sentences.",
        answer.question,
        answer.category.unwrap_or("general"),
        answer.difficulty.unwrap_or("medium"),
        answer.user_answer,
        answer.suggested_answer,
    )
}

pub fn interview_prep_tool() -> ToolDefinition {
    let strings = json!({"type": "array", "items": {"type": "string"}});
    ToolDefinition::new(
        "generate_interview_prep",
        "Generate personalized interview questions and preparation advice",
        json!({
            "type": "object",
            "properties": {
                "questions": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {
                            "id": {"type": "string"},
                            "question": {"type": "string"},
                            "category": {"type": "string", "enum": ["behavioral", "technical", "situational", "general"]},
                            "difficulty": {"type": "string", "enum": ["easy", "medium", "hard"]},
                            "suggestedAnswer": {"type": "string"},
                            "tips": strings,
                            "followUpQuestions": strings
                        },
                        "required": ["question", "category", "difficulty", "suggestedAnswer", "tips"]
                    }
                },
                "overallTips": strings,
                "companyResearch": strings,
                "salaryNegotiation": strings
            },
            "required": ["questions", "overallTips"]
        }),
    )
}

pub fn evaluate_answer_tool() -> ToolDefinition {
    let strings = json!({"type": "array", "items": {"type": "string"}});
    ToolDefinition::new(
        "evaluate_interview_answer",
        "Evaluate a practice interview answer",
        json!({
            "type": "object",
            "properties": {
                "score": {"type": "number", "minimum": 0, "maximum": 100},
                "overallFeedback": {"type": "string"},
                "strengths": strings,
                "improvements": strings,
                "missingKeyPoints": strings,
                "suggestions": strings
            },
            "required": ["score", "overallFeedback", "strengths", "improvements", "missingKeyPoints", "suggestions"]
        }),
    )
}
