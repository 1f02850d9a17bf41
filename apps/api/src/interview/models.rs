use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionCategory {
    Behavioral,
    Technical,
    Situational,
    #[default]
    General,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewQuestion {
    pub id: String,
    pub question: String,
    pub category: QuestionCategory,
    pub difficulty: Difficulty,
    pub suggested_answer: String,
    pub tips: Vec<String>,
    pub follow_up_questions: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewPrep {
    pub questions: Vec<InterviewQuestion>,
    pub overall_tips: Vec<String>,
    pub company_research: Vec<String>,
    pub salary_negotiation: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEvaluation {
    /// 0-100.
    pub score: u32,
    pub overall_feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub missing_key_points: Vec<String>,
    pub suggestions: Vec<String>,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn question(
    id: &str,
    text: &str,
    category: QuestionCategory,
    difficulty: Difficulty,
    suggested_answer: &str,
    tips: &[&str],
    follow_up_questions: &[&str],
) -> InterviewQuestion {
    InterviewQuestion {
        id: id.to_string(),
        question: text.to_string(),
        category,
        difficulty,
        suggested_answer: suggested_answer.to_string(),
        tips: owned(tips),
        follow_up_questions: owned(follow_up_questions),
    }
}

impl InterviewPrep {
    /// Generic question set served when generation fails.
    pub fn fallback() -> Self {
        Self {
            questions: vec![
                question(
                    "fallback_1",
                    "Tell me about yourself and your professional background.",
                    QuestionCategory::General,
                    Difficulty::Easy,
                    "Give a concise overview of your professional journey, highlighting the experience and skills most relevant to the role.",
                    &[
                        "Keep your answer to 2-3 minutes",
                        "Focus on professional experience, not personal details",
                        "Connect your background to the role you're applying for",
                    ],
                    &[
                        "What motivated you to pursue this career path?",
                        "How does this role fit into your career goals?",
                    ],
                ),
                question(
                    "fallback_2",
                    "What are your greatest strengths?",
                    QuestionCategory::General,
                    Difficulty::Easy,
                    "Pick 2-3 strengths that matter for this job and back each with a specific example.",
                    &[
                        "Use concrete examples to demonstrate each strength",
                        "Choose strengths that match the job requirements",
                        "Be authentic and avoid generic answers",
                    ],
                    &[],
                ),
                question(
                    "fallback_3",
                    "Describe a challenging situation you faced at work and how you handled it.",
                    QuestionCategory::Behavioral,
                    Difficulty::Medium,
                    "Structure the answer with the STAR method: Situation, Task, Action, Result.",
                    &[
                        "Choose a real example that shows problem solving",
                        "Focus on your own actions and the outcome",
                        "Show what you learned from the experience",
                    ],
                    &[],
                ),
            ],
            overall_tips: owned(&[
                "Research the company and role thoroughly before the interview",
                "Prepare specific examples that demonstrate your skills and achievements",
                "Practice your answers out loud to improve delivery",
                "Prepare thoughtful questions to ask the interviewer",
            ]),
            company_research: owned(&[
                "Review the company website, mission, and recent news",
                "Understand the company culture and values",
                "Look up recent company achievements or challenges",
            ]),
            salary_negotiation: owned(&[
                "Research market rates for similar positions in your area",
                "Consider the total compensation package, not just salary",
                "Be prepared to justify your expectations with examples",
            ]),
        }
    }
}

impl AnswerEvaluation {
    /// Neutral evaluation returned when the model's payload cannot be parsed.
    pub fn fallback() -> Self {
        Self {
            score: 50,
            overall_feedback: "Your answer could not be evaluated automatically. Review it against the suggested answer.".to_string(),
            strengths: owned(&["You provided an answer to the question"]),
            improvements: owned(&["Compare your answer with the suggested answer framework"]),
            missing_key_points: Vec::new(),
            suggestions: owned(&["Use the STAR method to structure behavioral answers"]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_set_is_complete() {
        let prep = InterviewPrep::fallback();
        assert_eq!(prep.questions.len(), 3);
        assert!(prep.questions.iter().all(|q| !q.id.is_empty() && !q.tips.is_empty()));
        assert!(!prep.overall_tips.is_empty());
    }

    #[test]
    fn test_question_wire_format() {
        let json = serde_json::to_value(&InterviewPrep::fallback().questions[2]).unwrap();
        assert_eq!(json["category"], "behavioral");
        assert_eq!(json["difficulty"], "medium");
        assert!(json["suggestedAnswer"].is_string());
        assert!(json["followUpQuestions"].is_array());
    }
}
