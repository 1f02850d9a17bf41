use serde::{Deserialize, Serialize};

/// Upper bound of each scoring band. The four bands sum to 100.
pub const SKILLS_MAX: u32 = 40;
pub const EXPERIENCE_MAX: u32 = 35;
pub const ACHIEVEMENTS_MAX: u32 = 20;
pub const PRESENTATION_MAX: u32 = 5;
pub const OVERALL_MAX: u32 = 100;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringBreakdown {
    pub skills: u32,
    pub experience: u32,
    pub achievements: u32,
    pub presentation: u32,
}

impl ScoringBreakdown {
    pub fn total(&self) -> u32 {
        self.skills + self.experience + self.achievements + self.presentation
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    #[default]
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub section: String,
    pub issue: String,
    pub solution: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMatch {
    pub matched: Vec<String>,
    pub missing: Vec<String>,
    pub match_percentage: u32,
}

/// A resume scored against one job description. Always fully populated:
/// see `validation::normalize_analysis`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeAnalysis {
    pub overall_score: u32,
    pub scoring_breakdown: ScoringBreakdown,
    pub score_justification: String,
    pub score_label: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub suggestions: Vec<Suggestion>,
    pub keyword_match: KeywordMatch,
    pub ats_issues: Vec<String>,
}

pub const SCORE_LABELS: [&str; 6] = [
    "Exceptional Match",
    "Strong Match",
    "Good Match",
    "Fair Match",
    "Weak Match",
    "Poor Match",
];

/// Label for an overall score on the 0-100 scale.
pub fn score_label(score: u32) -> &'static str {
    match score {
        90.. => "Exceptional Match",
        80..=89 => "Strong Match",
        70..=79 => "Good Match",
        60..=69 => "Fair Match",
        40..=59 => "Weak Match",
        _ => "Poor Match",
    }
}
