//! Scoring Normalizer: turns whatever the model returned for `analyze_resume`
//! into a fully populated `ResumeAnalysis`.
//!
//! Field-level defects are repaired in place and reported as `Repair`s. The
//! only hard failure is a payload that is not a JSON object.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::analysis::models::{
    score_label, KeywordMatch, Priority, ResumeAnalysis, ScoringBreakdown, Suggestion,
    ACHIEVEMENTS_MAX, EXPERIENCE_MAX, OVERALL_MAX, PRESENTATION_MAX, SCORE_LABELS, SKILLS_MAX,
};
use crate::llm_client::LlmError;

const DEFAULT_STRENGTHS: &[&str] = &[
    "Resume presents relevant professional experience for review",
    "Background shows transferable skills that can be aligned with the role",
];

const DEFAULT_WEAKNESSES: &[&str] = &[
    "Alignment with the job requirements could not be fully assessed",
    "Consider tailoring skills and achievements more closely to the job description",
];

/// One correction applied while normalizing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Repair {
    /// Numeric value outside its band, pulled back to the nearest bound.
    Clamped {
        field: &'static str,
        original: f64,
        value: u32,
    },
    /// Missing or non-numeric value replaced by 0.
    Coerced { field: &'static str },
    /// Value derived from other fields.
    Recomputed { field: &'static str },
    /// Missing, empty, or malformed value replaced by a default.
    Defaulted { field: &'static str },
}

#[derive(Default)]
struct Repairs(Vec<Repair>);

impl Repairs {
    fn push(&mut self, repair: Repair) {
        warn!(?repair, "Repairing analysis field");
        self.0.push(repair);
    }
}

enum Numeric {
    Number(f64),
    Missing,
    Invalid,
}

fn read_numeric(value: Option<&Value>) -> Numeric {
    let parsed = match value {
        None | Some(Value::Null) => return Numeric::Missing,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        Some(_) => None,
    };
    match parsed {
        Some(n) if n.is_finite() => Numeric::Number(n),
        _ => Numeric::Invalid,
    }
}

/// Finite number from a JSON number or numeric string (trailing `%` allowed).
pub(crate) fn as_number(value: Option<&Value>) -> Option<f64> {
    match read_numeric(value) {
        Numeric::Number(n) => Some(n),
        Numeric::Missing | Numeric::Invalid => None,
    }
}

fn clamp_score(field: &'static str, value: Option<&Value>, max: u32, repairs: &mut Repairs) -> u32 {
    match read_numeric(value) {
        Numeric::Number(n) => {
            let clamped = n.round().clamp(0.0, max as f64) as u32;
            if n < 0.0 || n > max as f64 {
                repairs.push(Repair::Clamped {
                    field,
                    original: n,
                    value: clamped,
                });
            }
            clamped
        }
        Numeric::Missing | Numeric::Invalid => {
            repairs.push(Repair::Coerced { field });
            0
        }
    }
}

/// Non-empty trimmed strings of a JSON array; `None` when `value` is not an array.
pub(crate) fn string_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items = value?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
            .collect(),
    )
}

fn non_empty_list(
    field: &'static str,
    value: Option<&Value>,
    defaults: &[&str],
    repairs: &mut Repairs,
) -> Vec<String> {
    match string_list(value) {
        Some(list) if !list.is_empty() => list,
        _ => {
            repairs.push(Repair::Defaulted { field });
            defaults.iter().map(|s| s.to_string()).collect()
        }
    }
}

fn optional_list(field: &'static str, value: Option<&Value>, repairs: &mut Repairs) -> Vec<String> {
    string_list(value).unwrap_or_else(|| {
        repairs.push(Repair::Defaulted { field });
        Vec::new()
    })
}

fn text(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key)
        .and_then(Value::as_str)
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

fn breakdown(value: Option<&Value>, repairs: &mut Repairs) -> ScoringBreakdown {
    let empty = Map::new();
    let obj = match value.and_then(Value::as_object) {
        Some(obj) => obj,
        None => {
            repairs.push(Repair::Defaulted {
                field: "scoringBreakdown",
            });
            &empty
        }
    };
    ScoringBreakdown {
        skills: clamp_score("scoringBreakdown.skills", obj.get("skills"), SKILLS_MAX, repairs),
        experience: clamp_score(
            "scoringBreakdown.experience",
            obj.get("experience"),
            EXPERIENCE_MAX,
            repairs,
        ),
        achievements: clamp_score(
            "scoringBreakdown.achievements",
            obj.get("achievements"),
            ACHIEVEMENTS_MAX,
            repairs,
        ),
        presentation: clamp_score(
            "scoringBreakdown.presentation",
            obj.get("presentation"),
            PRESENTATION_MAX,
            repairs,
        ),
    }
}

fn overall_score(value: Option<&Value>, breakdown: &ScoringBreakdown, repairs: &mut Repairs) -> u32 {
    match read_numeric(value) {
        Numeric::Number(_) => clamp_score("overallScore", value, OVERALL_MAX, repairs),
        Numeric::Missing | Numeric::Invalid => {
            repairs.push(Repair::Recomputed {
                field: "overallScore",
            });
            breakdown.total().min(OVERALL_MAX)
        }
    }
}

fn suggestions(value: Option<&Value>, repairs: &mut Repairs) -> Vec<Suggestion> {
    let Some(items) = value.and_then(Value::as_array) else {
        repairs.push(Repair::Defaulted {
            field: "suggestions",
        });
        return Vec::new();
    };
    items
        .iter()
        .filter_map(Value::as_object)
        .map(|obj| Suggestion {
            section: text(obj, "section"),
            issue: text(obj, "issue"),
            solution: text(obj, "solution"),
            priority: obj
                .get("priority")
                .and_then(Value::as_str)
                .and_then(|p| serde_json::from_value(Value::String(p.to_lowercase())).ok())
                .unwrap_or(Priority::Medium),
        })
        .filter(|s| !s.issue.is_empty() || !s.solution.is_empty())
        .collect()
}

fn keyword_match(value: Option<&Value>, repairs: &mut Repairs) -> KeywordMatch {
    let Some(obj) = value.and_then(Value::as_object) else {
        repairs.push(Repair::Defaulted {
            field: "keywordMatch",
        });
        return KeywordMatch::default();
    };
    let matched = string_list(obj.get("matched")).unwrap_or_default();
    let missing = string_list(obj.get("missing")).unwrap_or_default();
    let match_percentage = match read_numeric(obj.get("matchPercentage")) {
        Numeric::Number(_) => clamp_score(
            "keywordMatch.matchPercentage",
            obj.get("matchPercentage"),
            100,
            repairs,
        ),
        Numeric::Missing | Numeric::Invalid => {
            let total = matched.len() + missing.len();
            if total > 0 {
                repairs.push(Repair::Recomputed {
                    field: "keywordMatch.matchPercentage",
                });
                ((matched.len() as f64 / total as f64) * 100.0).round() as u32
            } else {
                0
            }
        }
    };
    KeywordMatch {
        matched,
        missing,
        match_percentage,
    }
}

/// Normalizes a raw `analyze_resume` payload.
///
/// Returns the repaired analysis and the list of repairs applied, in field order.
pub fn normalize_analysis(raw: &Value) -> Result<(ResumeAnalysis, Vec<Repair>), LlmError> {
    let obj = raw.as_object().ok_or_else(|| {
        LlmError::InvalidShape(format!(
            "analysis must be a JSON object, got {}",
            kind_of(raw)
        ))
    })?;
    let mut repairs = Repairs::default();

    let scoring_breakdown = breakdown(obj.get("scoringBreakdown"), &mut repairs);
    let overall_score = overall_score(obj.get("overallScore"), &scoring_breakdown, &mut repairs);

    let score_label = match obj.get("scoreLabel").and_then(Value::as_str).map(str::trim) {
        Some(label) if SCORE_LABELS.contains(&label) => label.to_string(),
        _ => {
            repairs.push(Repair::Recomputed {
                field: "scoreLabel",
            });
            score_label(overall_score).to_string()
        }
    };

    let analysis = ResumeAnalysis {
        overall_score,
        scoring_breakdown,
        score_justification: text(obj, "scoreJustification"),
        score_label,
        strengths: non_empty_list("strengths", obj.get("strengths"), DEFAULT_STRENGTHS, &mut repairs),
        weaknesses: non_empty_list(
            "weaknesses",
            obj.get("weaknesses"),
            DEFAULT_WEAKNESSES,
            &mut repairs,
        ),
        suggestions: suggestions(obj.get("suggestions"), &mut repairs),
        keyword_match: keyword_match(obj.get("keywordMatch"), &mut repairs),
        ats_issues: optional_list("atsIssues", obj.get("atsIssues"), &mut repairs),
    };

    Ok((analysis, repairs.0))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete() -> Value {
        json!({
            "overallScore": 72,
            "scoringBreakdown": {"skills": 30, "experience": 25, "achievements": 14, "presentation": 3},
            "scoreJustification": "Solid backend match.",
            "scoreLabel": "Good Match",
            "strengths": ["Rust in production"],
            "weaknesses": ["No Kubernetes"],
            "suggestions": [
                {"section": "Skills", "issue": "Missing k8s", "solution": "Add cluster work", "priority": "high"}
            ],
            "keywordMatch": {"matched": ["Rust"], "missing": ["Kubernetes"], "matchPercentage": 50},
            "atsIssues": []
        })
    }

    #[test]
    fn test_clean_payload_needs_no_repairs() {
        let (analysis, repairs) = normalize_analysis(&complete()).unwrap();
        assert!(repairs.is_empty(), "{repairs:?}");
        assert_eq!(analysis.overall_score, 72);
        assert_eq!(analysis.scoring_breakdown.total(), 72);
        assert_eq!(analysis.suggestions[0].priority, Priority::High);
        assert_eq!(analysis.keyword_match.match_percentage, 50);
    }

    #[test]
    fn test_overall_score_150_becomes_100() {
        let mut raw = complete();
        raw["overallScore"] = json!(150);
        let (analysis, repairs) = normalize_analysis(&raw).unwrap();
        assert_eq!(analysis.overall_score, 100);
        assert!(repairs.contains(&Repair::Clamped {
            field: "overallScore",
            original: 150.0,
            value: 100
        }));
    }

    #[test]
    fn test_breakdown_fields_clamped_independently() {
        let mut raw = complete();
        raw["scoringBreakdown"] = json!({"skills": 999, "experience": 20, "achievements": "12", "presentation": -3});
        let (analysis, repairs) = normalize_analysis(&raw).unwrap();
        assert_eq!(
            analysis.scoring_breakdown,
            ScoringBreakdown {
                skills: 40,
                experience: 20,
                achievements: 12,
                presentation: 0
            }
        );
        assert_eq!(repairs.len(), 2);
    }

    #[test]
    fn test_non_numeric_breakdown_coerces_to_zero() {
        let mut raw = complete();
        raw["scoringBreakdown"] = json!({"skills": "lots", "experience": null, "achievements": [1]});
        let (analysis, repairs) = normalize_analysis(&raw).unwrap();
        assert_eq!(analysis.scoring_breakdown, ScoringBreakdown::default());
        assert!(repairs.contains(&Repair::Coerced {
            field: "scoringBreakdown.presentation"
        }));
    }

    #[test]
    fn test_missing_overall_is_sum_of_clamped_breakdown() {
        let mut raw = complete();
        raw.as_object_mut().unwrap().remove("overallScore");
        raw["scoringBreakdown"]["skills"] = json!(55);
        let (analysis, repairs) = normalize_analysis(&raw).unwrap();
        assert_eq!(analysis.overall_score, 40 + 25 + 14 + 3);
        assert!(repairs.contains(&Repair::Recomputed {
            field: "overallScore"
        }));
    }

    #[test]
    fn test_non_numeric_overall_recomputed() {
        let mut raw = complete();
        raw["overallScore"] = json!("excellent");
        let (analysis, _) = normalize_analysis(&raw).unwrap();
        assert_eq!(analysis.overall_score, 72);
    }

    #[test]
    fn test_empty_strengths_get_defaults() {
        let mut raw = complete();
        raw["strengths"] = json!([]);
        raw["weaknesses"] = json!("not a list");
        let (analysis, repairs) = normalize_analysis(&raw).unwrap();
        assert!(!analysis.strengths.is_empty());
        assert!(!analysis.weaknesses.is_empty());
        assert!(repairs.contains(&Repair::Defaulted { field: "strengths" }));
        assert!(repairs.contains(&Repair::Defaulted { field: "weaknesses" }));
    }

    #[test]
    fn test_absent_collections_default_to_empty() {
        let raw = json!({"overallScore": 64, "strengths": ["a"], "weaknesses": ["b"]});
        let (analysis, repairs) = normalize_analysis(&raw).unwrap();
        assert!(analysis.suggestions.is_empty());
        assert!(analysis.ats_issues.is_empty());
        assert_eq!(analysis.keyword_match, KeywordMatch::default());
        assert_eq!(analysis.score_label, "Fair Match");
        assert!(repairs.contains(&Repair::Defaulted { field: "atsIssues" }));
        assert!(repairs.contains(&Repair::Recomputed { field: "scoreLabel" }));
    }

    #[test]
    fn test_match_percentage_derived_from_lists() {
        let mut raw = complete();
        raw["keywordMatch"] = json!({"matched": ["a", "b", "c"], "missing": ["d"]});
        let (analysis, _) = normalize_analysis(&raw).unwrap();
        assert_eq!(analysis.keyword_match.match_percentage, 75);
    }

    #[test]
    fn test_unknown_priority_defaults_to_medium() {
        let mut raw = complete();
        raw["suggestions"] = json!([
            {"section": "Summary", "issue": "Too long", "solution": "Trim", "priority": "URGENT"},
            "not an object",
            {"section": "Empty"}
        ]);
        let (analysis, _) = normalize_analysis(&raw).unwrap();
        assert_eq!(analysis.suggestions.len(), 1);
        assert_eq!(analysis.suggestions[0].priority, Priority::Medium);
    }

    #[test]
    fn test_non_object_payload_is_invalid_shape() {
        for raw in [json!("I cannot help with that"), json!([1, 2]), Value::Null] {
            let err = normalize_analysis(&raw).unwrap_err();
            assert!(matches!(err, LlmError::InvalidShape(_)));
        }
    }
}
