use serde::{Deserialize, Serialize};

/// Structured resume produced by PDF extraction and by resume optimization.
///
/// Every field beyond `personal_info` is optional on the wire; models routinely
/// omit sections that the source document does not have.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeData {
    pub personal_info: PersonalInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub experience: Vec<Experience>,
    #[serde(default)]
    pub education: Vec<Education>,
    #[serde(default)]
    pub skills: Skills,
    #[serde(default)]
    pub certifications: Vec<Certification>,
    #[serde(default)]
    pub projects: Vec<Project>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalInfo {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github: Option<String>,
    #[serde(default, alias = "portfolio", skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    #[serde(default)]
    pub degree: String,
    #[serde(default)]
    pub school: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub graduation_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gpa: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default)]
    pub honors: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Skills {
    #[serde(default)]
    pub technical: Vec<String>,
    #[serde(default)]
    pub soft: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Certification {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub issuer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default, alias = "link", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl ResumeData {
    /// Flattens the resume into the plain-text block used in prompts.
    pub fn to_prompt_text(&self) -> String {
        let mut out = String::new();
        let info = &self.personal_info;
        out.push_str(&format!("Name: {}\n", info.name));
        if let Some(title) = &info.job_title {
            out.push_str(&format!("Title: {title}\n"));
        }
        if let Some(summary) = self.summary.as_deref().filter(|s| !s.is_empty()) {
            out.push_str(&format!("\nSummary:\n{summary}\n"));
        }

        if !self.experience.is_empty() {
            out.push_str("\nExperience:\n");
            for exp in &self.experience {
                out.push_str(&format!(
                    "- {} at {} ({} - {})\n",
                    exp.title, exp.company, exp.start_date, exp.end_date
                ));
                for line in exp.description.iter().chain(&exp.achievements) {
                    out.push_str(&format!("  * {line}\n"));
                }
            }
        }

        if !self.education.is_empty() {
            out.push_str("\nEducation:\n");
            for edu in &self.education {
                out.push_str(&format!("- {}, {}", edu.degree, edu.school));
                if let Some(date) = &edu.graduation_date {
                    out.push_str(&format!(" ({date})"));
                }
                out.push('\n');
            }
        }

        let skills: Vec<&str> = self
            .skills
            .technical
            .iter()
            .chain(&self.skills.soft)
            .chain(&self.skills.languages)
            .map(String::as_str)
            .collect();
        if !skills.is_empty() {
            out.push_str(&format!("\nSkills: {}\n", skills.join(", ")));
        }

        if !self.projects.is_empty() {
            out.push_str("\nProjects:\n");
            for p in &self.projects {
                out.push_str(&format!("- {}: {}\n", p.name, p.description));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sparse_resume_deserializes() {
        let data: ResumeData = serde_json::from_value(json!({
            "personalInfo": {"name": "Jane Doe", "portfolio": "https://jane.dev"},
            "experience": [{"title": "Engineer", "company": "Acme", "startDate": "2020", "endDate": "Present"}],
            "projects": [{"name": "roaster", "description": "CLI", "link": "https://x"}]
        }))
        .unwrap();

        assert_eq!(data.personal_info.name, "Jane Doe");
        assert_eq!(data.personal_info.website.as_deref(), Some("https://jane.dev"));
        assert!(data.experience[0].achievements.is_empty());
        assert!(data.skills.technical.is_empty());
        assert_eq!(data.projects[0].url.as_deref(), Some("https://x"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let data = ResumeData {
            personal_info: PersonalInfo {
                name: "A".to_string(),
                job_title: Some("SRE".to_string()),
                ..Default::default()
            },
            ..Default::default()
        };
        let wire = serde_json::to_value(&data).unwrap();
        assert_eq!(wire["personalInfo"]["jobTitle"], "SRE");
        assert!(wire["personalInfo"].get("email").is_none());
    }

    #[test]
    fn test_prompt_text_lists_sections() {
        let data = ResumeData {
            personal_info: PersonalInfo {
                name: "Jane".to_string(),
                ..Default::default()
            },
            experience: vec![Experience {
                title: "Engineer".to_string(),
                company: "Acme".to_string(),
                start_date: "2021".to_string(),
                end_date: "2023".to_string(),
                achievements: vec!["Cut p99 latency 40%".to_string()],
                ..Default::default()
            }],
            skills: Skills {
                technical: vec!["Rust".to_string(), "SQL".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };
        let text = data.to_prompt_text();
        assert!(text.contains("Name: Jane"));
        assert!(text.contains("- Engineer at Acme (2021 - 2023)"));
        assert!(text.contains("  * Cut p99 latency 40%"));
        assert!(text.contains("Skills: Rust, SQL"));
    }
}
