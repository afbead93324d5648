use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::skill::SkillToken;
use crate::models::text::NormalizedText;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub title: String,
    pub organization: String,
    pub start_date: Option<NaiveDate>,
    /// `None` with `is_current` set means "Present"; `None` alone means unparsable.
    pub end_date: Option<NaiveDate>,
    pub is_current: bool,
    pub bullets: Vec<String>,
}

impl ExperienceEntry {
    pub fn has_dates(&self) -> bool {
        self.start_date.is_some()
    }

    /// Title, organization and bullets as one lowercase blob for keyword lookups.
    pub fn searchable_text(&self) -> String {
        let mut text = format!("{} {}", self.title, self.organization);
        for bullet in &self.bullets {
            text.push(' ');
            text.push_str(bullet);
        }
        text.to_lowercase()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EducationEntry {
    pub institution: String,
    pub degree: String,
    pub field: String,
    pub graduation_date: Option<NaiveDate>,
}

impl EducationEntry {
    pub fn is_empty(&self) -> bool {
        self.institution.is_empty() && self.degree.is_empty() && self.field.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Contact,
    Experience,
    Education,
    Skills,
    Certifications,
    /// Summary, projects, interests and similar: segmented but not parsed.
    Other,
}

/// A section heading found in the document, as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedSection {
    pub kind: SectionKind,
    pub heading: String,
    /// Whether the heading is a name ATS parsers reliably recognize.
    pub standard: bool,
}

/// Structured resume produced by `parsing::parse_resume`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResumeRecord {
    pub contact: ContactInfo,
    #[serde(rename = "work_experience")]
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: BTreeSet<SkillToken>,
    pub certifications: BTreeSet<String>,
    pub sections: Vec<DetectedSection>,
    pub raw_text: NormalizedText,
}

impl ResumeRecord {
    pub fn has_section(&self, kind: SectionKind) -> bool {
        self.sections.iter().any(|s| s.kind == kind)
    }

    pub fn bullets(&self) -> impl Iterator<Item = &String> {
        self.experience.iter().flat_map(|e| e.bullets.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_searchable_text_lowercases_everything() {
        let entry = ExperienceEntry {
            title: "Backend Engineer".to_string(),
            organization: "Acme".to_string(),
            bullets: vec!["Built Kafka pipelines".to_string()],
            ..Default::default()
        };
        assert_eq!(entry.searchable_text(), "backend engineer acme built kafka pipelines");
    }

    #[test]
    fn test_record_serializes_work_experience_key() {
        let json = serde_json::to_value(ResumeRecord::default()).unwrap();
        assert!(json.get("work_experience").is_some());
        assert!(json.get("raw_text").is_some());
    }

    #[test]
    fn test_section_kind_snake_case() {
        let json = serde_json::to_string(&SectionKind::Certifications).unwrap();
        assert_eq!(json, r#""certifications""#);
    }
}
