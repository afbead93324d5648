use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::models::resume::ResumeRecord;
use crate::models::skill::SkillToken;

/// Outcome of scoring one resume against one job description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// `(ws * skill_score + we * experience_score) / (ws + we)`, 0 – 100
    pub overall_score: f64,
    #[serde(rename = "keyword_matches")]
    pub matched_keywords: BTreeSet<SkillToken>,
    /// Job keywords absent from the resume, most important first. No duplicates.
    pub missing_keywords: Vec<SkillToken>,
    pub skill_score: f64,
    pub experience_score: f64,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtsSeverity {
    /// Likely to make an ATS drop or mis-file the resume.
    Blocking,
    Warning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtsIssueKind {
    MissingEmail,
    NoSectionHeadings,
    NoSkillsSection,
    NoParsableDates,
    MissingPhone,
    NoExperienceSection,
    InsufficientText,
    NonStandardHeadings,
    UndatedEntries,
    MissingName,
    NoEducationSection,
    UnquantifiedBullets,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsIssue {
    pub kind: AtsIssueKind,
    pub severity: AtsSeverity,
    pub message: String,
    pub penalty: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtsScore {
    /// 100 minus the penalties of `issues`, floored at 0
    pub score: f64,
    pub issues: Vec<AtsIssue>,
}

impl AtsScore {
    pub fn blocking(&self) -> impl Iterator<Item = &AtsIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == AtsSeverity::Blocking)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &AtsIssue> {
        self.issues
            .iter()
            .filter(|i| i.severity == AtsSeverity::Warning)
    }
}

/// Full report for one resume, the JSON contract of the analyzer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub resume_path: String,
    pub overall_score: f64,
    /// Keywords recognized anywhere in the resume text.
    pub keywords: Vec<String>,
    pub recommendations: Vec<String>,
    pub ats_score: f64,
    pub ats_issues: Vec<String>,
    pub match_results: MatchResult,
    pub resume_data: ResumeRecord,
    pub analyzer_version: String,
}

/// One slot of a batch: a report, or the error that replaced it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BatchEntry {
    Report(Box<AnalysisReport>),
    Failed {
        error: String,
        code: String,
        resume_path: String,
    },
}

impl BatchEntry {
    /// Failed entries rank as zero.
    pub fn overall_score(&self) -> f64 {
        match self {
            BatchEntry::Report(report) => report.overall_score,
            BatchEntry::Failed { .. } => 0.0,
        }
    }

    pub fn resume_path(&self) -> &str {
        match self {
            BatchEntry::Report(report) => &report.resume_path,
            BatchEntry::Failed { resume_path, .. } => resume_path,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, BatchEntry::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_entry_serializes_flat() {
        let entry = BatchEntry::Failed {
            error: "File not found: a.pdf".to_string(),
            code: "FILE_NOT_FOUND".to_string(),
            resume_path: "a.pdf".to_string(),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["resume_path"], "a.pdf");
        assert_eq!(json["code"], "FILE_NOT_FOUND");
        assert_eq!(entry.overall_score(), 0.0);
        assert!(entry.is_error());
    }

    #[test]
    fn test_match_result_uses_keyword_matches_key() {
        let result = MatchResult {
            overall_score: 50.0,
            matched_keywords: BTreeSet::from([SkillToken::new("python")]),
            missing_keywords: vec![SkillToken::new("sql")],
            skill_score: 50.0,
            experience_score: 50.0,
            recommendations: vec![],
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["keyword_matches"][0], "python");
        assert_eq!(json["missing_keywords"][0], "sql");
    }

    #[test]
    fn test_ats_issue_filters() {
        let ats = AtsScore {
            score: 70.0,
            issues: vec![
                AtsIssue {
                    kind: AtsIssueKind::MissingPhone,
                    severity: AtsSeverity::Warning,
                    message: "phone".to_string(),
                    penalty: 10.0,
                },
                AtsIssue {
                    kind: AtsIssueKind::MissingEmail,
                    severity: AtsSeverity::Blocking,
                    message: "email".to_string(),
                    penalty: 20.0,
                },
            ],
        };
        assert_eq!(ats.blocking().count(), 1);
        assert_eq!(ats.warnings().next().unwrap().kind, AtsIssueKind::MissingPhone);
    }
}
