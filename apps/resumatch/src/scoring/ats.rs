//! ATS Compatibility Scorer — how reliably an applicant tracking system can
//! read the resume.
//!
//! Starts at 100 and applies one fixed deduction per detected issue
//! (`AtsPenalties`), floored at 0. Issues are reported blocking-first, in the
//! order the checks run.

use crate::config::AtsPenalties;
use crate::models::{AtsIssue, AtsIssueKind, AtsScore, AtsSeverity, ResumeRecord, SectionKind};

/// Share of bullets that must carry a metric before the warning goes away.
const QUANTIFIED_SHARE: f64 = 0.5;

pub struct AtsScorer {
    penalties: AtsPenalties,
    min_word_count: usize,
}

impl AtsScorer {
    pub fn new(penalties: AtsPenalties, min_word_count: usize) -> Self {
        Self {
            penalties,
            min_word_count,
        }
    }

    pub fn score(&self, resume: &ResumeRecord) -> AtsScore {
        let p = &self.penalties;
        let mut issues = Vec::new();
        let mut flag = |kind: AtsIssueKind, severity: AtsSeverity, penalty: f64, message: String| {
            issues.push(AtsIssue {
                kind,
                severity,
                message,
                penalty,
            });
        };

        let dated = resume.experience.iter().filter(|e| e.has_dates()).count();
        let has_experience =
            resume.has_section(SectionKind::Experience) || !resume.experience.is_empty();

        // ── blocking ────────────────────────────────────────────────────────
        if resume.contact.email.is_none() {
            flag(
                AtsIssueKind::MissingEmail,
                AtsSeverity::Blocking,
                p.missing_email,
                "Add an email address to your contact details; ATS systems use it to identify you."
                    .to_string(),
            );
        }
        if resume.sections.is_empty() {
            flag(
                AtsIssueKind::NoSectionHeadings,
                AtsSeverity::Blocking,
                p.no_section_headings,
                "Use clear section headings such as Experience, Education and Skills so the resume can be parsed."
                    .to_string(),
            );
        }
        if !resume.has_section(SectionKind::Skills) {
            flag(
                AtsIssueKind::NoSkillsSection,
                AtsSeverity::Blocking,
                p.no_skills_section,
                "Add a Skills section listing your technical skills.".to_string(),
            );
        }
        if has_experience && dated == 0 {
            flag(
                AtsIssueKind::NoParsableDates,
                AtsSeverity::Blocking,
                p.no_parsable_dates,
                "Add dates to your experience entries in a standard format such as 'Jan 2020 - Present'."
                    .to_string(),
            );
        }

        // ── warnings ────────────────────────────────────────────────────────
        if resume.contact.phone.is_none() {
            flag(
                AtsIssueKind::MissingPhone,
                AtsSeverity::Warning,
                p.missing_phone,
                "Add a phone number to your contact details.".to_string(),
            );
        }
        if !resume.has_section(SectionKind::Experience) {
            flag(
                AtsIssueKind::NoExperienceSection,
                AtsSeverity::Warning,
                p.no_experience_section,
                "Add a Work Experience section.".to_string(),
            );
        }
        let words = resume.raw_text.word_count();
        if words < self.min_word_count {
            flag(
                AtsIssueKind::InsufficientText,
                AtsSeverity::Warning,
                p.insufficient_text,
                format!(
                    "The resume has only {words} readable words; add more detail or check that the text is not embedded in images."
                ),
            );
        }
        let non_standard: Vec<&str> = resume
            .sections
            .iter()
            .filter(|s| !s.standard)
            .map(|s| s.heading.as_str())
            .collect();
        if !non_standard.is_empty() {
            flag(
                AtsIssueKind::NonStandardHeadings,
                AtsSeverity::Warning,
                p.non_standard_headings,
                format!(
                    "Rename non-standard section headings ({}) to common names like 'Work Experience' or 'Skills'.",
                    non_standard.join(", ")
                ),
            );
        }
        if dated > 0 && dated < resume.experience.len() {
            flag(
                AtsIssueKind::UndatedEntries,
                AtsSeverity::Warning,
                p.undated_entries,
                format!(
                    "{} experience entries have no dates; add a start and end date to each role.",
                    resume.experience.len() - dated
                ),
            );
        }
        if resume.contact.name.is_none() {
            flag(
                AtsIssueKind::MissingName,
                AtsSeverity::Warning,
                p.missing_name,
                "Put your full name on the first line of the resume.".to_string(),
            );
        }
        if !resume.has_section(SectionKind::Education) {
            flag(
                AtsIssueKind::NoEducationSection,
                AtsSeverity::Warning,
                p.no_education_section,
                "Add an Education section.".to_string(),
            );
        }
        let bullets: Vec<&String> = resume.bullets().collect();
        let quantified = bullets.iter().filter(|b| is_quantified(b)).count();
        if !bullets.is_empty() && (quantified as f64) < bullets.len() as f64 * QUANTIFIED_SHARE {
            flag(
                AtsIssueKind::UnquantifiedBullets,
                AtsSeverity::Warning,
                p.unquantified_bullets,
                format!(
                    "Only {quantified} of {} bullets include a measurable result; add numbers, percentages or time saved.",
                    bullets.len()
                ),
            );
        }

        let deducted: f64 = issues.iter().map(|i| i.penalty).sum();
        AtsScore {
            score: (100.0 - deducted).clamp(0.0, 100.0),
            issues,
        }
    }
}

/// A bullet carries a metric: a digit, `%` or a currency sign.
pub fn is_quantified(text: &str) -> bool {
    let has_digit = text.chars().any(|c| c.is_ascii_digit());
    let has_percent = text.contains('%');
    let has_currency = text.contains('$') || text.contains('€') || text.contains('£');
    has_digit || has_percent || has_currency
}
