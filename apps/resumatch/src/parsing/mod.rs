//! Structured Extractor — `NormalizedText` → `ResumeRecord`.
//!
//! Never fails: anything that cannot be recognized is simply left out of the
//! record, and the ATS scorer reports the gaps.

pub mod contact;
pub mod dates;
pub mod education;
pub mod experience;
pub mod sections;
pub mod skills;

use tracing::debug;

use crate::keywords::KeywordExtractor;
use crate::models::{NormalizedText, ResumeRecord, SectionKind};

const SYMBOL_MARKERS: &[char] = &['•', '·', '▪', '◦', '‣', '►', '▸', '➢', '✓', '✔', '■', '□', '○', '●'];
const DASH_MARKERS: &[char] = &['-', '*', '–', '—', '+', '>'];

pub fn parse_resume(text: &NormalizedText, keywords: &KeywordExtractor) -> ResumeRecord {
    let mut record = ResumeRecord {
        raw_text: text.clone(),
        ..Default::default()
    };

    let mut contact_lines = Vec::new();
    let mut experience_lines = Vec::new();
    let mut education_lines = Vec::new();
    let mut skills_lines = Vec::new();
    let mut certification_lines = Vec::new();

    for zone in sections::segment(text) {
        if let Some(heading) = zone.heading {
            record.sections.push(heading);
        }
        let target = match zone.kind {
            SectionKind::Contact => &mut contact_lines,
            SectionKind::Experience => &mut experience_lines,
            SectionKind::Education => &mut education_lines,
            SectionKind::Skills => &mut skills_lines,
            SectionKind::Certifications => &mut certification_lines,
            SectionKind::Other => continue,
        };
        target.extend(zone.lines);
    }

    record.contact = contact::parse_contact(&contact_lines, text.as_str());
    record.experience = experience::parse_experience(&experience_lines);
    record.education = education::parse_education(&education_lines);
    record.certifications = skills::parse_certifications(&certification_lines);
    record.skills = skills::parse_skills(&skills_lines, keywords);

    // Skills named in role descriptions count too, when the vocabulary knows them.
    let vocabulary = keywords.vocabulary();
    for entry in &record.experience {
        let text = format!("{}\n{}", entry.title, entry.bullets.join("\n"));
        record.skills.extend(
            keywords
                .extract(&text)
                .into_iter()
                .filter(|token| vocabulary.contains(token.as_str())),
        );
    }

    debug!(
        sections = record.sections.len(),
        experience = record.experience.len(),
        education = record.education.len(),
        skills = record.skills.len(),
        "Parsed resume"
    );
    record
}

/// Text after a list marker ("• ", "- ", "1. "), or `None` for ordinary lines.
pub fn strip_bullet(line: &str) -> Option<&str> {
    let line = line.trim_start();
    let mut chars = line.chars();
    let first = chars.next()?;
    let rest = chars.as_str();

    if SYMBOL_MARKERS.contains(&first) {
        return Some(rest.trim());
    }
    if DASH_MARKERS.contains(&first) && rest.starts_with(char::is_whitespace) {
        return Some(rest.trim());
    }

    // "1. Did X" / "2) Did Y"
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if (1..=2).contains(&digits) {
        let after = &line[digits..];
        if let Some(rest) = after.strip_prefix(&['.', ')'][..]) {
            if rest.starts_with(char::is_whitespace) {
                return Some(rest.trim());
            }
        }
    }
    None
}
