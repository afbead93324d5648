//! Section segmentation: splits normalized resume text into heading-delimited zones.

use crate::models::{DetectedSection, NormalizedText, SectionKind};

/// Heading lexicon: normalized heading, kind, and whether ATS parsers
/// recognize the name out of the box.
const HEADINGS: &[(&str, SectionKind, bool)] = &[
    // experience
    ("experience", SectionKind::Experience, true),
    ("work experience", SectionKind::Experience, true),
    ("professional experience", SectionKind::Experience, true),
    ("relevant experience", SectionKind::Experience, true),
    ("employment", SectionKind::Experience, true),
    ("employment history", SectionKind::Experience, false),
    ("work history", SectionKind::Experience, false),
    ("career history", SectionKind::Experience, false),
    ("professional background", SectionKind::Experience, false),
    ("career", SectionKind::Experience, false),
    ("positions held", SectionKind::Experience, false),
    ("where i have worked", SectionKind::Experience, false),
    // education
    ("education", SectionKind::Education, true),
    ("education and training", SectionKind::Education, true),
    ("academic background", SectionKind::Education, false),
    ("academic history", SectionKind::Education, false),
    ("academic qualifications", SectionKind::Education, false),
    ("academics", SectionKind::Education, false),
    ("schooling", SectionKind::Education, false),
    ("qualifications", SectionKind::Education, false),
    // skills
    ("skills", SectionKind::Skills, true),
    ("technical skills", SectionKind::Skills, true),
    ("core skills", SectionKind::Skills, true),
    ("key skills", SectionKind::Skills, true),
    ("professional skills", SectionKind::Skills, true),
    ("skills and abilities", SectionKind::Skills, true),
    ("competencies", SectionKind::Skills, false),
    ("core competencies", SectionKind::Skills, false),
    ("expertise", SectionKind::Skills, false),
    ("areas of expertise", SectionKind::Skills, false),
    ("technologies", SectionKind::Skills, false),
    ("tech stack", SectionKind::Skills, false),
    ("toolbox", SectionKind::Skills, false),
    ("proficiencies", SectionKind::Skills, false),
    ("strengths", SectionKind::Skills, false),
    // certifications
    ("certifications", SectionKind::Certifications, true),
    ("certificates", SectionKind::Certifications, true),
    ("licenses and certifications", SectionKind::Certifications, true),
    ("certifications and licenses", SectionKind::Certifications, true),
    ("licenses", SectionKind::Certifications, false),
    ("credentials", SectionKind::Certifications, false),
    ("accreditations", SectionKind::Certifications, false),
    ("professional development", SectionKind::Certifications, false),
    // contact
    ("contact", SectionKind::Contact, true),
    ("contact information", SectionKind::Contact, true),
    ("contact info", SectionKind::Contact, true),
    ("contact details", SectionKind::Contact, true),
    ("personal details", SectionKind::Contact, false),
    ("personal information", SectionKind::Contact, false),
    ("get in touch", SectionKind::Contact, false),
    // recognized, content ignored
    ("summary", SectionKind::Other, true),
    ("professional summary", SectionKind::Other, true),
    ("profile", SectionKind::Other, true),
    ("objective", SectionKind::Other, true),
    ("career objective", SectionKind::Other, true),
    ("about", SectionKind::Other, true),
    ("about me", SectionKind::Other, true),
    ("projects", SectionKind::Other, true),
    ("personal projects", SectionKind::Other, true),
    ("key projects", SectionKind::Other, true),
    ("interests", SectionKind::Other, true),
    ("hobbies", SectionKind::Other, true),
    ("awards", SectionKind::Other, true),
    ("honors", SectionKind::Other, true),
    ("honors and awards", SectionKind::Other, true),
    ("achievements", SectionKind::Other, true),
    ("accomplishments", SectionKind::Other, true),
    ("publications", SectionKind::Other, true),
    ("references", SectionKind::Other, true),
    ("volunteer experience", SectionKind::Other, true),
    ("volunteering", SectionKind::Other, true),
    ("activities", SectionKind::Other, true),
    ("extracurricular activities", SectionKind::Other, true),
];

/// A run of lines under one heading. The leading zone (before any heading)
/// has no heading and counts as contact information.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub kind: SectionKind,
    pub heading: Option<DetectedSection>,
    pub lines: Vec<String>,
}

/// Recognized heading on a line, plus content written after a colon.
#[derive(Debug, Clone, PartialEq)]
pub struct Heading {
    pub section: DetectedSection,
    pub inline: Option<String>,
}

pub fn segment(text: &NormalizedText) -> Vec<Zone> {
    let mut zones = vec![Zone {
        kind: SectionKind::Contact,
        heading: None,
        lines: Vec::new(),
    }];

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match classify_heading(line) {
            Some(heading) => {
                let mut zone = Zone {
                    kind: heading.section.kind,
                    heading: Some(heading.section),
                    lines: Vec::new(),
                };
                if let Some(inline) = heading.inline {
                    zone.lines.push(inline);
                }
                zones.push(zone);
            }
            None => {
                if let Some(current) = zones.last_mut() {
                    current.lines.push(line.to_string());
                }
            }
        }
    }
    zones
}

/// Recognizes "EXPERIENCE", "Work Experience:", "## Skills" and the inline
/// form "Skills: Rust, Go". The inline form is not accepted for ignored
/// headings, so "Summary: ..." style prose is never mistaken for one.
pub fn classify_heading(line: &str) -> Option<Heading> {
    let trimmed = line
        .trim()
        .trim_start_matches(|c: char| matches!(c, '#' | '=' | '*' | '_' | '-' | '•'))
        .trim_end_matches(|c: char| matches!(c, '#' | '=' | '*' | '_' | '-'))
        .trim();

    if let Some((kind, standard)) = lookup(trimmed.trim_end_matches(':')) {
        return Some(Heading {
            section: DetectedSection {
                kind,
                heading: trimmed.trim_end_matches(':').trim().to_string(),
                standard,
            },
            inline: None,
        });
    }

    let (head, rest) = trimmed.split_once(':')?;
    let rest = rest.trim();
    if rest.is_empty() {
        return None;
    }
    let (kind, standard) = lookup(head)?;
    if kind == SectionKind::Other {
        return None;
    }
    Some(Heading {
        section: DetectedSection {
            kind,
            heading: head.trim().to_string(),
            standard,
        },
        inline: Some(rest.to_string()),
    })
}

fn lookup(raw: &str) -> Option<(SectionKind, bool)> {
    let key = normalize_heading(raw);
    if key.is_empty() {
        return None;
    }
    HEADINGS
        .iter()
        .find(|(name, _, _)| *name == key)
        .map(|(_, kind, standard)| (*kind, *standard))
}

/// Lowercase, `&` spelled out, punctuation dropped, whitespace collapsed.
fn normalize_heading(raw: &str) -> String {
    raw.to_lowercase()
        .replace('&', " and ")
        .replace('’', "'")
        .replace("i've", "i have")
        .chars()
        .map(|c| if c.is_alphanumeric() || c == ' ' { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
