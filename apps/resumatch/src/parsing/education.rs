//! Education entries: institution, degree, field, graduation date.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::EducationEntry;
use crate::parsing::dates::{self, DatePoint};
use crate::parsing::strip_bullet;

static INSTITUTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(university|universit[àé]|college|institute|school|academy|polytechnic|conservatory|iit|mit)\b")
        .unwrap()
});

static DEGREE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        (?:^|[^a-z])
        (?:
            bachelor(?:'s|s)? | master(?:'s|s)? | doctorate | doctor\s+of | associate(?:'s)?\s+degree
            | ph\.?\s?d\.? | m\.?b\.?a\b | b\.\s?s\.?c?\.? | m\.\s?s\.?c?\.? | b\.\s?a\. | m\.\s?a\.
            | bsc\b | msc\b | b\.?eng\b | m\.?eng\b | b\.?tech\b | m\.?tech\b | diploma | ged\b
        )",
    )
    .unwrap()
});

/// "BS in", "MA of": bare two-letter degrees only count before a field.
static SHORT_DEGREE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?:BS|BA|MS|MA|BE|ME)\s+(?:in|of)\b").unwrap());

/// Words after "of" that belong to the degree name, not the field.
const DEGREE_OF_WORDS: &[&str] = &[
    "science",
    "arts",
    "engineering",
    "business administration",
    "philosophy",
    "fine arts",
    "laws",
    "technology",
    "applied science",
    "commerce",
    "education",
];

pub fn parse_education(lines: &[String]) -> Vec<EducationEntry> {
    let mut entries = Vec::new();
    let mut current = EducationEntry::default();

    for line in lines {
        let line = strip_bullet(line).unwrap_or(line.as_str()).trim();
        if line.is_empty() {
            continue;
        }

        let graduation = latest_date(line);

        for segment in split_segments(line) {
            if INSTITUTION.is_match(&segment) {
                if !current.institution.is_empty() {
                    entries.push(std::mem::take(&mut current));
                }
                current.institution = segment;
            } else if is_degree(&segment) {
                if !current.degree.is_empty() {
                    entries.push(std::mem::take(&mut current));
                }
                let (degree, field) = split_degree(&segment);
                current.degree = degree;
                current.field = field;
            }
        }

        if let Some(date) = graduation {
            if current.graduation_date.map_or(true, |d| date > d) {
                current.graduation_date = Some(date);
            }
        }
    }

    if !current.is_empty() {
        entries.push(current);
    }
    entries
}

fn is_degree(segment: &str) -> bool {
    DEGREE.is_match(segment) || SHORT_DEGREE.is_match(segment)
}

/// Comma/pipe/dash-separated pieces of a line with dates removed.
fn split_segments(line: &str) -> Vec<String> {
    let mut text = line.to_string();
    for (_, span) in dates::find_dates(line).into_iter().rev() {
        text.replace_range(span, " ");
    }
    text.split(|c: char| matches!(c, ',' | '|' | '—' | '–' | '(' | ')' | ';'))
        .flat_map(|s| s.split(" - "))
        .map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|s| s.chars().any(char::is_alphabetic))
        .collect()
}

fn latest_date(line: &str) -> Option<NaiveDate> {
    dates::find_dates(line)
        .into_iter()
        .filter_map(|(point, _)| match point {
            DatePoint::Date(d) => Some(d),
            DatePoint::Present => None,
        })
        .max()
}

/// "B.S. in Computer Science" → ("B.S.", "Computer Science");
/// "Master of Science" stays whole; "Bachelor of Economics" → field "Economics".
fn split_degree(segment: &str) -> (String, String) {
    if let Some((degree, field)) = segment.split_once(" in ") {
        return (degree.trim().to_string(), field.trim().to_string());
    }
    if let Some((degree, field)) = segment.split_once(" of ") {
        let field_lower = field.trim().to_lowercase();
        if !DEGREE_OF_WORDS.iter().any(|w| field_lower.starts_with(w)) {
            return (degree.trim().to_string(), field.trim().to_string());
        }
    }
    (segment.trim().to_string(), String::new())
}
