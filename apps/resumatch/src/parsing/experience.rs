//! Work-experience entries from the experience zone.
//!
//! An entry opens on a header line, either "Title — Organization (dates)" in
//! one line or a "Title — Organization" line whose dates follow on the next
//! line. Marker lines become bullets; a line that starts lowercase continues
//! the previous bullet. A dated line only opens an entry when it has a
//! header's shape (dates at an edge or in brackets, no closing period);
//! otherwise it is prose whose bullet glyph was lost in extraction.

use crate::models::ExperienceEntry;
use crate::parsing::dates::{self, DateRange};
use crate::parsing::strip_bullet;

/// Headers without a separator are short ("Platform Engineer (2019 - 2022)").
const MAX_BARE_HEADER_WORDS: usize = 6;

/// Title/organization separators, strongest first.
const SEPARATORS: &[&str] = &[" — ", " – ", "—", "–", " | ", " at ", " @ ", " - ", ", "];

pub fn parse_experience(lines: &[String]) -> Vec<ExperienceEntry> {
    let mut entries: Vec<ExperienceEntry> = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(text) = strip_bullet(line) {
            push_bullet(&mut entries, text);
            continue;
        }

        if let Some(range) = dates::parse_range(line).filter(|r| r.start.is_some()) {
            let rest = dates::strip_range(line, &range);
            if dates::is_date_only(line) {
                let awaiting_dates = entries
                    .last()
                    .is_some_and(|last| !last.has_dates() && last.bullets.is_empty());
                if !awaiting_dates {
                    entries.push(ExperienceEntry::default());
                }
                if let Some(last) = entries.last_mut() {
                    apply_range(last, &range);
                }
            } else if entries.is_empty() || is_dated_header(line, &range, &rest) {
                let mut entry = header_entry(&rest);
                apply_range(&mut entry, &range);
                entries.push(entry);
            } else {
                push_bullet(&mut entries, line);
            }
            continue;
        }

        if starts_lowercase(line) {
            if let Some(last) = entries.last_mut().and_then(|e| e.bullets.last_mut()) {
                last.push(' ');
                last.push_str(line);
                continue;
            }
        }

        let next_is_dates = lines
            .get(i + 1)
            .is_some_and(|next| dates::is_date_only(next.trim()));

        // "Title (dates)" then a bare organization line
        let awaiting_organization = entries.last().is_some_and(|last| {
            last.organization.is_empty()
                && last.has_dates()
                && last.bullets.is_empty()
                && !next_is_dates
                && !line.ends_with('.')
        });

        if awaiting_organization {
            if let Some(last) = entries.last_mut() {
                last.organization = line.to_string();
            }
        } else if !entries.is_empty()
            && !next_is_dates
            && (split_header(line).is_none() || line.ends_with('.'))
        {
            push_bullet(&mut entries, line);
        } else {
            entries.push(header_entry(line));
        }
    }

    entries
}

fn push_bullet(entries: &mut Vec<ExperienceEntry>, text: &str) {
    let text = text.trim();
    if text.is_empty() {
        return;
    }
    if entries.is_empty() {
        entries.push(ExperienceEntry::default());
    }
    if let Some(last) = entries.last_mut() {
        last.bullets.push(text.to_string());
    }
}

fn header_entry(text: &str) -> ExperienceEntry {
    let (title, organization) = split_header(text).unwrap_or_else(|| (clean(text), String::new()));
    ExperienceEntry {
        title,
        organization,
        ..Default::default()
    }
}

/// Splits "Title — Organization" on the first separator present.
fn split_header(text: &str) -> Option<(String, String)> {
    SEPARATORS.iter().find_map(|sep| {
        let (title, org) = text.split_once(sep)?;
        let (title, org) = (clean(title), clean(org));
        (!title.is_empty() && !org.is_empty()).then_some((title, org))
    })
}

fn is_dated_header(line: &str, range: &DateRange, rest: &str) -> bool {
    if line.ends_with('.') {
        return false;
    }
    let edge = |c: char| {
        c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '|' | ',' | '-' | '–' | '—' | ':')
    };
    let before = line[..range.span.start].trim_end();
    let after = &line[range.span.end..];
    let bracketed = before.ends_with(&['(', '['][..]);
    let at_edge = before.trim_matches(edge).is_empty() || after.trim_matches(edge).is_empty();

    (bracketed || at_edge)
        && (split_header(rest).is_some() || rest.split_whitespace().count() <= MAX_BARE_HEADER_WORDS)
}

fn apply_range(entry: &mut ExperienceEntry, range: &DateRange) {
    entry.start_date = range.start;
    entry.end_date = range.end;
    entry.is_current = range.is_current;
}

fn clean(s: &str) -> String {
    s.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, ',' | '|' | '-' | '–' | '—' | '(' | ')' | ':')
    })
    .to_string()
}

fn starts_lowercase(s: &str) -> bool {
    s.chars().next().is_some_and(char::is_lowercase)
}
