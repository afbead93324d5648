//! Contact block extraction: name, email, phone, location.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ContactInfo;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+\-]+@[A-Za-z0-9.\-]+\.[A-Za-z]{2,}").unwrap());

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:\+\d{1,3}[\s.\-]?)?(?:\(\d{2,4}\)\s?|\d{2,4}[\s.\-])\d{3,4}[\s.\-]?\d{3,4}\b")
        .unwrap()
});

static LOCATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][A-Za-z.'\- ]*[a-z.],\s*(?:[A-Z]{2}|[A-Z][a-z]+(?: [A-Z][a-z]+)*)$").unwrap()
});

const NAME_STOP_WORDS: &[&str] = &[
    "resume",
    "curriculum",
    "vitae",
    "cv",
    "engineer",
    "developer",
    "manager",
    "analyst",
    "designer",
    "scientist",
    "consultant",
    "street",
    "avenue",
];

/// Reads contact details from the leading/contact zone lines, falling back to
/// the full text for email and phone.
pub fn parse_contact(contact_lines: &[String], full_text: &str) -> ContactInfo {
    let block = contact_lines.join("\n");

    let email = find_email(&block).or_else(|| find_email(full_text));
    let phone = find_phone(&block).or_else(|| find_phone(full_text));
    let name = contact_lines.iter().find_map(|line| name_from(line));
    let location = contact_lines.iter().find_map(|line| location_from(line));

    ContactInfo {
        name,
        email,
        phone,
        location,
    }
}

fn find_email(text: &str) -> Option<String> {
    EMAIL.find(text).map(|m| m.as_str().to_string())
}

fn find_phone(text: &str) -> Option<String> {
    PHONE
        .find_iter(text)
        .map(|m| m.as_str().trim().to_string())
        .find(|candidate| {
            let digits = candidate.chars().filter(char::is_ascii_digit).count();
            (7..=15).contains(&digits)
        })
}

/// A name line: 2-4 capitalized words, letters only.
fn name_from(line: &str) -> Option<String> {
    let line = line.trim();
    if line.len() > 60 || line.contains('@') || line.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let words: Vec<&str> = line.split_whitespace().collect();
    if !(2..=4).contains(&words.len()) {
        return None;
    }
    let name_like = words.iter().all(|w| {
        w.chars().next().is_some_and(char::is_uppercase)
            && w.chars()
                .all(|c| c.is_alphabetic() || matches!(c, '.' | '\'' | '-' | '’'))
            && !NAME_STOP_WORDS.contains(&w.to_lowercase().trim_end_matches('.'))
    });
    name_like.then(|| words.join(" "))
}

fn location_from(line: &str) -> Option<String> {
    line.split(|c: char| matches!(c, '|' | '•' | '·' | '\t'))
        .map(str::trim)
        .find(|segment| !segment.contains('@') && LOCATION.is_match(segment))
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    #[test]
    fn test_full_header() {
        let block = lines("Jane Doe\njane.doe@example.com | (555) 123-4567 | Austin, TX");
        let contact = parse_contact(&block, "");
        assert_eq!(contact.name.as_deref(), Some("Jane Doe"));
        assert_eq!(contact.email.as_deref(), Some("jane.doe@example.com"));
        assert_eq!(contact.phone.as_deref(), Some("(555) 123-4567"));
        assert_eq!(contact.location.as_deref(), Some("Austin, TX"));
    }

    #[test]
    fn test_international_phone_and_country() {
        let block = lines("Ana María López\n+44 20 7946 0958 • London, United Kingdom");
        let contact = parse_contact(&block, "");
        assert_eq!(contact.name.as_deref(), Some("Ana María López"));
        assert_eq!(contact.phone.as_deref(), Some("+44 20 7946 0958"));
        assert_eq!(contact.location.as_deref(), Some("London, United Kingdom"));
    }

    #[test]
    fn test_falls_back_to_full_text() {
        let contact = parse_contact(&lines("Jane Doe"), "Reach me at jane@x.io or 555.123.4567");
        assert_eq!(contact.email.as_deref(), Some("jane@x.io"));
        assert_eq!(contact.phone.as_deref(), Some("555.123.4567"));
    }

    #[test]
    fn test_year_ranges_are_not_phones() {
        let contact = parse_contact(&[], "Acme 2019 - 2021");
        assert!(contact.phone.is_none());
    }

    #[test]
    fn test_titles_are_not_names() {
        let contact = parse_contact(&lines("Software Engineer\nJohn Smith"), "");
        assert_eq!(contact.name.as_deref(), Some("John Smith"));
    }

    #[test]
    fn test_empty() {
        assert_eq!(parse_contact(&[], ""), ContactInfo::default());
    }
}
