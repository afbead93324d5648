//! Date and date-range recognition for experience and education lines.
//!
//! Accepted forms: "Jan 2020", "January 2020", "01/2020", "2020-01", "2020",
//! and "Present" / "Current" / "Now". Everything resolves to the first day of
//! the month (January for bare years).

use std::ops::Range;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static DATE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        \b(?:
            (?P<mon>jan(?:uary)?|feb(?:ruary)?|mar(?:ch)?|apr(?:il)?|may|june?|july?
                |aug(?:ust)?|sep(?:t(?:ember)?)?|oct(?:ober)?|nov(?:ember)?|dec(?:ember)?)
                \.?,?\s+(?P<mon_year>(?:19|20)\d{2})
            | (?P<slash_month>\d{1,2})/(?P<slash_year>(?:19|20)\d{2})
            | (?P<iso_year>(?:19|20)\d{2})-(?P<iso_month>\d{1,2})
            | (?P<year>(?:19|20)\d{2})
            | (?P<present>present|current|now|today)
        )\b",
    )
    .unwrap()
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePoint {
    Date(NaiveDate),
    Present,
}

/// A recognized date range within a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub is_current: bool,
    /// Byte span of the range inside the source line.
    pub span: Range<usize>,
}

/// Every date token in `line`, in order of appearance.
pub fn find_dates(line: &str) -> Vec<(DatePoint, Range<usize>)> {
    DATE_TOKEN
        .captures_iter(line)
        .filter_map(|caps| {
            let span = caps.get(0)?.range();
            point_from(&caps).map(|p| (p, span))
        })
        .collect()
}

/// Parses a single date expression; `None` when it is not one of the accepted forms.
pub fn parse_date(s: &str) -> Option<DatePoint> {
    let s = s.trim();
    let caps = DATE_TOKEN.captures(s)?;
    let whole = caps.get(0)?;
    if whole.start() != 0 || whole.end() != s.len() {
        return None;
    }
    point_from(&caps)
}

/// The first date range in `line`: the first two tokens, or one token alone.
/// Reversed ranges are swapped so `start <= end` always holds.
pub fn parse_range(line: &str) -> Option<DateRange> {
    let points = find_dates(line);
    let (first, first_span) = points.first()?.clone();
    let second = points.get(1).cloned();

    let span = match &second {
        Some((_, s)) => first_span.start..s.end,
        None => first_span,
    };

    let (mut start, mut end, is_current) = match (first, second.map(|(p, _)| p)) {
        (DatePoint::Date(s), Some(DatePoint::Date(e))) => (Some(s), Some(e), false),
        (DatePoint::Date(s), Some(DatePoint::Present)) => (Some(s), None, true),
        (DatePoint::Date(s), None) => (Some(s), Some(s), false),
        (DatePoint::Present, Some(DatePoint::Date(e))) => (Some(e), None, true),
        (DatePoint::Present, _) => (None, None, true),
    };

    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            start = Some(e);
            end = Some(s);
        }
    }

    Some(DateRange {
        start,
        end,
        is_current,
        span,
    })
}

/// `line` with the date range removed, and the brackets and separators that
/// framed it trimmed away.
pub fn strip_range(line: &str, range: &DateRange) -> String {
    let mut out = String::with_capacity(line.len());
    out.push_str(&line[..range.span.start]);
    out.push(' ');
    out.push_str(&line[range.span.end..]);
    out.replace("( )", "")
        .replace("[ ]", "")
        .trim_matches(|c: char| {
            c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | '|' | ',' | '-' | '–' | '—' | ':')
        })
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when the line holds nothing but a date range and punctuation.
pub fn is_date_only(line: &str) -> bool {
    match parse_range(line) {
        Some(range) => {
            let rest = strip_range(line, &range);
            !rest
                .split_whitespace()
                .any(|w| w.chars().any(char::is_alphanumeric) && !is_range_word(w))
        }
        None => false,
    }
}

fn is_range_word(w: &str) -> bool {
    matches!(
        w.to_lowercase().as_str(),
        "to" | "until" | "through" | "till" | "from" | "since"
    )
}

fn point_from(caps: &Captures) -> Option<DatePoint> {
    if caps.name("present").is_some() {
        return Some(DatePoint::Present);
    }
    let (year, month) = if let Some(mon) = caps.name("mon") {
        (caps.name("mon_year")?.as_str(), month_number(mon.as_str())?)
    } else if let Some(m) = caps.name("slash_month") {
        (caps.name("slash_year")?.as_str(), m.as_str().parse().ok()?)
    } else if let Some(y) = caps.name("iso_year") {
        (y.as_str(), caps.name("iso_month")?.as_str().parse().ok()?)
    } else {
        (caps.name("year")?.as_str(), 1)
    };
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1).map(DatePoint::Date)
}

fn month_number(name: &str) -> Option<u32> {
    let prefix: String = name.to_lowercase().chars().take(3).collect();
    let n = match prefix.as_str() {
        "jan" => 1,
        "feb" => 2,
        "mar" => 3,
        "apr" => 4,
        "may" => 5,
        "jun" => 6,
        "jul" => 7,
        "aug" => 8,
        "sep" => 9,
        "oct" => 10,
        "nov" => 11,
        "dec" => 12,
        _ => return None,
    };
    Some(n)
}
