//! Experience sub-score: tenure against the job's required years, recency of
//! the latest role, and how many job keywords the roles mention.

use std::collections::BTreeSet;

use chrono::{Datelike, Months, NaiveDate};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::ExperienceWeights;
use crate::models::{ExperienceEntry, SkillToken};

static YEARS_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}|one|two|three|four|five|six|seven|eight|nine|ten)\s*(?:-|–|to)\s*\d{1,2}\s*\+?\s*(?:years?|yrs?)\b")
        .unwrap()
});

static YEARS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(\d{1,2}|one|two|three|four|five|six|seven|eight|nine|ten)\s*\+?\s*(?:plus\s+)?(?:years?|yrs?)\b")
        .unwrap()
});

/// Seniority words and the years they imply, checked when no explicit cue exists.
const SENIORITY: &[(&str, f64)] = &[
    ("principal", 7.0),
    ("staff", 7.0),
    ("lead", 7.0),
    ("senior", 5.0),
    ("sr", 5.0),
    ("mid-level", 3.0),
    ("mid level", 3.0),
    ("intermediate", 3.0),
    ("junior", 0.0),
    ("jr", 0.0),
    ("entry-level", 0.0),
    ("entry level", 0.0),
    ("graduate", 0.0),
    ("intern", 0.0),
];

/// Inputs for one experience evaluation.
pub struct ExperienceInputs<'a> {
    pub entries: &'a [ExperienceEntry],
    /// Job keywords, and those the role descriptions mention.
    pub job_keywords: &'a BTreeSet<SkillToken>,
    pub mentioned_keywords: &'a BTreeSet<SkillToken>,
    pub required_years: f64,
    pub today: NaiveDate,
    pub half_life_months: f64,
}

/// 0–100. No entries → 0.
pub fn compute_experience_score(inputs: &ExperienceInputs, weights: &ExperienceWeights) -> f64 {
    if inputs.entries.is_empty() {
        return 0.0;
    }

    let tenure = if inputs.required_years <= 0.0 {
        1.0
    } else {
        (total_years(inputs.entries, inputs.today) / inputs.required_years).min(1.0)
    };

    let recency = inputs
        .entries
        .iter()
        .map(|e| entry_recency(e, inputs.today, inputs.half_life_months))
        .fold(0.0_f64, f64::max);

    let relevance = if inputs.job_keywords.is_empty() {
        1.0
    } else {
        let hits = inputs
            .job_keywords
            .intersection(inputs.mentioned_keywords)
            .count();
        hits as f64 / inputs.job_keywords.len() as f64
    };

    compute_combined_score(tenure, recency, relevance, weights) * 100.0
}

/// Weighted mean of the three components, normalized by the weight sum.
pub fn compute_combined_score(
    tenure: f64,
    recency: f64,
    relevance: f64,
    weights: &ExperienceWeights,
) -> f64 {
    let total = weights.tenure + weights.recency + weights.relevance;
    if total <= 0.0 {
        return 0.0;
    }
    ((weights.tenure * tenure + weights.recency * recency + weights.relevance * relevance) / total)
        .clamp(0.0, 1.0)
}

/// Years the job asks for: explicit cues ("5+ years", "3-5 years"), else
/// seniority words, else `default`.
pub fn required_years(job_description: &str, default: f64) -> f64 {
    let mut explicit: Option<f64> = None;
    let mut consider = |n: f64| {
        if (0.0..=30.0).contains(&n) {
            explicit = Some(explicit.map_or(n, |e: f64| e.max(n)));
        }
    };

    for caps in YEARS_RANGE.captures_iter(job_description) {
        if let Some(n) = caps.get(1).and_then(|m| number(m.as_str())) {
            consider(n);
        }
    }
    // ranges use their lower bound; drop them so the upper bound is not read again
    let rest = YEARS_RANGE.replace_all(job_description, " ");
    for caps in YEARS.captures_iter(&rest) {
        if let Some(n) = caps.get(1).and_then(|m| number(m.as_str())) {
            consider(n);
        }
    }
    if let Some(years) = explicit {
        return years;
    }

    let lower = job_description.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '-')
        .filter(|w| !w.is_empty())
        .collect();
    let seniority = SENIORITY
        .iter()
        .filter(|(cue, _)| {
            if cue.contains(' ') {
                lower.contains(cue)
            } else {
                words.contains(cue)
            }
        })
        .map(|(_, years)| *years)
        .fold(None, |acc: Option<f64>, y| Some(acc.map_or(y, |a| a.max(y))));

    seniority.unwrap_or(default)
}

/// Sum of the merged (overlap-free) date intervals, in years.
pub fn total_years(entries: &[ExperienceEntry], today: NaiveDate) -> f64 {
    let mut intervals: Vec<(NaiveDate, NaiveDate)> = entries
        .iter()
        .filter_map(|e| interval(e, today))
        .collect();
    intervals.sort();

    let mut merged: Vec<(NaiveDate, NaiveDate)> = Vec::new();
    for (start, end) in intervals {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    merged
        .iter()
        .map(|(start, end)| months_between(*start, *end))
        .sum::<f64>()
        / 12.0
}

/// Month-inclusive interval clipped to `today`; undated entries have none.
fn interval(entry: &ExperienceEntry, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let start = entry.start_date?.min(today);
    let end = if entry.is_current {
        today
    } else {
        let end = entry.end_date.unwrap_or(start);
        end.checked_add_months(Months::new(1)).unwrap_or(end).min(today)
    };
    Some((start, end.max(start)))
}

fn entry_recency(entry: &ExperienceEntry, today: NaiveDate, half_life_months: f64) -> f64 {
    if entry.is_current {
        return 1.0;
    }
    match entry.end_date.or(entry.start_date) {
        Some(end) => compute_recency_score(end, today, half_life_months),
        None => 0.0,
    }
}

/// Exponential decay with the given half-life; 1.0 for anything not yet ended.
pub fn compute_recency_score(end_date: NaiveDate, today: NaiveDate, half_life_months: f64) -> f64 {
    let months_since = months_between(end_date, today);
    if months_since <= 0.0 || half_life_months <= 0.0 {
        return 1.0;
    }
    (0.5_f64)
        .powf(months_since / half_life_months)
        .clamp(0.0, 1.0)
}

fn months_between(start: NaiveDate, end: NaiveDate) -> f64 {
    let years = end.year() - start.year();
    let months = end.month() as i32 - start.month() as i32;
    let total = years * 12 + months;
    let day_frac = (end.day() as f64 - start.day() as f64) / 30.0;
    (total as f64 + day_frac).max(0.0)
}

fn number(raw: &str) -> Option<f64> {
    let n = match raw.to_lowercase().as_str() {
        "one" => 1.0,
        "two" => 2.0,
        "three" => 3.0,
        "four" => 4.0,
        "five" => 5.0,
        "six" => 6.0,
        "seven" => 7.0,
        "eight" => 8.0,
        "nine" => 9.0,
        "ten" => 10.0,
        digits => digits.parse().ok()?,
    };
    Some(n)
}
