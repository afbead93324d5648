//! Recommendation Generator — turns scores and issues into ordered advice.
//!
//! Order: blocking ATS issues, top missing keywords, low-score hints, ATS
//! warnings, then generic polish tips.

use crate::config::AnalyzerConfig;
use crate::models::{AtsScore, MatchResult};

/// Sub-scores below this get a targeted hint.
const LOW_SCORE: f64 = 50.0;

const GENERIC_TIPS: &[&str] = &[
    "Tailor your summary to mirror the job's top requirements.",
    "Lead each bullet with a strong action verb and a measurable result.",
];

pub struct RecommendationGenerator<'a> {
    config: &'a AnalyzerConfig,
}

impl<'a> RecommendationGenerator<'a> {
    pub fn new(config: &'a AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Deterministic for identical inputs; never empty when `overall_score < 100`.
    pub fn generate(&self, result: &MatchResult, ats: Option<&AtsScore>) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();

        if let Some(ats) = ats {
            out.extend(ats.blocking().map(|issue| issue.message.clone()));
        }

        let top: Vec<&str> = result
            .missing_keywords
            .iter()
            .take(self.config.top_missing_keywords)
            .map(|k| k.as_str())
            .collect();
        if !top.is_empty() {
            out.push(format!(
                "Add these keywords from the job description where they reflect your experience: {}.",
                top.join(", ")
            ));
        }

        if result.experience_score < LOW_SCORE {
            out.push(
                "Highlight experience that matches the role: name the relevant technologies in your bullets and include dates for each position."
                    .to_string(),
            );
        }
        if result.skill_score < LOW_SCORE {
            out.push(format!(
                "Your skills cover {:.0}% of the job's keywords; expand your Skills section with the tools you have actually used.",
                result.skill_score
            ));
        }

        if let Some(ats) = ats {
            out.extend(ats.warnings().map(|issue| issue.message.clone()));
        }

        let threshold = self.config.high_score_threshold;
        let strong = result.overall_score >= threshold
            && ats.map_or(true, |a| a.score >= threshold);
        if strong || (out.is_empty() && result.overall_score < 100.0) {
            out.extend(GENERIC_TIPS.iter().map(|tip| tip.to_string()));
        }

        dedup_in_order(out)
    }
}

fn dedup_in_order(items: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
