//! Match Scoring — pluggable, trait-based scorer that measures a parsed resume
//! against a job description.
//!
//! Default: `KeywordMatchScorer` (pure-Rust, deterministic, fully testable).
//! `ResumeAnalyzer` holds an `Arc<dyn MatchScorer>` so the backend can be swapped.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::config::AnalyzerConfig;
use crate::keywords::{KeywordEntry, KeywordExtractor};
use crate::models::{MatchResult, NormalizedText, ResumeRecord, SkillToken};
use crate::scoring::experience::{self, ExperienceInputs};
use crate::scoring::recommendations::RecommendationGenerator;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// The match scorer trait. Implement this to swap backends without touching
/// the analyzer or its callers. Scoring never fails.
pub trait MatchScorer: Send + Sync {
    fn score(&self, resume: &ResumeRecord, job_description: &NormalizedText) -> MatchResult;
}

// ────────────────────────────────────────────────────────────────────────────
// KeywordMatchScorer — default implementation
// ────────────────────────────────────────────────────────────────────────────

/// Keyword-based scorer.
///
/// Algorithm:
/// 1. job_keywords = keyword inventory of the job description
/// 2. skill_score = 100 × |skills ∩ job_keywords| / |job_keywords| (100 when empty)
/// 3. experience_score from tenure, recency and keyword relevance of the roles
/// 4. overall_score = weighted average of the two
/// 5. missing keywords keep the inventory's importance order
pub struct KeywordMatchScorer {
    keywords: KeywordExtractor,
    config: Arc<AnalyzerConfig>,
    today: NaiveDate,
}

impl KeywordMatchScorer {
    pub fn new(keywords: KeywordExtractor, config: Arc<AnalyzerConfig>, today: NaiveDate) -> Self {
        Self {
            keywords,
            config,
            today,
        }
    }
}

impl MatchScorer for KeywordMatchScorer {
    fn score(&self, resume: &ResumeRecord, job_description: &NormalizedText) -> MatchResult {
        let inventory = self.keywords.keyword_inventory(job_description.as_str());
        compute_keyword_match(
            resume,
            job_description,
            &inventory,
            &self.keywords,
            &self.config,
            self.today,
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Core keyword match algorithm
// ────────────────────────────────────────────────────────────────────────────

fn compute_keyword_match(
    resume: &ResumeRecord,
    job_description: &NormalizedText,
    inventory: &[KeywordEntry],
    keywords: &KeywordExtractor,
    config: &AnalyzerConfig,
    today: NaiveDate,
) -> MatchResult {
    let job_keywords: BTreeSet<SkillToken> =
        inventory.iter().map(|e| e.keyword.clone()).collect();

    let matched_keywords: BTreeSet<SkillToken> = job_keywords
        .intersection(&resume.skills)
        .cloned()
        .collect();

    // inventory order: most important first, no duplicates
    let missing_keywords: Vec<SkillToken> = inventory
        .iter()
        .filter(|e| !resume.skills.contains(&e.keyword))
        .map(|e| e.keyword.clone())
        .collect();

    let skill_score = compute_skill_score(matched_keywords.len(), job_keywords.len());

    let mentioned_keywords: BTreeSet<SkillToken> = resume
        .experience
        .iter()
        .flat_map(|entry| {
            let text = format!(
                "{}\n{}\n{}",
                entry.title,
                entry.organization,
                entry.bullets.join("\n")
            );
            keywords.extract(&text)
        })
        .collect();

    let experience_score = experience::compute_experience_score(
        &ExperienceInputs {
            entries: &resume.experience,
            job_keywords: &job_keywords,
            mentioned_keywords: &mentioned_keywords,
            required_years: experience::required_years(
                job_description.as_str(),
                config.default_required_years,
            ),
            today,
            half_life_months: config.recency_half_life_months,
        },
        &config.experience_weights,
    );

    let overall_score = compute_overall_score(skill_score, experience_score, config);

    let mut result = MatchResult {
        overall_score: round2(overall_score),
        matched_keywords,
        missing_keywords,
        skill_score: round2(skill_score),
        experience_score: round2(experience_score),
        recommendations: Vec::new(),
    };
    result.recommendations = RecommendationGenerator::new(config).generate(&result, None);
    result
}

/// 100 × matched / max(1, total); an empty job keyword set asks for nothing.
pub fn compute_skill_score(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 100.0;
    }
    100.0 * matched as f64 / total.max(1) as f64
}

pub fn compute_overall_score(skill_score: f64, experience_score: f64, config: &AnalyzerConfig) -> f64 {
    let w = &config.match_weights;
    let total = w.skill + w.experience;
    if total <= 0.0 {
        return 0.0;
    }
    ((w.skill * skill_score + w.experience * experience_score) / total).clamp(0.0, 100.0)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
