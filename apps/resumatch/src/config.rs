use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, AnalysisResult};
use crate::keywords::vocabulary::SkillAlias;

/// Weights of the two sub-scores in `overall_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchWeights {
    pub skill: f64,
    pub experience: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            skill: 0.6,
            experience: 0.4,
        }
    }
}

/// Weights of the components inside `experience_score`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperienceWeights {
    pub tenure: f64,
    pub recency: f64,
    pub relevance: f64,
}

impl Default for ExperienceWeights {
    fn default() -> Self {
        Self {
            tenure: 0.5,
            recency: 0.25,
            relevance: 0.25,
        }
    }
}

/// Fixed deductions applied by the ATS scorer, one per detected issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AtsPenalties {
    pub missing_email: f64,
    pub no_section_headings: f64,
    pub no_skills_section: f64,
    pub no_parsable_dates: f64,
    pub missing_phone: f64,
    pub no_experience_section: f64,
    pub insufficient_text: f64,
    pub non_standard_headings: f64,
    pub undated_entries: f64,
    pub missing_name: f64,
    pub no_education_section: f64,
    pub unquantified_bullets: f64,
}

impl Default for AtsPenalties {
    fn default() -> Self {
        Self {
            missing_email: 20.0,
            no_section_headings: 20.0,
            no_skills_section: 15.0,
            no_parsable_dates: 15.0,
            missing_phone: 10.0,
            no_experience_section: 10.0,
            insufficient_text: 10.0,
            non_standard_headings: 5.0,
            undated_entries: 5.0,
            missing_name: 5.0,
            no_education_section: 5.0,
            unquantified_bullets: 5.0,
        }
    }
}

impl AtsPenalties {
    /// Every penalty with its field name, for validation and env overrides.
    pub fn fields_mut(&mut self) -> [(&'static str, &mut f64); 12] {
        [
            ("missing_email", &mut self.missing_email),
            ("no_section_headings", &mut self.no_section_headings),
            ("no_skills_section", &mut self.no_skills_section),
            ("no_parsable_dates", &mut self.no_parsable_dates),
            ("missing_phone", &mut self.missing_phone),
            ("no_experience_section", &mut self.no_experience_section),
            ("insufficient_text", &mut self.insufficient_text),
            ("non_standard_headings", &mut self.non_standard_headings),
            ("undated_entries", &mut self.undated_entries),
            ("missing_name", &mut self.missing_name),
            ("no_education_section", &mut self.no_education_section),
            ("unquantified_bullets", &mut self.unquantified_bullets),
        ]
    }

    pub fn fields(&self) -> [(&'static str, f64); 12] {
        let mut copy = self.clone();
        copy.fields_mut().map(|(name, value)| (name, *value))
    }
}

/// Immutable analyzer configuration, handed to every component at construction.
///
/// Loaded from defaults, an optional JSON file, and `RESUMATCH_*` environment
/// overrides (in that order). Every scalar has an override, penalties included
/// (`RESUMATCH_PENALTY_MISSING_EMAIL` …); `extra_skills` is file-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    pub match_weights: MatchWeights,
    pub experience_weights: ExperienceWeights,
    pub ats_penalties: AtsPenalties,
    /// Half-life of the recency decay applied to past roles.
    pub recency_half_life_months: f64,
    /// Years expected when a job description carries no seniority cue.
    pub default_required_years: f64,
    pub top_missing_keywords: usize,
    /// Overall and ATS scores at or above this get generic polish tips.
    pub high_score_threshold: f64,
    pub min_word_count: usize,
    pub max_document_bytes: u64,
    /// "Today" for date arithmetic. Resolved once at analyzer construction.
    pub reference_date: Option<NaiveDate>,
    pub extra_skills: Vec<SkillAlias>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            match_weights: MatchWeights::default(),
            experience_weights: ExperienceWeights::default(),
            ats_penalties: AtsPenalties::default(),
            recency_half_life_months: 18.0,
            default_required_years: 2.0,
            top_missing_keywords: 5,
            high_score_threshold: 80.0,
            min_word_count: 80,
            max_document_bytes: 10 * 1024 * 1024,
            reference_date: None,
            extra_skills: Vec::new(),
        }
    }
}

impl AnalyzerConfig {
    /// Defaults overridden by `RESUMATCH_*` environment variables (and `.env`).
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::default().with_overrides(|key| std::env::var(key).ok())
    }

    /// Reads a JSON config file; missing fields fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file '{}'", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Config file '{}' is not valid JSON", path.display()))
    }

    /// Applies overrides from a key lookup (the environment, in production).
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = parse_var(&lookup, "RESUMATCH_SKILL_WEIGHT")? {
            self.match_weights.skill = v;
        }
        if let Some(v) = parse_var(&lookup, "RESUMATCH_EXPERIENCE_WEIGHT")? {
            self.match_weights.experience = v;
        }
        if let Some(v) = parse_var(&lookup, "RESUMATCH_RECENCY_HALF_LIFE_MONTHS")? {
            self.recency_half_life_months = v;
        }
        if let Some(v) = parse_var(&lookup, "RESUMATCH_DEFAULT_REQUIRED_YEARS")? {
            self.default_required_years = v;
        }
        if let Some(v) = parse_var(&lookup, "RESUMATCH_TOP_MISSING_KEYWORDS")? {
            self.top_missing_keywords = v;
        }
        if let Some(v) = parse_var(&lookup, "RESUMATCH_HIGH_SCORE_THRESHOLD")? {
            self.high_score_threshold = v;
        }
        if let Some(v) = parse_var(&lookup, "RESUMATCH_MAX_DOCUMENT_BYTES")? {
            self.max_document_bytes = v;
        }
        if let Some(v) = parse_var(&lookup, "RESUMATCH_MIN_WORD_COUNT")? {
            self.min_word_count = v;
        }
        if let Some(v) = parse_var(&lookup, "RESUMATCH_TENURE_WEIGHT")? {
            self.experience_weights.tenure = v;
        }
        if let Some(v) = parse_var(&lookup, "RESUMATCH_RECENCY_WEIGHT")? {
            self.experience_weights.recency = v;
        }
        if let Some(v) = parse_var(&lookup, "RESUMATCH_RELEVANCE_WEIGHT")? {
            self.experience_weights.relevance = v;
        }
        for (name, value) in self.ats_penalties.fields_mut() {
            let key = format!("RESUMATCH_PENALTY_{}", name.to_ascii_uppercase());
            if let Some(v) = parse_var(&lookup, &key)? {
                *value = v;
            }
        }
        if let Some(v) = lookup("RESUMATCH_REFERENCE_DATE") {
            let date = NaiveDate::parse_from_str(&v, "%Y-%m-%d")
                .context("RESUMATCH_REFERENCE_DATE must be YYYY-MM-DD")?;
            self.reference_date = Some(date);
        }
        Ok(self)
    }

    /// Rejects weights and limits that would break the score invariants.
    pub fn validate(&self) -> AnalysisResult<()> {
        let mw = &self.match_weights;
        let ew = &self.experience_weights;
        let scalars = [
            ("match_weights.skill", mw.skill),
            ("match_weights.experience", mw.experience),
            ("experience_weights.tenure", ew.tenure),
            ("experience_weights.recency", ew.recency),
            ("experience_weights.relevance", ew.relevance),
            ("recency_half_life_months", self.recency_half_life_months),
            ("default_required_years", self.default_required_years),
            ("high_score_threshold", self.high_score_threshold),
        ];
        if let Some((name, _)) = scalars.iter().find(|(_, v)| !v.is_finite()) {
            return Err(AnalysisError::InvalidInput(format!(
                "{name} must be a finite number"
            )));
        }
        if let Some((name, _)) = self
            .ats_penalties
            .fields()
            .into_iter()
            .find(|(_, v)| !v.is_finite() || *v < 0.0)
        {
            return Err(AnalysisError::InvalidInput(format!(
                "ats_penalties.{name} must be a non-negative number"
            )));
        }

        if mw.skill < 0.0 || mw.experience < 0.0 || mw.skill + mw.experience <= 0.0 {
            return Err(AnalysisError::InvalidInput(
                "match weights must be non-negative with a positive sum".to_string(),
            ));
        }
        if ew.tenure < 0.0
            || ew.recency < 0.0
            || ew.relevance < 0.0
            || ew.tenure + ew.recency + ew.relevance <= 0.0
        {
            return Err(AnalysisError::InvalidInput(
                "experience weights must be non-negative with a positive sum".to_string(),
            ));
        }
        if self.recency_half_life_months <= 0.0 {
            return Err(AnalysisError::InvalidInput(
                "recency_half_life_months must be positive".to_string(),
            ));
        }
        if self.default_required_years < 0.0 {
            return Err(AnalysisError::InvalidInput(
                "default_required_years must not be negative".to_string(),
            ));
        }
        if !(0.0..=100.0).contains(&self.high_score_threshold) {
            return Err(AnalysisError::InvalidInput(
                "high_score_threshold must be within 0-100".to_string(),
            ));
        }
        Ok(())
    }
}

fn parse_var<T, F>(lookup: &F, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) => {
            let value = raw
                .trim()
                .parse::<T>()
                .with_context(|| format!("Environment variable '{key}' has an invalid value"))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_is_valid() {
        assert!(AnalyzerConfig::default().validate().is_ok());
    }

    #[test]
    fn test_default_match_weights() {
        let w = MatchWeights::default();
        assert!((w.skill - 0.6).abs() < f64::EPSILON);
        assert!((w.experience - 0.4).abs() < f64::EPSILON);
    }

    #[test]
    fn test_overrides_applied() {
        let config = AnalyzerConfig::default()
            .with_overrides(lookup_from(&[
                ("RESUMATCH_SKILL_WEIGHT", "0.7"),
                ("RESUMATCH_EXPERIENCE_WEIGHT", "0.3"),
                ("RESUMATCH_TOP_MISSING_KEYWORDS", "3"),
                ("RESUMATCH_REFERENCE_DATE", "2024-06-01"),
            ]))
            .unwrap();
        assert!((config.match_weights.skill - 0.7).abs() < f64::EPSILON);
        assert_eq!(config.top_missing_keywords, 3);
        assert_eq!(
            config.reference_date,
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
    }

    #[test]
    fn test_invalid_override_is_error() {
        let result = AnalyzerConfig::default()
            .with_overrides(lookup_from(&[("RESUMATCH_SKILL_WEIGHT", "lots")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_weights_rejected() {
        let config = AnalyzerConfig {
            match_weights: MatchWeights {
                skill: 0.0,
                experience: 0.0,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_nan_values_rejected() {
        let config = AnalyzerConfig::default()
            .with_overrides(lookup_from(&[("RESUMATCH_SKILL_WEIGHT", "NaN")]))
            .unwrap();
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidInput(msg)) if msg.contains("match_weights.skill")
        ));

        let mut config = AnalyzerConfig::default();
        config.experience_weights.recency = f64::INFINITY;
        assert!(config.validate().is_err());

        let mut config = AnalyzerConfig::default();
        config.ats_penalties.missing_phone = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_penalty_rejected() {
        let mut config = AnalyzerConfig::default();
        config.ats_penalties.missing_name = -5.0;
        assert!(matches!(
            config.validate(),
            Err(AnalysisError::InvalidInput(msg)) if msg.contains("missing_name")
        ));
    }

    #[test]
    fn test_word_count_and_penalty_overrides() {
        let config = AnalyzerConfig::default()
            .with_overrides(lookup_from(&[
                ("RESUMATCH_MIN_WORD_COUNT", "150"),
                ("RESUMATCH_PENALTY_MISSING_PHONE", "25"),
                ("RESUMATCH_TENURE_WEIGHT", "0.8"),
            ]))
            .unwrap();
        assert_eq!(config.min_word_count, 150);
        assert!((config.ats_penalties.missing_phone - 25.0).abs() < f64::EPSILON);
        assert!((config.experience_weights.tenure - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.ats_penalties.missing_email, AtsPenalties::default().missing_email);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: AnalyzerConfig =
            serde_json::from_str(r#"{"top_missing_keywords": 8}"#).unwrap();
        assert_eq!(config.top_missing_keywords, 8);
        assert_eq!(config.match_weights, MatchWeights::default());
    }

    #[test]
    fn test_from_file_reads_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resumatch.json");
        std::fs::write(
            &path,
            r#"{"match_weights": {"skill": 0.5, "experience": 0.5}, "extra_skills": [{"canonical": "bevy", "aliases": ["bevy engine"]}]}"#,
        )
        .unwrap();
        let config = AnalyzerConfig::from_file(&path).unwrap();
        assert!((config.match_weights.skill - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.extra_skills.len(), 1);
    }
}
