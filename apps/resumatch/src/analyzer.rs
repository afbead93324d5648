//! Resume Analyzer — the orchestration layer.
//!
//! Pipeline per document:
//!   1. Load + validate the file (`Document::from_path`)
//!   2. Extract and normalize text
//!   3. Parse the text into a `ResumeRecord`
//!   4. Score against the job description (`MatchScorer`)
//!   5. Score ATS compatibility and assemble recommendations
//!
//! The analyzer is cheap to clone: configuration, vocabulary and scorers are
//! shared behind `Arc`s, so batch workers each get their own handle.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::config::AnalyzerConfig;
use crate::errors::{AnalysisError, AnalysisResult};
use crate::extraction::{self, Document};
use crate::keywords::{KeywordEntry, KeywordExtractor, SkillVocabulary};
use crate::models::{
    AnalysisReport, AtsScore, BatchEntry, MatchResult, NormalizedText, ResumeRecord,
};
use crate::parsing;
use crate::scoring::{AtsScorer, KeywordMatchScorer, MatchScorer, RecommendationGenerator};

#[derive(Clone)]
pub struct ResumeAnalyzer {
    config: Arc<AnalyzerConfig>,
    keywords: KeywordExtractor,
    match_scorer: Arc<dyn MatchScorer>,
    ats_scorer: Arc<AtsScorer>,
    today: NaiveDate,
}

impl ResumeAnalyzer {
    /// Validates the configuration and wires the default scorers.
    pub fn new(config: AnalyzerConfig) -> AnalysisResult<Self> {
        config.validate()?;

        let today = config
            .reference_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let vocabulary =
            Arc::new(SkillVocabulary::with_defaults().with_extra(&config.extra_skills));
        let keywords = KeywordExtractor::new(vocabulary);
        let config = Arc::new(config);

        let match_scorer: Arc<dyn MatchScorer> = Arc::new(KeywordMatchScorer::new(
            keywords.clone(),
            Arc::clone(&config),
            today,
        ));
        let ats_scorer = Arc::new(AtsScorer::new(
            config.ats_penalties.clone(),
            config.min_word_count,
        ));

        info!(
            vocabulary = keywords.vocabulary().len(),
            reference_date = %today,
            "Resume analyzer ready"
        );

        Ok(Self {
            config,
            keywords,
            match_scorer,
            ats_scorer,
            today,
        })
    }

    /// Replaces the match scoring backend.
    pub fn with_match_scorer(mut self, scorer: Arc<dyn MatchScorer>) -> Self {
        self.match_scorer = scorer;
        self
    }

    pub fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// The date all tenure and recency arithmetic is measured against.
    pub fn reference_date(&self) -> NaiveDate {
        self.today
    }

    pub fn keywords(&self) -> &KeywordExtractor {
        &self.keywords
    }

    /// Keywords of any text, most important first.
    pub fn keyword_inventory(&self, text: &str) -> Vec<KeywordEntry> {
        self.keywords
            .keyword_inventory(NormalizedText::new(text).as_str())
    }

    pub fn load(&self, path: &Path) -> AnalysisResult<Document> {
        Document::from_path(path, self.config.max_document_bytes)
    }

    pub fn parse_document(&self, document: &Document) -> AnalysisResult<ResumeRecord> {
        let text = extraction::extract_text(document)?;
        Ok(parsing::parse_resume(&text, &self.keywords))
    }

    pub fn parse_path(&self, path: &Path) -> AnalysisResult<ResumeRecord> {
        self.parse_document(&self.load(path)?)
    }

    pub fn match_resume(&self, resume: &ResumeRecord, job_description: &str) -> MatchResult {
        self.match_scorer
            .score(resume, &NormalizedText::new(job_description))
    }

    pub fn ats_score(&self, resume: &ResumeRecord) -> AtsScore {
        self.ats_scorer.score(resume)
    }

    /// ATS check of a document on its own, without a job description.
    pub fn ats_check(&self, document: &Document) -> AnalysisResult<AtsScore> {
        Ok(self.ats_score(&self.parse_document(document)?))
    }

    /// Full analysis of one document against one job description.
    pub fn analyze(&self, document: &Document, job_description: &str) -> AnalysisResult<AnalysisReport> {
        let text = extraction::extract_text(document)?;
        let job = NormalizedText::new(job_description);
        Ok(self.analyze_text(&document.id, &text, &job))
    }

    pub fn analyze_path(&self, path: &Path, job_description: &str) -> AnalysisResult<AnalysisReport> {
        let document = self.load(path)?;
        self.analyze(&document, job_description)
    }

    fn analyze_text(&self, id: &str, text: &NormalizedText, job: &NormalizedText) -> AnalysisReport {
        let resume = parsing::parse_resume(text, &self.keywords);
        let match_results = self.match_scorer.score(&resume, job);
        let ats = self.ats_scorer.score(&resume);
        let recommendations =
            RecommendationGenerator::new(&self.config).generate(&match_results, Some(&ats));

        let keywords = self
            .keywords
            .extract(resume.raw_text.as_str())
            .into_iter()
            .map(|k| k.to_string())
            .collect();

        info!(
            resume = %id,
            overall_score = match_results.overall_score,
            ats_score = ats.score,
            matched = match_results.matched_keywords.len(),
            missing = match_results.missing_keywords.len(),
            "Analyzed resume"
        );

        AnalysisReport {
            resume_path: id.to_string(),
            overall_score: match_results.overall_score,
            keywords,
            recommendations,
            ats_score: ats.score,
            ats_issues: ats.issues.into_iter().map(|i| i.message).collect(),
            match_results,
            resume_data: resume,
            analyzer_version: Self::version().to_string(),
        }
    }

    // ────────────────────────────────────────────────────────────────────────
    // Batch
    // ────────────────────────────────────────────────────────────────────────

    /// Analyzes every path in order; failures become error entries.
    /// The result is sorted by overall score, best first.
    pub fn analyze_batch(&self, paths: &[PathBuf], job_description: &str) -> Vec<BatchEntry> {
        let mut entries: Vec<BatchEntry> = paths
            .iter()
            .map(|path| batch_entry(path, self.analyze_path(path, job_description)))
            .collect();
        sort_entries(&mut entries);
        entries
    }

    /// Like `analyze_batch`, but each document runs on the blocking pool.
    /// An item exceeding `per_item_timeout` is recorded as a corrupt document.
    pub async fn analyze_batch_parallel(
        &self,
        paths: &[PathBuf],
        job_description: &str,
        per_item_timeout: Option<Duration>,
    ) -> Vec<BatchEntry> {
        let job = Arc::new(job_description.to_string());

        let handles: Vec<_> = paths
            .iter()
            .cloned()
            .map(|path| {
                let analyzer = self.clone();
                let job = Arc::clone(&job);
                tokio::spawn(async move {
                    let worker_path = path.clone();
                    let work = tokio::task::spawn_blocking(move || {
                        analyzer.analyze_path(&worker_path, &job)
                    });
                    let joined = match per_item_timeout {
                        Some(limit) => match tokio::time::timeout(limit, work).await {
                            Ok(joined) => joined,
                            Err(_) => {
                                warn!(resume = %path.display(), ?limit, "Resume analysis timed out");
                                return (
                                    path.clone(),
                                    Err(AnalysisError::CorruptDocument(format!(
                                        "analysis of '{}' timed out after {limit:?}",
                                        path.display()
                                    ))),
                                );
                            }
                        },
                        None => work.await,
                    };
                    let result = joined.unwrap_or_else(|e| {
                        Err(AnalysisError::CorruptDocument(format!(
                            "analysis of '{}' aborted: {e}",
                            path.display()
                        )))
                    });
                    (path, result)
                })
            })
            .collect();

        let mut entries = Vec::with_capacity(handles.len());
        for (path, handle) in paths.iter().zip(handles) {
            let entry = match handle.await {
                Ok((path, result)) => batch_entry(&path, result),
                Err(e) => batch_entry(
                    path,
                    Err(AnalysisError::CorruptDocument(format!(
                        "analysis of '{}' aborted: {e}",
                        path.display()
                    ))),
                ),
            };
            entries.push(entry);
        }

        sort_entries(&mut entries);
        entries
    }
}

fn batch_entry(path: &Path, result: AnalysisResult<AnalysisReport>) -> BatchEntry {
    match result {
        Ok(report) => BatchEntry::Report(Box::new(report)),
        Err(e) => {
            warn!(resume = %path.display(), code = e.code(), error = %e, "Resume analysis failed");
            BatchEntry::Failed {
                error: e.to_string(),
                code: e.code().to_string(),
                resume_path: path.display().to_string(),
            }
        }
    }
}

/// Stable sort by overall score, best first; ties keep input order.
pub fn sort_entries(entries: &mut [BatchEntry]) {
    entries.sort_by(|a, b| b.overall_score().total_cmp(&a.overall_score()));
    debug!(count = entries.len(), "Sorted batch entries");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fixtures::minimal_docx;
    use crate::extraction::DocumentFormat;
    use crate::models::SkillToken;
    use std::collections::BTreeSet;

    const RESUME: &str = "Jane Doe
jane.doe@example.com | (555) 123-4567 | Austin, TX

WORK EXPERIENCE
Senior Software Engineer — Acme Corp (Jan 2020 – Present)
• Led migration of billing to Kafka and Rust, cutting latency 40%
• Built Python services handling 2M requests a day
Software Engineer | Initech | 2016 - 2019
- Built ETL jobs in Python and SQL

EDUCATION
B.S. in Computer Science, University of Texas, 2016

SKILLS
Languages: Python, Rust, SQL
Cloud: AWS, Docker";

    const JOB: &str = "Requires Python, SQL, Kubernetes, 3+ years experience";

    fn analyzer() -> ResumeAnalyzer {
        ResumeAnalyzer::new(AnalyzerConfig {
            reference_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            ..Default::default()
        })
        .unwrap()
    }

    fn report_with_score(path: &str, score: f64) -> BatchEntry {
        BatchEntry::Report(Box::new(AnalysisReport {
            resume_path: path.to_string(),
            overall_score: score,
            keywords: vec![],
            recommendations: vec![],
            ats_score: 100.0,
            ats_issues: vec![],
            match_results: MatchResult {
                overall_score: score,
                matched_keywords: BTreeSet::new(),
                missing_keywords: vec![],
                skill_score: score,
                experience_score: score,
                recommendations: vec![],
            },
            resume_data: ResumeRecord::default(),
            analyzer_version: ResumeAnalyzer::version().to_string(),
        }))
    }

    fn write(dir: &tempfile::TempDir, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_rejects_invalid_config() {
        let mut config = AnalyzerConfig::default();
        config.match_weights.skill = -1.0;
        let err = ResumeAnalyzer::new(config).err().unwrap();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[test]
    fn test_analyze_text_document() {
        let document = Document::new("jane.txt", DocumentFormat::Txt, RESUME.as_bytes().to_vec());
        let report = analyzer().analyze(&document, JOB).unwrap();

        assert_eq!(report.resume_path, "jane.txt");
        assert_eq!(report.analyzer_version, env!("CARGO_PKG_VERSION"));
        assert!(report
            .match_results
            .matched_keywords
            .contains(&SkillToken::new("python")));
        assert_eq!(
            report.match_results.missing_keywords,
            vec![SkillToken::new("kubernetes")]
        );
        assert!((0.0..=100.0).contains(&report.overall_score));
        assert_eq!(report.overall_score, report.match_results.overall_score);
        assert!(report.keywords.contains(&"kafka".to_string()));
        assert!(report.recommendations.iter().any(|r| r.contains("kubernetes")));
        assert_eq!(report.resume_data.contact.name.as_deref(), Some("Jane Doe"));
        assert_eq!(report.resume_data.experience.len(), 2);
    }

    #[test]
    fn test_report_json_contract() {
        let document = Document::new("jane.txt", DocumentFormat::Txt, RESUME.as_bytes().to_vec());
        let report = analyzer().analyze(&document, JOB).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        for key in [
            "overall_score",
            "keywords",
            "recommendations",
            "ats_score",
            "match_results",
            "resume_data",
            "ats_issues",
            "resume_path",
            "analyzer_version",
        ] {
            assert!(json.get(key).is_some(), "missing {key}");
        }
        assert!(json["match_results"].get("keyword_matches").is_some());
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let document = Document::new("jane.txt", DocumentFormat::Txt, RESUME.as_bytes().to_vec());
        let a = analyzer();
        let first = a.analyze(&document, JOB).unwrap();
        assert_eq!(a.analyze(&document, JOB).unwrap(), first);
        assert_eq!(a.clone().analyze(&document, JOB).unwrap(), first);
    }

    #[test]
    fn test_docx_document() {
        let lines: Vec<&str> = RESUME.lines().collect();
        let document = Document::new("jane.docx", DocumentFormat::Docx, minimal_docx(&lines));
        let report = analyzer().analyze(&document, JOB).unwrap();
        assert_eq!(report.resume_data.contact.email.as_deref(), Some("jane.doe@example.com"));
        assert!(report.resume_data.skills.contains(&SkillToken::new("rust")));
    }

    #[test]
    fn test_empty_document_is_invalid_input() {
        let document = Document::new("empty.txt", DocumentFormat::Txt, Vec::new());
        let err = analyzer().analyze(&document, JOB).unwrap_err();
        assert_eq!(err.code(), "INVALID_INPUT");
    }

    #[test]
    fn test_analyze_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = write(&dir, "jane.TXT", RESUME.as_bytes());
        let report = analyzer().analyze_path(&path, JOB).unwrap();
        assert_eq!(report.resume_path, path.display().to_string());

        let missing = dir.path().join("nobody.pdf");
        assert_eq!(
            analyzer().analyze_path(&missing, JOB).unwrap_err().code(),
            "FILE_NOT_FOUND"
        );
    }

    #[test]
    fn test_ats_check() {
        let document = Document::new("jane.txt", DocumentFormat::Txt, RESUME.as_bytes().to_vec());
        let ats = analyzer().ats_check(&document).unwrap();
        assert!(ats.blocking().next().is_none(), "{:?}", ats.issues);
        assert!(ats.score > 50.0);
    }

    #[test]
    fn test_sort_entries_descending_and_stable() {
        let mut entries = vec![
            report_with_score("a", 40.0),
            report_with_score("b", 90.0),
            report_with_score("c", 70.0),
        ];
        sort_entries(&mut entries);
        let scores: Vec<f64> = entries.iter().map(|e| e.overall_score()).collect();
        assert_eq!(scores, vec![90.0, 70.0, 40.0]);

        let mut ties = vec![
            report_with_score("first", 50.0),
            BatchEntry::Failed {
                error: "x".to_string(),
                code: "FILE_NOT_FOUND".to_string(),
                resume_path: "gone".to_string(),
            },
            report_with_score("second", 50.0),
        ];
        sort_entries(&mut ties);
        let order: Vec<&str> = ties.iter().map(|e| e.resume_path()).collect();
        assert_eq!(order, vec!["first", "second", "gone"]);
    }

    #[test]
    fn test_batch_with_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = write(&dir, "jane.txt", RESUME.as_bytes());
        let weak = write(&dir, "weak.txt", b"Sam Smith\nsam@example.com\nLikes cooking.");
        let exe = write(&dir, "virus.exe", b"MZ");
        let missing = dir.path().join("missing.pdf");

        let entries = analyzer().analyze_batch(&[weak.clone(), missing, exe, good.clone()], JOB);

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].resume_path(), good.display().to_string());
        assert_eq!(entries[1].resume_path(), weak.display().to_string());
        let codes: Vec<&str> = entries[2..]
            .iter()
            .map(|e| match e {
                BatchEntry::Failed { code, .. } => code.as_str(),
                BatchEntry::Report(_) => "",
            })
            .collect();
        assert_eq!(codes, vec!["FILE_NOT_FOUND", "UNSUPPORTED_FORMAT"]);
    }

    #[tokio::test]
    async fn test_parallel_batch_matches_sequential() {
        let dir = tempfile::tempdir().unwrap();
        let paths = vec![
            write(&dir, "weak.txt", b"Sam Smith\nsam@example.com\nLikes cooking."),
            write(&dir, "jane.txt", RESUME.as_bytes()),
            dir.path().join("missing.docx"),
        ];
        let a = analyzer();

        let sequential = a.analyze_batch(&paths, JOB);
        let parallel = a
            .analyze_batch_parallel(&paths, JOB, Some(Duration::from_secs(30)))
            .await;
        assert_eq!(parallel, sequential);

        let untimed = a.analyze_batch_parallel(&paths, JOB, None).await;
        assert_eq!(untimed, sequential);
    }

    struct FixedScorer(f64);

    impl MatchScorer for FixedScorer {
        fn score(&self, _resume: &ResumeRecord, _job: &NormalizedText) -> MatchResult {
            MatchResult {
                overall_score: self.0,
                matched_keywords: BTreeSet::new(),
                missing_keywords: vec![],
                skill_score: self.0,
                experience_score: self.0,
                recommendations: vec![],
            }
        }
    }

    #[test]
    fn test_custom_match_scorer() {
        let document = Document::new("jane.txt", DocumentFormat::Txt, RESUME.as_bytes().to_vec());
        let report = analyzer()
            .with_match_scorer(Arc::new(FixedScorer(42.0)))
            .analyze(&document, JOB)
            .unwrap();
        assert_eq!(report.overall_score, 42.0);
    }
}
