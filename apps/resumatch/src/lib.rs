//! Resume analysis: text extraction, structured parsing, keyword matching
//! against a job description, and ATS compatibility scoring.

pub mod analyzer;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod keywords;
pub mod models;
pub mod parsing;
pub mod scoring;

pub use analyzer::{sort_entries, ResumeAnalyzer};
pub use config::AnalyzerConfig;
pub use errors::{AnalysisError, AnalysisResult};
pub use extraction::{Document, DocumentFormat, SUPPORTED_EXTENSIONS};
pub use models::{AnalysisReport, AtsScore, BatchEntry, MatchResult, ResumeRecord};
