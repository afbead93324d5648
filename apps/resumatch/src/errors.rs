use std::path::PathBuf;

use thiserror::Error;

/// Library-level error type.
/// Scorers never return it; only document loading and extraction do.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Corrupt document: {0}")]
    CorruptDocument(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Stable machine-readable code, used in batch error entries.
    pub fn code(&self) -> &'static str {
        match self {
            AnalysisError::FileNotFound(_) => "FILE_NOT_FOUND",
            AnalysisError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            AnalysisError::CorruptDocument(_) => "CORRUPT_DOCUMENT",
            AnalysisError::InvalidInput(_) => "INVALID_INPUT",
            AnalysisError::Io(_) => "IO_ERROR",
        }
    }
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
