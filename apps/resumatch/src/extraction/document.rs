use std::path::Path;

use bytes::Bytes;

use crate::errors::{AnalysisError, AnalysisResult};
use crate::extraction::DocumentFormat;

/// A document ready for extraction: identifier, declared format and raw bytes.
///
/// `content` is a `Bytes` so batch workers can share buffers without copying.
#[derive(Debug, Clone)]
pub struct Document {
    pub id: String,
    pub format: DocumentFormat,
    pub content: Bytes,
}

impl Document {
    pub fn new(id: impl Into<String>, format: DocumentFormat, content: impl Into<Bytes>) -> Self {
        Self {
            id: id.into(),
            format,
            content: content.into(),
        }
    }

    /// Validates and reads a document from disk.
    ///
    /// Fails with `FileNotFound` when the path does not resolve,
    /// `InvalidInput` for directories and files over `max_bytes`, and
    /// `UnsupportedFormat` for unknown extensions.
    pub fn from_path(path: &Path, max_bytes: u64) -> AnalysisResult<Self> {
        let metadata = validate_file_path(path)?;
        let format = DocumentFormat::from_path(path)?;

        if metadata.len() > max_bytes {
            return Err(AnalysisError::InvalidInput(format!(
                "{} is {} bytes, above the {max_bytes} byte limit",
                path.display(),
                metadata.len()
            )));
        }

        let content = std::fs::read(path)?;
        Ok(Self::new(path.display().to_string(), format, content))
    }
}

/// Checks that `path` exists and is a regular file.
pub fn validate_file_path(path: &Path) -> AnalysisResult<std::fs::Metadata> {
    let metadata = match std::fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AnalysisError::FileNotFound(path.to_path_buf()))
        }
        Err(e) => return Err(AnalysisError::Io(e)),
    };
    if !metadata.is_file() {
        return Err(AnalysisError::InvalidInput(format!(
            "path is not a file: {}",
            path.display()
        )));
    }
    Ok(metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        let result = Document::from_path(Path::new("definitely/not/here.pdf"), 1024);
        assert!(matches!(result, Err(AnalysisError::FileNotFound(_))));
    }

    #[test]
    fn test_missing_file_checked_before_format() {
        let result = Document::from_path(Path::new("definitely/not/here.xyz"), 1024);
        assert!(matches!(result, Err(AnalysisError::FileNotFound(_))));
    }

    #[test]
    fn test_directory_is_invalid_input() {
        let dir = tempfile::tempdir().unwrap();
        let result = validate_file_path(dir.path());
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_unsupported_extension_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.odt");
        std::fs::write(&path, "Jane Doe").unwrap();
        let result = Document::from_path(&path, 1024);
        assert!(matches!(result, Err(AnalysisError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "x".repeat(64)).unwrap();
        let result = Document::from_path(&path, 16);
        assert!(matches!(result, Err(AnalysisError::InvalidInput(_))));
    }

    #[test]
    fn test_reads_valid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Resume.TXT");
        std::fs::write(&path, "Jane Doe").unwrap();
        let doc = Document::from_path(&path, 1024).unwrap();
        assert_eq!(doc.format, DocumentFormat::Txt);
        assert_eq!(&doc.content[..], b"Jane Doe");
        assert!(doc.id.ends_with("Resume.TXT"));
    }
}
