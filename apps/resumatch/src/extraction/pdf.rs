//! PDF text extraction wrapping `pdf-extract`.

use tracing::warn;

use crate::errors::{AnalysisError, AnalysisResult};

/// Some generators prepend junk before the header; PDF readers scan the first KiB.
const HEADER_SCAN_BYTES: usize = 1024;

pub fn extract(content: &[u8]) -> AnalysisResult<String> {
    let scan = &content[..content.len().min(HEADER_SCAN_BYTES)];
    if !scan.windows(5).any(|w| w == b"%PDF-") {
        return Err(AnalysisError::CorruptDocument(
            "missing %PDF- header".to_string(),
        ));
    }

    // pdf-extract panics on some malformed inputs instead of returning an error.
    match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(content)) {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(AnalysisError::CorruptDocument(format!(
            "PDF extraction failed: {e}"
        ))),
        Err(_) => {
            warn!("pdf-extract panicked while decoding a document");
            Err(AnalysisError::CorruptDocument(
                "PDF parser aborted on malformed content".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::fixtures::minimal_pdf;

    #[test]
    fn test_missing_header() {
        assert!(matches!(
            extract(b"hello world"),
            Err(AnalysisError::CorruptDocument(_))
        ));
    }

    #[test]
    fn test_truncated_pdf_is_corrupt() {
        let pdf = minimal_pdf("Jane Doe");
        let truncated = &pdf[..40];
        assert!(matches!(
            extract(truncated),
            Err(AnalysisError::CorruptDocument(_))
        ));
    }

    #[test]
    fn test_minimal_pdf_has_text() {
        let text = extract(&minimal_pdf("Jane Doe")).unwrap();
        assert!(text.contains("Jane"), "extracted {text:?}");
    }
}
