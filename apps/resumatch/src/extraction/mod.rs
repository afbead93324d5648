//! Text Extractor — turns a raw document into `NormalizedText`.
//!
//! Each supported format has its own decoder returning raw text; this module
//! routes by `DocumentFormat` and normalizes the result. Extraction is pure:
//! nothing is written to disk.
//!
//! Reading order follows the document's content stream. For single-column
//! resumes that is top-to-bottom; multi-column PDF layouts may interleave.

pub mod document;
mod docx;
mod pdf;
mod plain;
mod rtf;

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::errors::{AnalysisError, AnalysisResult};
use crate::models::NormalizedText;

pub use document::Document;

/// Extensions accepted on input, lowercase with the leading dot.
pub const SUPPORTED_EXTENSIONS: &[&str] = &[".pdf", ".docx", ".txt", ".rtf"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Docx,
    Txt,
    Rtf,
}

impl DocumentFormat {
    pub const ALL: [DocumentFormat; 4] = [
        DocumentFormat::Pdf,
        DocumentFormat::Docx,
        DocumentFormat::Txt,
        DocumentFormat::Rtf,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            DocumentFormat::Pdf => ".pdf",
            DocumentFormat::Docx => ".docx",
            DocumentFormat::Txt => ".txt",
            DocumentFormat::Rtf => ".rtf",
        }
    }

    /// Accepts `pdf`, `.pdf`, `PDF` and so on.
    pub fn from_extension(ext: &str) -> AnalysisResult<Self> {
        let normalized = ext.trim().trim_start_matches('.').to_ascii_lowercase();
        match normalized.as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "docx" => Ok(DocumentFormat::Docx),
            "txt" => Ok(DocumentFormat::Txt),
            "rtf" => Ok(DocumentFormat::Rtf),
            _ => Err(unsupported(ext)),
        }
    }

    pub fn from_path(path: &Path) -> AnalysisResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => Self::from_extension(ext),
            None => Err(unsupported("")),
        }
    }

    /// Container formats must yield some text; an empty result means corruption.
    pub fn is_container(self) -> bool {
        !matches!(self, DocumentFormat::Txt)
    }
}

impl FromStr for DocumentFormat {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_extension(s)
    }
}

impl fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

fn unsupported(ext: &str) -> AnalysisError {
    let shown = if ext.is_empty() { "<none>" } else { ext };
    AnalysisError::UnsupportedFormat(format!(
        "{shown}. Supported formats: {}",
        SUPPORTED_EXTENSIONS.join(", ")
    ))
}

/// Extracts and normalizes the text of a document.
pub fn extract_text(document: &Document) -> AnalysisResult<NormalizedText> {
    if document.content.is_empty() {
        return Err(AnalysisError::InvalidInput(format!(
            "document '{}' is empty",
            document.id
        )));
    }

    let raw = match document.format {
        DocumentFormat::Txt => plain::decode(&document.content)?,
        DocumentFormat::Pdf => pdf::extract(&document.content)?,
        DocumentFormat::Docx => docx::extract(&document.content)?,
        DocumentFormat::Rtf => rtf::extract(&document.content)?,
    };

    let text = NormalizedText::new(&raw);
    if text.is_empty() {
        return Err(if document.format.is_container() {
            AnalysisError::CorruptDocument(format!(
                "no text could be recovered from '{}'",
                document.id
            ))
        } else {
            AnalysisError::InvalidInput(format!("document '{}' contains only whitespace", document.id))
        });
    }

    debug!(
        document = %document.id,
        format = %document.format,
        bytes = document.content.len(),
        words = text.word_count(),
        "Extracted document text"
    );
    Ok(text)
}

/// Extracts a document whose format is given as a free-form tag (`"pdf"`, `".docx"` …).
pub fn extract_tagged(id: &str, format_tag: &str, content: &[u8]) -> AnalysisResult<NormalizedText> {
    let format = format_tag.parse::<DocumentFormat>()?;
    extract_text(&Document::new(id, format, content.to_vec()))
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::io::Cursor;

    /// A one-page PDF with a single Helvetica text run and a correct xref table.
    pub fn minimal_pdf(text: &str) -> Vec<u8> {
        let stream = format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET");
        let objects = [
            "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
            "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 4 0 R >> >> /Contents 5 0 R >>"
                .to_string(),
            "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
            format!(
                "<< /Length {} >>\nstream\n{}\nendstream",
                stream.len(),
                stream
            ),
        ];

        let mut pdf = b"%PDF-1.4\n".to_vec();
        let mut offsets = Vec::new();
        for (i, body) in objects.iter().enumerate() {
            offsets.push(pdf.len());
            pdf.extend_from_slice(format!("{} 0 obj\n{}\nendobj\n", i + 1, body).as_bytes());
        }

        let xref_start = pdf.len();
        let mut xref = format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1);
        for offset in offsets {
            xref.push_str(&format!("{offset:010} 00000 n \n"));
        }
        pdf.extend_from_slice(xref.as_bytes());
        pdf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
                objects.len() + 1,
                xref_start
            )
            .as_bytes(),
        );
        pdf
    }

    /// A DOCX with one paragraph per line.
    pub fn minimal_docx(lines: &[&str]) -> Vec<u8> {
        let mut docx = docx_rs::Docx::new();
        for line in lines {
            docx = docx.add_paragraph(
                docx_rs::Paragraph::new().add_run(docx_rs::Run::new().add_text(*line)),
            );
        }
        let mut buf = Cursor::new(Vec::new());
        docx.build().pack(&mut buf).unwrap();
        buf.into_inner()
    }

    pub fn minimal_rtf(lines: &[&str]) -> Vec<u8> {
        let body = lines.join("\\par\n");
        format!("{{\\rtf1\\ansi\\deff0{{\\fonttbl{{\\f0 Arial;}}}}\n{body}\\par\n}}").into_bytes()
    }
}
