//! Plain-text decoding: BOM-sniffed UTF-8 / UTF-16, else UTF-8, else Windows-1252.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use crate::errors::{AnalysisError, AnalysisResult};

pub fn decode(content: &[u8]) -> AnalysisResult<String> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(content) {
        return encoding
            .decode_without_bom_handling_and_without_replacement(&content[bom_len..])
            .map(|text| text.into_owned())
            .ok_or_else(|| {
                AnalysisError::CorruptDocument(format!("malformed {} text", encoding.name()))
            });
    }

    // NUL bytes never appear in a text resume; this is a binary file renamed .txt
    if content.contains(&0) {
        return Err(AnalysisError::CorruptDocument(
            "binary content in a plain-text document".to_string(),
        ));
    }

    match UTF_8.decode_without_bom_handling_and_without_replacement(content) {
        Some(text) => Ok(text.into_owned()),
        None => Ok(WINDOWS_1252
            .decode_without_bom_handling(content)
            .0
            .into_owned()),
    }
}

/// Maps a Windows-1252 byte to its character. Also used for RTF `\'hh` escapes.
pub(crate) fn windows_1252_char(b: u8) -> char {
    WINDOWS_1252
        .decode_without_bom_handling(&[b])
        .0
        .chars()
        .next()
        .unwrap_or(char::REPLACEMENT_CHARACTER)
}
