use std::fmt;

use serde::{Deserialize, Serialize};

/// Plain text with control characters stripped and whitespace collapsed.
///
/// Every whitespace run becomes exactly one character: `'\n'` when the run
/// contained a line break, `' '` otherwise. There is no leading or trailing
/// whitespace. Line breaks survive so section headings stay detectable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct NormalizedText(String);

impl NormalizedText {
    pub fn new(raw: &str) -> Self {
        let mut out = String::with_capacity(raw.len());
        let mut pending: Option<char> = None;

        for c in raw.chars() {
            if c.is_whitespace() {
                let brk = is_line_break(c) || pending == Some('\n');
                pending = Some(if brk { '\n' } else { ' ' });
            } else if c.is_control() || is_invisible(c) {
                continue;
            } else {
                if let Some(ws) = pending.take() {
                    if !out.is_empty() {
                        out.push(ws);
                    }
                }
                out.push(c);
            }
        }

        Self(out)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.0.split('\n')
    }

    pub fn word_count(&self) -> usize {
        self.0.split_whitespace().count()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{0B}' | '\u{0C}' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Zero-width and soft-hyphen characters that PDF and DOCX exports leak.
fn is_invisible(c: char) -> bool {
    matches!(c, '\u{00AD}' | '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FEFF}')
}

impl From<String> for NormalizedText {
    fn from(raw: String) -> Self {
        Self::new(&raw)
    }
}

impl From<&str> for NormalizedText {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl From<NormalizedText> for String {
    fn from(text: NormalizedText) -> Self {
        text.0
    }
}

impl AsRef<str> for NormalizedText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NormalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
