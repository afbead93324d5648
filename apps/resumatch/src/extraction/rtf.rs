//! RTF text extraction.
//!
//! A single-pass control-word stripper: groups are tracked on a stack,
//! destinations that never hold body text (font tables, pictures, headers …)
//! are skipped, paragraph and line controls become newlines, and `\'hh` /
//! `\uN` escapes are decoded.

use tracing::debug;

use crate::errors::{AnalysisError, AnalysisResult};
use crate::extraction::plain::windows_1252_char;

const SKIPPED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "colortbl",
    "stylesheet",
    "info",
    "pict",
    "object",
    "header",
    "headerl",
    "headerr",
    "headerf",
    "footer",
    "footerl",
    "footerr",
    "footerf",
    "listtable",
    "listoverridetable",
    "rsidtbl",
    "generator",
    "xmlnstbl",
    "themedata",
    "colorschememapping",
    "latentstyles",
    "datastore",
    "fldinst",
    "filetbl",
    "revtbl",
];

#[derive(Debug, Clone, Copy)]
struct Group {
    skip: bool,
    /// Fallback characters that follow each `\uN`.
    uc: usize,
}

struct Stripper {
    out: String,
    group: Group,
    stack: Vec<Group>,
    fallback_left: usize,
}

impl Stripper {
    fn emit(&mut self, c: char) {
        if self.group.skip {
            return;
        }
        if self.fallback_left > 0 {
            self.fallback_left -= 1;
            return;
        }
        self.out.push(c);
    }

    fn emit_break(&mut self, c: char) {
        // breaks are never fallback characters
        self.fallback_left = 0;
        if !self.group.skip {
            self.out.push(c);
        }
    }

    fn control_word(&mut self, word: &str, param: Option<i32>) {
        match word {
            "par" | "line" | "sect" | "page" | "row" => self.emit_break('\n'),
            "tab" | "cell" => self.emit_break('\t'),
            "emdash" => self.emit('—'),
            "endash" => self.emit('–'),
            "bullet" => self.emit('•'),
            "lquote" => self.emit('‘'),
            "rquote" => self.emit('’'),
            "ldblquote" => self.emit('“'),
            "rdblquote" => self.emit('”'),
            "uc" => self.group.uc = param.unwrap_or(1).max(0) as usize,
            "u" => {
                if let Some(n) = param {
                    // values above 32767 are written as negative numbers
                    let code = if n < 0 { n + 65536 } else { n };
                    if let Some(c) = char::from_u32(code as u32) {
                        self.emit(c);
                    }
                    self.fallback_left = self.group.uc;
                }
            }
            w if SKIPPED_DESTINATIONS.contains(&w) => self.group.skip = true,
            _ => {}
        }
    }
}

pub fn extract(content: &[u8]) -> AnalysisResult<String> {
    let start = content
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(content.len());
    let bytes = &content[start..];
    if !bytes.starts_with(b"{\\rtf") {
        return Err(AnalysisError::CorruptDocument(
            "missing {\\rtf signature".to_string(),
        ));
    }

    let mut s = Stripper {
        out: String::with_capacity(bytes.len() / 2),
        group: Group { skip: false, uc: 1 },
        stack: Vec::new(),
        fallback_left: 0,
    };

    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'{' => {
                s.stack.push(s.group);
                i += 1;
            }
            b'}' => {
                if let Some(prev) = s.stack.pop() {
                    s.group = prev;
                }
                i += 1;
            }
            b'\\' => i = control(&mut s, bytes, i + 1),
            b'\r' | b'\n' => i += 1,
            b => {
                s.emit(windows_1252_char(b));
                i += 1;
            }
        }
    }

    if !s.stack.is_empty() {
        debug!(open_groups = s.stack.len(), "RTF ended with unclosed groups");
    }
    Ok(s.out)
}

/// Handles the control sequence starting at `i` (just past the backslash).
/// Returns the index of the next unread byte.
fn control(s: &mut Stripper, bytes: &[u8], mut i: usize) -> usize {
    let Some(&c) = bytes.get(i) else {
        return i;
    };
    match c {
        b'\\' | b'{' | b'}' => {
            s.emit(c as char);
            i + 1
        }
        b'\'' => {
            let hex = bytes.get(i + 1..i + 3).and_then(|h| std::str::from_utf8(h).ok());
            if let Some(b) = hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
                s.emit(windows_1252_char(b));
            }
            i + 3
        }
        b'*' => {
            s.group.skip = true;
            i + 1
        }
        b'~' => {
            s.emit(' ');
            i + 1
        }
        b'_' => {
            s.emit('-');
            i + 1
        }
        b'\r' | b'\n' => {
            s.emit_break('\n');
            i + 1
        }
        c if c.is_ascii_alphabetic() => {
            let word_start = i;
            while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
                i += 1;
            }
            let word = std::str::from_utf8(&bytes[word_start..i]).unwrap_or_default();

            let param_start = i;
            if i < bytes.len() && bytes[i] == b'-' {
                i += 1;
            }
            while i < bytes.len() && bytes[i].is_ascii_digit() {
                i += 1;
            }
            let param = std::str::from_utf8(&bytes[param_start..i])
                .ok()
                .and_then(|p| p.parse::<i32>().ok());

            if i < bytes.len() && bytes[i] == b' ' {
                i += 1;
            }

            if word == "bin" {
                // raw binary payload of the given length follows
                return i + param.unwrap_or(0).max(0) as usize;
            }
            s.control_word(word, param);
            i
        }
        // \- optional hyphen, \| and others: no text
        _ => i + 1,
    }
}
