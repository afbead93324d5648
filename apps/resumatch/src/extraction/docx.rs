//! DOCX text extraction using docx-rs.
//!
//! Paragraph text, hyperlink text and tables are recovered in document order;
//! styling and layout are discarded. Table rows become one line each with
//! ` | ` between cells, which keeps two-column resume templates readable.

use docx_rs::{DocumentChild, ParagraphChild, RunChild, TableCellContent, TableChild, TableRowChild};

use crate::errors::{AnalysisError, AnalysisResult};

pub fn extract(content: &[u8]) -> AnalysisResult<String> {
    let docx = docx_rs::read_docx(content)
        .map_err(|e| AnalysisError::CorruptDocument(format!("failed to parse DOCX: {e}")))?;

    let mut lines: Vec<String> = Vec::new();
    for child in &docx.document.children {
        match child {
            DocumentChild::Paragraph(p) => {
                let text = paragraph_text(p);
                if !text.trim().is_empty() {
                    lines.push(text);
                }
            }
            DocumentChild::Table(t) => {
                for row in table_rows(t) {
                    lines.push(row);
                }
            }
            _ => {}
        }
    }

    Ok(lines.join("\n"))
}

fn paragraph_text(p: &docx_rs::Paragraph) -> String {
    let mut text = String::new();
    for child in &p.children {
        match child {
            ParagraphChild::Run(r) => push_run(&mut text, r),
            ParagraphChild::Hyperlink(h) => {
                for inner in &h.children {
                    if let ParagraphChild::Run(r) = inner {
                        push_run(&mut text, r);
                    }
                }
            }
            _ => {}
        }
    }
    text
}

fn push_run(text: &mut String, run: &docx_rs::Run) {
    for child in &run.children {
        match child {
            RunChild::Text(t) => text.push_str(&t.text),
            RunChild::Tab(_) => text.push('\t'),
            RunChild::Break(_) => text.push('\n'),
            _ => {}
        }
    }
}

fn table_rows(t: &docx_rs::Table) -> Vec<String> {
    let mut rows = Vec::new();
    for row in &t.rows {
        let TableChild::TableRow(r) = row;
        let cells: Vec<String> = r
            .cells
            .iter()
            .map(|cell| {
                let TableRowChild::TableCell(c) = cell;
                c.children
                    .iter()
                    .filter_map(|content| match content {
                        TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                        _ => None,
                    })
                    .filter(|s| !s.trim().is_empty())
                    .collect::<Vec<_>>()
                    .join("\n")
            })
            .filter(|s| !s.trim().is_empty())
            .collect();
        if !cells.is_empty() {
            rows.push(cells.join(" | "));
        }
    }
    rows
}
