//! PDF text extraction cascade.
//!
//! Stages run in order until one yields usable text:
//! 1. `pdf-extract` over the in-memory document.
//! 2. A raw scan of literal strings passed to the `Tj`/`'`/`TJ` text operators.
//!    Only finds text in uncompressed content streams.
//! 3. A placeholder describing the file.
//!
//! Output whose trimmed length is under `MIN_TEXT_CHARS` counts as a failure.
//! Everything here is synchronous and CPU-bound; call it from `spawn_blocking`.

use std::panic;

use serde::Serialize;
use tracing::{debug, info, warn};

pub const MIN_TEXT_CHARS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStage {
    PdfExtract,
    RawOperators,
    Placeholder,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractedText {
    pub text: String,
    pub stage: ExtractionStage,
}

fn usable(text: String) -> Option<String> {
    let trimmed = text.trim();
    (trimmed.chars().count() >= MIN_TEXT_CHARS).then(|| trimmed.to_string())
}

pub fn extract_text(bytes: &[u8], file_name: &str) -> ExtractedText {
    if let Some(text) = with_pdf_extract(bytes) {
        info!(chars = text.len(), "Extracted PDF text with pdf-extract");
        return ExtractedText {
            text,
            stage: ExtractionStage::PdfExtract,
        };
    }

    if let Some(text) = usable(scan_text_operators(bytes)) {
        info!(chars = text.len(), "Extracted PDF text from raw text operators");
        return ExtractedText {
            text,
            stage: ExtractionStage::RawOperators,
        };
    }

    warn!(file_name, size = bytes.len(), "All PDF text extractors failed, using placeholder");
    ExtractedText {
        text: placeholder(file_name, bytes.len()),
        stage: ExtractionStage::Placeholder,
    }
}

fn with_pdf_extract(bytes: &[u8]) -> Option<String> {
    // pdf-extract panics on some malformed fonts and encodings.
    match panic::catch_unwind(|| pdf_extract::extract_text_from_mem(bytes)) {
        Ok(Ok(text)) => usable(text),
        Ok(Err(e)) => {
            debug!(error = %e, "pdf-extract failed");
            None
        }
        Err(_) => {
            warn!("pdf-extract panicked");
            None
        }
    }
}

fn placeholder(file_name: &str, size: usize) -> String {
    let size_kb = (size as f64 / 1024.0).round() as u64;
    format!(
        "PDF Document: {file_name}\n\n\
         File Size: {size_kb}KB\n\n\
         Note: The text of this PDF could not be extracted automatically. \
         The document may be scanned or image-based."
    )
}

fn is_delimiter(b: u8) -> bool {
    b.is_ascii_whitespace() || matches!(b, b'(' | b')' | b'[' | b']' | b'<' | b'>' | b'/' | b'{' | b'}' | b'%')
}

/// True when the next token at or after `from` is exactly `op`.
fn followed_by(bytes: &[u8], from: usize, op: &[u8]) -> bool {
    let start = bytes[from.min(bytes.len())..]
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .map(|p| from + p);
    match start {
        Some(s) if bytes[s..].starts_with(op) => bytes
            .get(s + op.len())
            .map_or(true, |&b| is_delimiter(b)),
        _ => false,
    }
}

/// Reads a literal string starting at the `(` at `start`. Returns the decoded
/// text and the index just past the closing `)`.
fn read_literal(bytes: &[u8], start: usize) -> (String, usize) {
    let mut out = String::new();
    let mut depth = 0usize;
    let mut i = start;

    while i < bytes.len() {
        let b = bytes[i];
        match b {
            b'(' => {
                if depth > 0 {
                    out.push('(');
                }
                depth += 1;
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return (out, i + 1);
                }
                out.push(')');
            }
            b'\\' => {
                i += 1;
                let Some(&esc) = bytes.get(i) else { break };
                match esc {
                    b'n' => out.push('\n'),
                    b'r' => out.push('\r'),
                    b't' => out.push('\t'),
                    b'b' | b'f' => {}
                    b'0'..=b'7' => {
                        let digits = bytes[i..]
                            .iter()
                            .take(3)
                            .take_while(|d| (b'0'..=b'7').contains(d))
                            .count();
                        let code = bytes[i..i + digits]
                            .iter()
                            .fold(0u32, |acc, d| acc * 8 + u32::from(d - b'0'));
                        if let Some(c) = char::from_u32(code & 0xff) {
                            out.push(c);
                        }
                        i += digits - 1;
                    }
                    b'\r' | b'\n' => {}
                    other => out.push(other as char),
                }
            }
            _ => out.push(b as char),
        }
        i += 1;
    }
    (out, bytes.len())
}

/// Collects the literal strings shown by text operators, one line per
/// positioning operator.
pub fn scan_text_operators(bytes: &[u8]) -> String {
    let mut out = String::new();
    let mut array: Option<Vec<String>> = None;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'(' => {
                let (literal, next) = read_literal(bytes, i);
                i = next;
                match array.as_mut() {
                    Some(parts) => parts.push(literal),
                    None if followed_by(bytes, i, b"Tj") || followed_by(bytes, i, b"'") => {
                        out.push_str(&literal);
                        out.push(' ');
                    }
                    None => {}
                }
                continue;
            }
            b'[' => array = Some(Vec::new()),
            b']' => {
                if let Some(parts) = array.take() {
                    if followed_by(bytes, i + 1, b"TJ") {
                        out.push_str(&parts.concat());
                        out.push(' ');
                    }
                }
            }
            b'T' if i > 0
                && bytes[i - 1].is_ascii_whitespace()
                && matches!(bytes.get(i + 1), Some(b'd' | b'D' | b'*'))
                && bytes.get(i + 2).map_or(true, |&b| is_delimiter(b)) =>
            {
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
            }
            _ => {}
        }
        i += 1;
    }

    out.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
