//! Text normalization applied before any offset arithmetic
//!
//! Every position in this crate (explicit mistake ranges, substring match
//! offsets, token boundaries) is computed against the output of
//! [`normalize`]. The raw text a student typed (or a browser pasted) can mix
//! `\r\n`, bare `\r` and non-breaking spaces; canonicalizing those up front
//! means the resolver and tokenizer never disagree about where a character
//! lives.
//!
//! Normalization must not delete characters: a caller may already hold
//! offsets into the text, so the only allowed edits are 1-to-1 replacements
//! and the `\r\n` → `\n` collapse applied before any offsets exist.

use once_cell::sync::Lazy;
use regex::Regex;

/// Lazy-compiled regex matching `\r\n` or a bare `\r`
static LINE_ENDINGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\r\n?").unwrap());

/// Canonicalize line endings and non-breaking spaces.
///
/// Applied in order:
/// 1. `\r\n` and bare `\r` become `\n`.
/// 2. U+00A0 (non-breaking space) becomes an ordinary space.
///
/// Absent input normalizes to the empty string. No trimming, no case
/// changes, nothing else is touched.
pub fn normalize(input: Option<&str>) -> String {
    let text = match input {
        Some(text) if !text.is_empty() => text,
        _ => return String::new(),
    };

    LINE_ENDINGS
        .replace_all(text, "\n")
        .replace('\u{00A0}', " ")
}
