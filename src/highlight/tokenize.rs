//! Conversion of text + spans into an ordered rendering token stream
//!
//! Spans may come from
//! [`resolve_spans`](crate::highlight::resolve::resolve_spans), but also
//! from explicit-offset-only callers, so the tokenizer re-validates
//! everything itself. Malformed or overlapping spans are dropped, never
//! errored; a degraded span set renders as more plain text, not a broken
//! UI.
//!
//! The one guarantee callers may rely on: concatenating the emitted token
//! values reproduces the input text exactly.

use std::cmp::Ordering;

use crate::highlight::token::{clamp_offsets, HighlightSpan, HighlightToken};

/// Sort key: start ascending, then end descending, then id ascending.
/// The descending end puts the longer of two same-start spans first, so the
/// shorter one is skipped as an overlap instead of truncating the longer.
fn start_asc_end_desc(a: &HighlightSpan, b: &HighlightSpan) -> Ordering {
    a.start
        .cmp(&b.start)
        .then_with(|| b.end.cmp(&a.end))
        .then_with(|| a.id.cmp(&b.id))
}

/// Convert normalized text plus highlight spans into rendering tokens.
///
/// Spans need not be pre-sorted or pre-validated. Empty text yields an
/// empty token list; text with no valid span yields a single text token.
pub fn tokenize(text: &str, spans: &[HighlightSpan]) -> Vec<HighlightToken> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut valid: Vec<HighlightSpan> = spans
        .iter()
        .filter_map(|span| {
            clamp_offsets(text, span.start, span.end).map(|(start, end)| HighlightSpan {
                id: span.id.clone(),
                start,
                end,
                category: span.category.clone(),
            })
        })
        .collect();
    valid.sort_by(start_asc_end_desc);

    if valid.is_empty() {
        return vec![HighlightToken::text(text)];
    }

    let mut tokens = Vec::new();
    let mut cursor = 0;

    for span in valid {
        // Starts inside an already-emitted span: overlapping, skip whole.
        if span.start < cursor {
            continue;
        }
        if span.start > cursor {
            tokens.push(HighlightToken::text(&text[cursor..span.start]));
        }
        tokens.push(HighlightToken::mistake(
            &text[span.start..span.end],
            span.id,
            span.category,
        ));
        cursor = span.end;
    }

    if cursor < text.len() {
        tokens.push(HighlightToken::text(&text[cursor..]));
    }

    tokens
}
