//! The full highlighting pass: normalize → resolve → tokenize
//!
//! This is the one call the rendering layer makes whenever the student text
//! or the mistake list changes. Each pass is a pure function of its inputs
//! and fully replaces any previously derived state; there is nothing to
//! cancel, lock or invalidate.

use serde::Serialize;

use crate::highlight::descriptor::MistakeDescriptor;
use crate::highlight::normalize::normalize;
use crate::highlight::resolve::resolve_spans;
use crate::highlight::token::{HighlightSpan, HighlightToken};
use crate::highlight::tokenize::tokenize;

/// Everything a renderer needs for one text + mistake-list pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    /// The normalized text all offsets refer to.
    pub text: String,
    /// Accepted spans, pairwise non-overlapping.
    pub spans: Vec<HighlightSpan>,
    /// Id assigned to each mistake by input list position, including
    /// mistakes that resolved to no span (for list-entry linking).
    pub id_by_index: Vec<String>,
    /// The rendering stream; token values concatenate back to `text`.
    pub tokens: Vec<HighlightToken>,
}

/// Run the whole pipeline on raw text and an upstream mistake list.
pub fn highlight(text: Option<&str>, mistakes: &[MistakeDescriptor]) -> Highlight {
    let text = normalize(text);
    let resolved = resolve_spans(&text, mistakes);
    let tokens = tokenize(&text, &resolved.spans);
    Highlight {
        text,
        spans: resolved.spans,
        id_by_index: resolved.id_by_index,
        tokens,
    }
}
