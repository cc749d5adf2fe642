//! Spans and tokens: the data model shared by the resolver and tokenizer
//!
//! A [`HighlightSpan`] is a resolved, validated `[start, end)` byte range
//! over the normalized text, attributed to one mistake. A
//! [`HighlightToken`] is one atom of the rendering stream; concatenating
//! token values in order reconstructs the normalized text exactly.
//!
//! Tokens serialize with a `"kind"` tag and camelCase fields so the stream
//! can be handed to a renderer as-is:
//!
//! `{"kind": "mistake", "value": "go", "mistakeId": "0", "category": "grammar"}`

use serde::{Deserialize, Serialize};
use std::fmt;

/// A resolved highlight range over the normalized text.
///
/// Offsets are byte offsets and always lie on `char` boundaries. In an
/// accepted set, `0 <= start < end <= text.len()` holds and spans are
/// pairwise non-overlapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HighlightSpan {
    pub id: String,
    pub start: usize,
    pub end: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl HighlightSpan {
    pub fn new(id: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Check if another span shares any character position with this one.
    pub fn overlaps(&self, other: &HighlightSpan) -> bool {
        self.start < other.end && other.start < self.end
    }
}

impl fmt::Display for HighlightSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{} (#{})", self.start, self.end, self.id)
    }
}

/// One atom of the rendering stream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HighlightToken {
    /// Plain text, never attributed to a mistake.
    Text { value: String },
    /// A substring attributed to exactly one highlight span.
    #[serde(rename_all = "camelCase")]
    Mistake {
        value: String,
        mistake_id: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        category: Option<String>,
    },
}

impl HighlightToken {
    pub fn text(value: impl Into<String>) -> Self {
        HighlightToken::Text {
            value: value.into(),
        }
    }

    pub fn mistake(
        value: impl Into<String>,
        mistake_id: impl Into<String>,
        category: Option<String>,
    ) -> Self {
        HighlightToken::Mistake {
            value: value.into(),
            mistake_id: mistake_id.into(),
            category,
        }
    }

    /// The text this token covers, regardless of kind.
    pub fn value(&self) -> &str {
        match self {
            HighlightToken::Text { value } => value,
            HighlightToken::Mistake { value, .. } => value,
        }
    }

    pub fn is_mistake(&self) -> bool {
        matches!(self, HighlightToken::Mistake { .. })
    }
}

/// Clamp a candidate `[start, end)` range into the text.
///
/// Out-of-bounds offsets are pulled to the text length, reversed offsets
/// are swapped, and both ends are snapped down to the nearest `char`
/// boundary so slicing can never panic on multi-byte text. Returns `None`
/// if the range is empty after clamping.
pub(crate) fn clamp_offsets(text: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let len = text.len();
    let mut start = start.min(len);
    let mut end = end.min(len);
    if start > end {
        std::mem::swap(&mut start, &mut end);
    }
    while !text.is_char_boundary(start) {
        start -= 1;
    }
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    if start >= end {
        return None;
    }
    Some((start, end))
}
