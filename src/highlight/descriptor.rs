//! Upstream mistake payload and its tagged resolution strategy
//!
//! The classifier behind the writing checker returns mistakes as loosely
//! typed JSON, and the field names have drifted across revisions of the
//! upstream prompt: ids arrive as `id`, `mistakeId` or a numeric `index`;
//! offsets arrive as top-level `start`/`end`, `begin`/`stop`, or a nested
//! `position` object; the flagged text sits in `original`. This module
//! absorbs all of those shapes at the deserialization boundary and reduces
//! each descriptor to exactly one [`ResolutionStrategy`], so the resolver
//! never branches on raw optional fields.

use serde::{Deserialize, Deserializer};

/// One flagged issue as delivered by the upstream classifier.
///
/// All fields are optional; unknown fields are ignored. `corrected`,
/// `explanation` and `category` are carried through opaquely for the
/// presentation layer and never interpreted here.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MistakeDescriptor {
    /// Explicit identifier; accepted as a string or a bare number.
    #[serde(alias = "mistakeId", deserialize_with = "string_or_number")]
    pub id: Option<String>,
    /// Numeric identifier used by some prompt revisions instead of `id`.
    pub index: Option<u64>,
    /// Start offset into the normalized text.
    #[serde(alias = "begin")]
    pub start: Option<i64>,
    /// End offset (exclusive) into the normalized text.
    #[serde(alias = "stop")]
    pub end: Option<i64>,
    /// Nested offset object used by one revision.
    pub position: Option<OffsetRange>,
    /// The offending substring, to be located by search.
    pub original: Option<String>,
    /// Proposed correction; opaque to the core.
    pub corrected: Option<String>,
    /// Explanation of the correction; opaque to the core.
    pub explanation: Option<String>,
    /// Classification tag (grammar / vocabulary / spelling / ...); opaque.
    #[serde(alias = "type")]
    pub category: Option<String>,
}

/// Nested `{start, end}` offsets, as in `"position": {"start": 3, "end": 7}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OffsetRange {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

/// How a descriptor should be turned into a highlight span.
///
/// Exactly one strategy applies per descriptor. An explicit offset range
/// takes precedence over substring search when a descriptor carries both.
#[derive(Debug, Clone, PartialEq)]
pub enum ResolutionStrategy {
    /// Use the given character range directly (clamped and validated later).
    ExplicitRange { start: i64, end: i64 },
    /// Locate the first available occurrence of `needle` in the text.
    SubstringSearch { needle: String },
    /// No usable range and no substring; the mistake gets an id but no span.
    Unresolvable,
}

impl MistakeDescriptor {
    /// Reduce the loose payload to its single resolution strategy.
    pub fn strategy(&self) -> ResolutionStrategy {
        let start = self.start.or_else(|| self.position.and_then(|p| p.start));
        let end = self.end.or_else(|| self.position.and_then(|p| p.end));

        if let (Some(start), Some(end)) = (start, end) {
            return ResolutionStrategy::ExplicitRange { start, end };
        }

        match self.original.as_deref() {
            Some(original) if !original.is_empty() => ResolutionStrategy::SubstringSearch {
                needle: original.to_string(),
            },
            _ => ResolutionStrategy::Unresolvable,
        }
    }

    /// The stable identifier for this descriptor at position `list_index`.
    ///
    /// Preference order: explicit string id, then the numeric `index` field
    /// stringified, then the list position stringified. Uniqueness across a
    /// whole resolution pass is enforced by the resolver, not here.
    pub fn assigned_id(&self, list_index: usize) -> String {
        if let Some(id) = self.id.as_deref() {
            if !id.is_empty() {
                return id.to_string();
            }
        }
        if let Some(index) = self.index {
            return index.to_string();
        }
        list_index.to_string()
    }
}

/// Accept `"3"`, `3`, `-3` or null for an id field.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IdRepr {
        Text(String),
        Number(i64),
    }

    let value = Option::<IdRepr>::deserialize(deserializer)?;
    Ok(value.map(|repr| match repr {
        IdRepr::Text(text) => text,
        IdRepr::Number(number) => number.to_string(),
    }))
}
