//! Span resolution: from mistake descriptors to non-overlapping highlights
//!
//! The resolver turns a list of [`MistakeDescriptor`]s into an accepted set
//! of [`HighlightSpan`]s over the normalized text, plus an id for every
//! mistake, resolved or not, so a list entry can still be linked and
//! scrolled to when its text never matched.
//!
//! Resolution order is deliberately simple and deterministic rather than
//! "best match": explicit ranges are accepted first in list order, then
//! substring mistakes are matched longest-needle-first (ties by id), each
//! claiming the leftmost occurrence that does not overlap anything already
//! taken. A mistake yields at most one span; a mistake that cannot be
//! placed yields none.
//!
//! # Matching policy
//!
//! Needles that are plain Latin words or space-separated Latin phrases are
//! matched with word-boundary anchors, so a needle `he` can claim `He` or
//! `he` but never the inside of `she`. Anything else (non-Latin scripts,
//! needles carrying punctuation) falls back to raw escaped substring
//! matching. Both forms are case-insensitive.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::highlight::descriptor::{MistakeDescriptor, ResolutionStrategy};
use crate::highlight::normalize::normalize;
use crate::highlight::token::{clamp_offsets, HighlightSpan};

/// Lazy-compiled regex classifying needles that get word-boundary anchors:
/// Latin words (with internal apostrophes or hyphens) separated by single spaces
static LATIN_PHRASE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z]+(?:['’-][A-Za-z]+)*(?: [A-Za-z]+(?:['’-][A-Za-z]+)*)*$").unwrap()
});

/// Output of one resolution pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedMistakes {
    /// Accepted spans, pairwise non-overlapping.
    pub spans: Vec<HighlightSpan>,
    /// The id assigned to each mistake, indexed by its position in the
    /// input list. Present even for mistakes that resolved to no span.
    pub id_by_index: Vec<String>,
}

/// Resolve a mistake list against normalized text.
///
/// `text` must be the output of [`normalize`]; descriptors' `original`
/// needles are pushed through the same normalizer before searching so both
/// sides agree on line endings and spaces.
pub fn resolve_spans(text: &str, mistakes: &[MistakeDescriptor]) -> ResolvedMistakes {
    let ids = assign_ids(mistakes);

    let mut spans: Vec<HighlightSpan> = Vec::new();
    let mut searches: Vec<(usize, String)> = Vec::new();

    // Explicit ranges first, in list order. First-come wins on overlap so
    // the accepted set stays pairwise non-overlapping.
    for (index, mistake) in mistakes.iter().enumerate() {
        match mistake.strategy() {
            ResolutionStrategy::ExplicitRange { start, end } => {
                if let Some((start, end)) = clamp_signed(text, start, end) {
                    let span = HighlightSpan {
                        id: ids[index].clone(),
                        start,
                        end,
                        category: mistake.category.clone(),
                    };
                    if !spans.iter().any(|taken| taken.overlaps(&span)) {
                        spans.push(span);
                    }
                }
            }
            ResolutionStrategy::SubstringSearch { needle } => {
                let needle = normalize(Some(&needle));
                if !needle.is_empty() {
                    searches.push((index, needle));
                }
            }
            ResolutionStrategy::Unresolvable => {}
        }
    }

    // Longer needles first so a short needle contained in a longer one
    // cannot steal the match; ties break by id for determinism.
    searches.sort_by(|(a_index, a_needle), (b_index, b_needle)| {
        b_needle
            .chars()
            .count()
            .cmp(&a_needle.chars().count())
            .then_with(|| ids[*a_index].cmp(&ids[*b_index]))
    });

    for (index, needle) in searches {
        if let Some((start, end)) = find_first_available(text, &needle, &spans) {
            spans.push(HighlightSpan {
                id: ids[index].clone(),
                start,
                end,
                category: mistakes[index].category.clone(),
            });
        }
    }

    ResolvedMistakes {
        spans,
        id_by_index: ids,
    }
}

/// Assign a unique id to every mistake in the list.
///
/// The descriptor's own preference (explicit id, numeric index, list
/// position) is taken first; a collision with an id already assigned in
/// this pass falls back to the list position, then to `"{id}-{position}"`.
fn assign_ids(mistakes: &[MistakeDescriptor]) -> Vec<String> {
    let mut ids = Vec::with_capacity(mistakes.len());
    let mut used: HashSet<String> = HashSet::new();

    for (index, mistake) in mistakes.iter().enumerate() {
        let preferred = mistake.assigned_id(index);
        let id = if used.insert(preferred.clone()) {
            preferred
        } else if used.insert(index.to_string()) {
            index.to_string()
        } else {
            let mut fallback = format!("{}-{}", preferred, index);
            while !used.insert(fallback.clone()) {
                fallback = format!("{}-{}", fallback, index);
            }
            fallback
        };
        ids.push(id);
    }

    ids
}

/// Clamp a signed range from an upstream payload into the text.
fn clamp_signed(text: &str, start: i64, end: i64) -> Option<(usize, usize)> {
    let cap = |value: i64| -> usize {
        if value < 0 {
            0
        } else {
            (value as u64).min(text.len() as u64) as usize
        }
    };
    clamp_offsets(text, cap(start), cap(end))
}

/// Find the leftmost occurrence of `needle` that overlaps no accepted span.
fn find_first_available(
    text: &str,
    needle: &str,
    taken: &[HighlightSpan],
) -> Option<(usize, usize)> {
    let escaped = regex::escape(needle);
    let pattern = if LATIN_PHRASE.is_match(needle) {
        format!(r"(?i)\b{}\b", escaped)
    } else {
        format!(r"(?i){}", escaped)
    };
    // Escaped needles always compile; a failure just leaves the mistake
    // unhighlighted, matching the "described but not shown" fallback.
    let finder = Regex::new(&pattern).ok()?;

    let found = finder.find_iter(text).find_map(|found| {
        let free = !taken
            .iter()
            .any(|span| span.start < found.end() && found.start() < span.end);
        free.then(|| (found.start(), found.end()))
    });
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn substring(original: &str) -> MistakeDescriptor {
        MistakeDescriptor {
            original: Some(original.to_string()),
            ..Default::default()
        }
    }

    fn explicit(start: i64, end: i64) -> MistakeDescriptor {
        MistakeDescriptor {
            start: Some(start),
            end: Some(end),
            ..Default::default()
        }
    }

    #[test]
    fn test_single_substring_mistake() {
        let resolved = resolve_spans("I go to school yesterday.", &[substring("go")]);
        assert_eq!(resolved.id_by_index, vec!["0"]);
        assert_eq!(resolved.spans, vec![HighlightSpan::new("0", 2, 4)]);
    }

    #[test]
    fn test_case_insensitive_match() {
        let resolved = resolve_spans("He went home.", &[substring("he")]);
        assert_eq!(resolved.spans, vec![HighlightSpan::new("0", 0, 2)]);
    }

    #[test]
    fn test_unlocatable_needle_keeps_id() {
        let resolved = resolve_spans("plain text", &[substring("xyzzy")]);
        assert!(resolved.spans.is_empty());
        assert_eq!(resolved.id_by_index, vec!["0"]);
    }

    #[test]
    fn test_longest_needle_first() {
        let resolved = resolve_spans(
            "cats and catnip",
            &[substring("cat"), substring("catnip")],
        );
        // "catnip" wins its full occurrence; "cat" has no word-boundary
        // occurrence left and resolves to nothing.
        assert_eq!(resolved.spans, vec![HighlightSpan::new("1", 9, 15)]);
        assert_eq!(resolved.id_by_index, vec!["0", "1"]);
    }

    #[test]
    fn test_repeated_needle_claims_next_occurrence() {
        let resolved = resolve_spans("He she he", &[substring("he"), substring("he")]);
        // "she" is never partially matched; the second mistake skips to the
        // trailing standalone "he".
        assert_eq!(
            resolved.spans,
            vec![HighlightSpan::new("0", 0, 2), HighlightSpan::new("1", 7, 9)]
        );
    }

    #[test]
    fn test_word_boundary_blocks_partial_word() {
        let resolved = resolve_spans("cats and dogs", &[substring("cat")]);
        assert!(resolved.spans.is_empty());
    }

    #[test]
    fn test_non_latin_needle_falls_back_to_raw_substring() {
        let resolved = resolve_spans("これは日本語です", &[substring("日本語")]);
        assert_eq!(resolved.spans.len(), 1);
        assert_eq!(resolved.spans[0].start, "これは".len());
        assert_eq!(resolved.spans[0].end, "これは日本語".len());
    }

    #[test]
    fn test_punctuation_needle_falls_back_to_raw_substring() {
        let resolved = resolve_spans("I like, you know, pizza.", &[substring(", you know,")]);
        assert_eq!(resolved.spans, vec![HighlightSpan::new("0", 6, 17)]);
    }

    #[test]
    fn test_explicit_range_resolution() {
        let resolved = resolve_spans("abcdef", &[explicit(2, 4)]);
        assert_eq!(resolved.spans, vec![HighlightSpan::new("0", 2, 4)]);
    }

    #[test]
    fn test_explicit_range_clamped_and_swapped() {
        let resolved = resolve_spans("abcdef", &[explicit(99, -3)]);
        assert_eq!(resolved.spans, vec![HighlightSpan::new("0", 0, 6)]);
    }

    #[test]
    fn test_empty_explicit_range_discarded() {
        let resolved = resolve_spans("abcdef", &[explicit(3, 3)]);
        assert!(resolved.spans.is_empty());
        assert_eq!(resolved.id_by_index, vec!["0"]);
    }

    #[test]
    fn test_explicit_ranges_win_over_search() {
        // The explicit range claims "go"; the search mistake must settle
        // for an occurrence elsewhere or nothing.
        let resolved = resolve_spans("go and go", &[explicit(0, 2), substring("go")]);
        assert_eq!(
            resolved.spans,
            vec![HighlightSpan::new("0", 0, 2), HighlightSpan::new("1", 7, 9)]
        );
    }

    #[test]
    fn test_overlapping_explicit_ranges_first_come_wins() {
        let resolved = resolve_spans("abcdef", &[explicit(0, 4), explicit(2, 6)]);
        assert_eq!(resolved.spans, vec![HighlightSpan::new("0", 0, 4)]);
        assert_eq!(resolved.id_by_index, vec!["0", "1"]);
    }

    #[test]
    fn test_needle_normalized_before_search() {
        // The model echoed a needle with a non-breaking space; the text has
        // an ordinary space after normalization.
        let resolved = resolve_spans("very good work", &[substring("very\u{00A0}good")]);
        assert_eq!(resolved.spans, vec![HighlightSpan::new("0", 0, 9)]);
    }

    #[test]
    fn test_duplicate_ids_disambiguated() {
        let mut first = substring("go");
        first.id = Some("dup".to_string());
        let mut second = substring("school");
        second.id = Some("dup".to_string());

        let resolved = resolve_spans("I go to school.", &[first, second]);
        assert_eq!(resolved.id_by_index, vec!["dup", "1"]);
        let ids: HashSet<_> = resolved.id_by_index.iter().collect();
        assert_eq!(ids.len(), 2);
    }

    #[test]
    fn test_ids_follow_preference_order() {
        let mut with_id = substring("a");
        with_id.id = Some("m9".to_string());
        let mut with_index = substring("b");
        with_index.index = Some(41);

        let resolved = resolve_spans("", &[with_id, with_index, substring("c")]);
        assert_eq!(resolved.id_by_index, vec!["m9", "41", "2"]);
    }

    #[test]
    fn test_accepted_set_never_overlaps() {
        let text = "the cat sat on the mat";
        let mistakes = vec![
            substring("the cat"),
            substring("cat sat"),
            substring("the"),
            explicit(4, 11),
        ];
        let resolved = resolve_spans(text, &mistakes);
        for (i, a) in resolved.spans.iter().enumerate() {
            for b in resolved.spans.iter().skip(i + 1) {
                assert!(!a.overlaps(b), "{} overlaps {}", a, b);
            }
        }
    }
}
