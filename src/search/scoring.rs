//! Search relevance and ranking algorithms.
//!
//! This module provides the match weight used to rank keyword queries, and
//! the relative relevance shown next to rendered results.

use super::query::Keywords;
use serde::{Deserialize, Serialize};

/// Default weight of one keyword occurrence in an entry title.
pub const DEFAULT_TITLE_WEIGHT: u32 = 4;

/// Default weight of one keyword occurrence in an entry text.
pub const DEFAULT_TEXT_WEIGHT: u32 = 1;

/// Ranking weights fixed at index construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexOptions {
    pub title_weight: u32,
    pub text_weight: u32,
}

impl Default for IndexOptions {
    fn default() -> Self {
        Self {
            title_weight: DEFAULT_TITLE_WEIGHT,
            text_weight: DEFAULT_TEXT_WEIGHT,
        }
    }
}

/// Count non-overlapping occurrences of `needle` in `haystack`.
pub(crate) fn count_occurrences(haystack: &str, needle: &str) -> u32 {
    haystack.matches(needle).count() as u32
}

/// Calculate the match weight of an entry for a keyword query.
///
/// `folded` is the case-folded title immediately followed by the case-folded
/// text, with the title occupying the first `title_len` bytes. A keyword
/// matches when it occurs anywhere in `folded`, including across the
/// title/text boundary. Every keyword has to match; otherwise `None`.
///
/// Weight = Σ over keywords of `title_hits * title_weight + text_hits * text_weight`,
/// where an occurrence spanning the boundary counts as a text hit.
pub(crate) fn match_weight(
    folded: &str,
    title_len: usize,
    keywords: &Keywords,
    options: &IndexOptions,
) -> Option<u32> {
    if keywords.is_empty() {
        return None;
    }

    let (title, text) = folded.split_at(title_len);
    let mut weight = 0u32;
    for keyword in keywords.iter() {
        let total_hits = count_occurrences(folded, keyword);
        if total_hits == 0 {
            return None;
        }
        let title_hits = count_occurrences(title, keyword);
        let text_hits = count_occurrences(text, keyword)
            .max(total_hits.saturating_sub(title_hits));
        weight = weight
            .saturating_add(title_hits.saturating_mul(options.title_weight))
            .saturating_add(text_hits.saturating_mul(options.text_weight));
    }
    Some(weight)
}

/// Relevance of a score relative to the best score in the same result list, in percent.
pub fn relative_relevance(score: f64, best: f64) -> u8 {
    if best <= 0.0 {
        return 100;
    }
    ((score / best) * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("beliefupdaters.discretebelief", "belief", 2)]
    #[case("aaaa", "aa", 2)]
    #[case("", "belief", 0)]
    fn test_count_occurrences(#[case] haystack: &str, #[case] needle: &str, #[case] expected: u32) {
        check!(count_occurrences(haystack, needle) == expected);
    }

    fn weigh(title: &str, text: &str, query: &str) -> Option<u32> {
        let folded = format!("{title}{text}");
        match_weight(&folded, title.len(), &Keywords::parse(query), &IndexOptions::default())
    }

    #[test]
    fn test_title_outweighs_text() {
        check!(weigh("nothingupdater", "", "updater") == Some(4));
        check!(weigh("nothing", "an updater", "updater") == Some(1));
    }

    #[test]
    fn test_every_keyword_must_match() {
        check!(weigh("discretebelief", "a probability vector", "belief particle").is_none());
    }

    #[test]
    fn test_keywords_may_match_in_different_fields() {
        check!(weigh("discretebelief", "a probability vector", "discrete vector") == Some(5));
    }

    #[rstest]
    #[case("nothing", "updater docs", "nothingupdater", Some(1))]
    #[case("nothing", "updater docs", "gupd", Some(1))]
    #[case("nothing", "updater docs", "nothingupdater docs", Some(2))]
    #[case("nothing", "updater docs", "nothing docs", Some(5))]
    #[case("nothing", "updater docs", "nothing  updater", Some(5))]
    fn test_keyword_may_span_title_and_text(
        #[case] title: &str,
        #[case] text: &str,
        #[case] query: &str,
        #[case] expected: Option<u32>,
    ) {
        check!(weigh(title, text, query) == expected);
    }

    #[test]
    fn test_empty_keywords_never_match() {
        let options = IndexOptions::default();
        check!(match_weight("anything", 3, &Keywords::default(), &options).is_none());
    }

    #[rstest]
    #[case(5.0, 10.0, 50)]
    #[case(10.0, 10.0, 100)]
    #[case(1.0, 0.0, 100)]
    #[case(-1.0, 2.0, 0)]
    fn test_relative_relevance(#[case] score: f64, #[case] best: f64, #[case] expected: u8) {
        check!(relative_relevance(score, best) == expected);
    }
}
