//! The immutable documentation search index.

use crate::entry::{Category, Entry, RawEntry};
use crate::error::IndexError;
use rapidfuzz::distance::jaro_winkler;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::query::Keywords;
use super::scoring::{IndexOptions, match_weight};
use super::tokenize::{TermBuilder, hash_term, tokenize_and_stem};

/// Term hash for fast lookup
type TermHash = u64;

/// Suggestions scoring at or below this similarity are not worth showing.
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// A searchable term index with TF-IDF scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermIndex {
    /// Map from term hash to list of (entry position, tf_idf_score) pairs, sorted by score descending
    terms: HashMap<TermHash, Vec<(usize, f32)>>,
    /// Number of indexed documents
    doc_count: usize,
}

impl TermIndex {
    pub(super) fn new(terms: HashMap<TermHash, Vec<(usize, f32)>>, doc_count: usize) -> Self {
        Self { terms, doc_count }
    }

    /// Searches for entries matching the query text using TF-IDF scoring.
    /// Returns entry positions sorted by relevance score (highest first).
    ///
    /// The query is tokenized and stemmed just like indexed terms, so:
    /// - "DiscreteUpdater" matches entries with "discrete", "updater", or "discreteupdat"
    /// - CamelCase, snake_case, and hyphen-case are all handled
    pub fn search(&self, query: &str, limit: usize) -> Vec<(usize, f32)> {
        let stemmer = Stemmer::create(Algorithm::English);
        let tokens = tokenize_and_stem(query, &stemmer);

        if tokens.is_empty() {
            return vec![];
        }

        // Combine scores for documents that match multiple tokens
        let mut combined_scores: HashMap<usize, f32> = HashMap::new();

        for token in &tokens {
            let term_hash = hash_term(token);
            if let Some(results) = self.terms.get(&term_hash) {
                for (doc_idx, score) in results {
                    *combined_scores.entry(*doc_idx).or_insert(0.0) += score;
                }
            }
        }

        let mut results: Vec<_> = combined_scores.into_iter().collect();
        results.sort_by(|(a_idx, a), (b_idx, b)| b.total_cmp(a).then(a_idx.cmp(b_idx)));
        results.truncate(limit);
        results
    }

    /// Get the number of unique terms in the index
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Get the number of documents in the index
    pub fn document_count(&self) -> usize {
        self.doc_count
    }
}

/// Case-folded title and text of one entry, concatenated.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct FoldedEntry {
    haystack: String,
    /// Byte length of the folded title at the start of `haystack`
    title_len: usize,
}

impl FoldedEntry {
    fn new(entry: &Entry) -> Self {
        let mut haystack = entry.title.to_lowercase();
        let title_len = haystack.len();
        haystack.push_str(&entry.text.to_lowercase());
        Self {
            haystack,
            title_len,
        }
    }
}

/// One documentation page and the positions of the entries that belong to it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Location prefix shared by every entry of the page, e.g. `discrete.html`.
    pub path: String,
    /// Human-readable page title, taken from the first entry seen for the page.
    pub title: String,
    entries: Vec<usize>,
}

impl Page {
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

/// A keyword query match with its weight.
#[derive(Debug, Clone, Copy)]
pub struct Match<'a> {
    pub entry: &'a Entry,
    /// Position of the entry in the input sequence.
    pub position: usize,
    pub weight: u32,
}

/// A free-text search hit with its TF-IDF score.
#[derive(Debug, Clone, Copy)]
pub struct SearchHit<'a> {
    pub entry: &'a Entry,
    pub position: usize,
    pub score: f32,
}

/// A fuzzy location suggestion with relevance score.
#[derive(Debug, Clone, Copy)]
pub struct Suggestion<'a> {
    pub entry: &'a Entry,
    /// Jaro-Winkler similarity (0.0 to 1.0, higher is better).
    pub score: f64,
}

/// Immutable, queryable collection of documentation entries.
///
/// Built once from the generator's records; every accessor takes `&self`,
/// so a shared `Arc<SearchIndex>` can be queried from any number of threads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchIndex {
    entries: Vec<Entry>,
    folded: Vec<FoldedEntry>,
    /// Location → position of the last entry carrying it
    by_location: HashMap<String, usize>,
    pages: Vec<Page>,
    terms: TermIndex,
    options: IndexOptions,
}

impl SearchIndex {
    /// Build an index with the default ranking weights.
    pub fn build<I>(records: I) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = RawEntry>,
    {
        Self::build_with(records, IndexOptions::default())
    }

    /// Build an index from the generator's records, in input order.
    ///
    /// Fails on the first malformed record; no partial index is produced.
    pub fn build_with<I>(records: I, options: IndexOptions) -> Result<Self, IndexError>
    where
        I: IntoIterator<Item = RawEntry>,
    {
        let start = std::time::Instant::now();

        let entries = records
            .into_iter()
            .enumerate()
            .map(|(position, raw)| raw.validate(position))
            .collect::<Result<Vec<_>, _>>()?;

        let index = Self::from_entries(entries, options);

        tracing::info!(
            "Built search index: {} entries, {} pages, {} terms in {:?}",
            index.len(),
            index.pages.len(),
            index.terms.term_count(),
            start.elapsed()
        );

        Ok(index)
    }

    fn from_entries(entries: Vec<Entry>, options: IndexOptions) -> Self {
        let mut folded = Vec::with_capacity(entries.len());
        let mut by_location = HashMap::with_capacity(entries.len());
        let mut pages: Vec<Page> = Vec::new();
        let mut page_slots: HashMap<&str, usize> = HashMap::new();
        let mut builder = TermBuilder::default();

        for (position, entry) in entries.iter().enumerate() {
            folded.push(FoldedEntry::new(entry));

            if let Some(shadowed) = by_location.insert(entry.location.clone(), position) {
                tracing::warn!(
                    "Duplicate location '{}': entry {} shadows entry {}",
                    entry.location,
                    position,
                    shadowed
                );
            }

            let slot = *page_slots.entry(entry.page_path()).or_insert_with(|| {
                pages.push(Page {
                    path: entry.page_path().to_string(),
                    title: entry.page.clone(),
                    entries: Vec::new(),
                });
                pages.len() - 1
            });
            pages[slot].entries.push(position);

            builder.add_entry(position, entry);
        }

        Self {
            folded,
            by_location,
            pages,
            terms: builder.finalize(),
            options,
            entries,
        }
    }

    /// Entries matching every keyword, best match first.
    ///
    /// Keywords are normalized first; an empty query matches nothing.
    pub fn query<I, S>(&self, keywords: I) -> Vec<&Entry>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.query_scored(&Keywords::new(keywords))
            .into_iter()
            .map(|m| m.entry)
            .collect()
    }

    /// Like [`query`](Self::query), keeping match weights and input positions.
    ///
    /// Ordered by descending weight; equal weights keep input order.
    pub fn query_scored(&self, keywords: &Keywords) -> Vec<Match<'_>> {
        if keywords.is_empty() {
            return vec![];
        }

        let mut matches: Vec<Match<'_>> = self
            .folded
            .iter()
            .enumerate()
            .filter_map(|(position, folded)| {
                let weight =
                    match_weight(&folded.haystack, folded.title_len, keywords, &self.options)?;
                Some(Match {
                    entry: &self.entries[position],
                    position,
                    weight,
                })
            })
            .collect();

        // Stable sort keeps input order among equal weights
        matches.sort_by(|a, b| b.weight.cmp(&a.weight));
        matches
    }

    /// Free-text search over stemmed title and text terms.
    pub fn search(&self, text: &str, limit: usize) -> Vec<SearchHit<'_>> {
        self.terms
            .search(text, limit)
            .into_iter()
            .map(|(position, score)| SearchHit {
                entry: &self.entries[position],
                position,
                score,
            })
            .collect()
    }

    /// Exact lookup by location.
    pub fn lookup(&self, location: &str) -> Option<&Entry> {
        self.by_location
            .get(location)
            .map(|&position| &self.entries[position])
    }

    /// Like [`lookup`](Self::lookup), but a miss is reported as [`IndexError::NotFound`].
    pub fn require(&self, location: &str) -> Result<&Entry, IndexError> {
        self.lookup(location).ok_or_else(|| IndexError::NotFound {
            location: location.to_string(),
        })
    }

    /// Known locations similar to `location`, most similar first.
    pub fn suggest(&self, location: &str, limit: usize) -> Vec<Suggestion<'_>> {
        let mut suggestions: Vec<(usize, Suggestion<'_>)> = self
            .by_location
            .iter()
            .filter(|(known, _)| known.as_str() != location)
            .filter_map(|(known, &position)| {
                let score = jaro_winkler::similarity(location.chars(), known.chars());
                (score > SUGGESTION_THRESHOLD).then(|| {
                    (
                        position,
                        Suggestion {
                            entry: &self.entries[position],
                            score,
                        },
                    )
                })
            })
            .collect();

        suggestions.sort_by(|(a_pos, a), (b_pos, b)| {
            b.score.total_cmp(&a.score).then(a_pos.cmp(b_pos))
        });
        suggestions
            .into_iter()
            .take(limit)
            .map(|(_, suggestion)| suggestion)
            .collect()
    }

    /// Entry at `position` in the input sequence.
    pub fn get(&self, position: usize) -> Option<&Entry> {
        self.entries.get(position)
    }

    /// All entries, in input order (shadowed duplicates included).
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Distinct locations known to [`lookup`](Self::lookup).
    pub fn locations(&self) -> impl Iterator<Item = &str> {
        self.by_location.keys().map(String::as_str)
    }

    /// Pages in the order they were first seen.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Entries of the page at `page_path`, in input order.
    pub fn page_entries(&self, page_path: &str) -> Vec<&Entry> {
        self.pages
            .iter()
            .find(|page| page.path == page_path)
            .map(|page| {
                page.entries
                    .iter()
                    .map(|&position| &self.entries[position])
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of entries per category, in first-seen order.
    pub fn category_counts(&self) -> Vec<(&Category, usize)> {
        let mut counts: Vec<(&Category, usize)> = Vec::new();
        for entry in &self.entries {
            match counts.iter_mut().find(|(category, _)| **category == entry.category) {
                Some((_, count)) => *count += 1,
                None => counts.push((&entry.category, 1)),
            }
        }
        counts
    }

    pub fn term_index(&self) -> &TermIndex {
        &self.terms
    }

    pub fn options(&self) -> IndexOptions {
        self.options
    }

    /// Whether every stored position refers to an entry and every folded
    /// haystack splits at a character boundary.
    ///
    /// Always true for a built index; checked on indexes decoded from snapshots.
    pub(crate) fn is_consistent(&self) -> bool {
        let len = self.entries.len();
        self.folded.len() == len
            && self.terms.doc_count == len
            && self
                .folded
                .iter()
                .all(|f| f.haystack.is_char_boundary(f.title_len))
            && self.by_location.values().all(|&position| position < len)
            && self
                .pages
                .iter()
                .flat_map(|page| &page.entries)
                .all(|&position| position < len)
            && self
                .terms
                .terms
                .values()
                .flatten()
                .all(|&(position, _)| position < len)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
