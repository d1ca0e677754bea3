//! Text tokenization and stemming utilities for search indexing.

use crate::entry::Entry;
use ahash::AHashMap;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashMap;
use xxhash_rust::xxh3::xxh3_64;

use super::index::TermIndex;

/// Minimum token length for indexing. Set to 1 to allow short names like `b` or `k`.
const MIN_TOKEN_LENGTH: usize = 1;

/// Weight of terms found in an entry title.
const TITLE_TERM_SCORE: f32 = 2.0;

/// Weight of terms found in an entry body.
const TEXT_TERM_SCORE: f32 = 1.0;

/// Common English stop words to filter out from indexing.
/// These high-frequency words add little value to search relevance.
pub(crate) const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "has", "he", "in", "is", "it",
    "its", "of", "on", "that", "the", "to", "was", "will", "with",
];

/// Document identifier: position of the entry in the input sequence.
type DocId = usize;

/// Term hash for fast lookup
type TermHash = u64;

/// Builder for accumulating term frequencies before TF-IDF finalization.
pub(crate) struct TermBuilder {
    /// Flat map from (term_hash, doc_id) → raw TF score
    term_docs: HashMap<(TermHash, DocId), f32>,
    /// Map from doc_id to document length (total term count for normalization)
    doc_lengths: HashMap<DocId, usize>,
    /// Number of documents seen, including those without any term
    doc_count: usize,
    /// Reusable stemmer instance for English language stemming
    stemmer: Stemmer,
}

impl Default for TermBuilder {
    fn default() -> Self {
        Self {
            term_docs: HashMap::default(),
            doc_lengths: HashMap::default(),
            doc_count: 0,
            stemmer: Stemmer::create(Algorithm::English),
        }
    }
}

impl TermBuilder {
    /// Add a term with its TF score for a specific document.
    fn add(&mut self, term: &str, tf_score: f32, doc_id: DocId) {
        let term_hash = hash_term(term);
        *self.term_docs.entry((term_hash, doc_id)).or_insert(0.0) += tf_score;
    }

    /// Extracts and adds terms from text with frequency counting.
    /// TF score = term_count * base_score, where base_score weights importance (2.0 for titles, 1.0 for text).
    fn add_terms(&mut self, text: &str, doc_id: DocId, base_score: f32) {
        let words = tokenize_and_stem(text, &self.stemmer);

        let mut word_counts: AHashMap<String, usize> = AHashMap::with_capacity(words.len());
        for word in words {
            *word_counts.entry(word).or_insert(0) += 1;
        }

        let doc_len: usize = word_counts.values().sum();
        *self.doc_lengths.entry(doc_id).or_insert(0) += doc_len;

        for (word, count) in word_counts {
            let tf_score = (count as f32) * base_score;
            self.add(&word, tf_score, doc_id);
        }
    }

    /// Index the title and text of the entry at `doc_id`.
    pub(crate) fn add_entry(&mut self, doc_id: DocId, entry: &Entry) {
        self.doc_count = self.doc_count.max(doc_id + 1);
        self.add_terms(&entry.title, doc_id, TITLE_TERM_SCORE);
        self.add_terms(&entry.text, doc_id, TEXT_TERM_SCORE);
    }

    /// Calculates IDF scores and produces the final searchable index.
    /// Uses formula: TF-IDF = (1 + ln(tf_normalized)) * ln(total_docs / doc_freq),
    /// where tf_normalized = tf / doc_length for length normalization.
    pub(crate) fn finalize(self) -> TermIndex {
        let start = std::time::Instant::now();
        let total_docs = self.doc_count as f32;

        let total_length: usize = self.doc_lengths.values().sum();
        let avg_doc_length = if self.doc_lengths.is_empty() {
            1.0
        } else {
            total_length as f32 / self.doc_lengths.len() as f32
        };

        // Group flat term_docs by term_hash
        type GroupedDocs = HashMap<TermHash, Vec<(DocId, f32)>>;
        let mut grouped: GroupedDocs = HashMap::new();
        let total_term_doc_pairs = self.term_docs.len();
        for ((term_hash, doc_id), tf_score) in self.term_docs {
            grouped
                .entry(term_hash)
                .or_default()
                .push((doc_id, tf_score));
        }

        let mut terms: HashMap<TermHash, Vec<(DocId, f32)>> = HashMap::with_capacity(grouped.len());

        for (term_hash, doc_scores) in grouped {
            // IDF = ln(total_docs / doc_freq)
            let doc_freq = doc_scores.len() as f32;
            let idf = (total_docs / doc_freq).ln();

            let mut tf_idf_scores: Vec<_> = doc_scores
                .into_iter()
                .map(|(doc_id, tf_score)| {
                    let doc_length = self.doc_lengths.get(&doc_id).copied().unwrap_or(1) as f32;
                    let length_norm = doc_length / avg_doc_length;
                    let tf_normalized = tf_score / length_norm.max(0.5); // Clamp to prevent over-penalization
                    (doc_id, (1.0 + tf_normalized.ln()) * idf)
                })
                .collect();

            // Descending by score, input order on ties
            tf_idf_scores.sort_by(|(a_id, a), (b_id, b)| b.total_cmp(a).then(a_id.cmp(b_id)));

            terms.insert(term_hash, tf_idf_scores);
        }

        let index = TermIndex::new(terms, self.doc_count);

        tracing::debug!(
            "Built term index: {} unique terms, {} documents, {} term-document pairs in {:?}",
            index.term_count(),
            index.document_count(),
            total_term_doc_pairs,
            start.elapsed()
        );

        index
    }
}

/// Tokenizes text into stemmed search terms.
///
/// Words are runs of alphanumerics, `_` and `-`; everything else (spaces,
/// dots, brackets) separates words. Each word is split into subwords at
/// `_`, `-`, case changes and letter/digit changes, and both the subwords
/// and the joined compound are emitted:
///
/// - `DiscreteBelief` → `discret`, `belief`, `discretebelief`
/// - `KMarkovUpdater` → `k`, `markov`, `updat`, `kmarkovupdat`
/// - `uniform_belief` → `uniform`, `belief`, `uniformbelief`
/// - `About-1` → `about`, `1`, `about1`
pub(crate) fn tokenize_and_stem(text: &str, stemmer: &Stemmer) -> Vec<String> {
    let mut tokens = vec![];

    for word in text.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '-')) {
        let subwords: Vec<&str> = word.split(['_', '-']).flat_map(split_identifier).collect();
        for subword in &subwords {
            index_token(subword, &mut tokens, stemmer);
        }
        if subwords.len() > 1 {
            index_token(&subwords.concat(), &mut tokens, stemmer);
        }
    }

    tokens
}

/// Split an identifier without separators into its subwords.
///
/// `KMarkovUpdater` → `K`, `Markov`, `Updater`; `HTTPServer2` → `HTTP`, `Server`, `2`.
fn split_identifier(ident: &str) -> Vec<&str> {
    let chars: Vec<(usize, char)> = ident.char_indices().collect();
    let mut parts = vec![];
    let mut start = 0;

    for i in 1..chars.len() {
        let (at, current) = chars[i];
        let next = chars.get(i + 1).map(|&(_, c)| c);
        if starts_subword(chars[i - 1].1, current, next) {
            parts.push(&ident[start..at]);
            start = at;
        }
    }
    if start < ident.len() {
        parts.push(&ident[start..]);
    }
    parts
}

/// Whether `current` begins a new subword, given its neighbours.
fn starts_subword(prev: char, current: char, next: Option<char>) -> bool {
    // lower → Upper: `discreteBelief`
    (prev.is_lowercase() && current.is_uppercase())
        // end of an acronym: the `M` in `KMarkov`
        || (prev.is_uppercase() && current.is_uppercase() && next.is_some_and(char::is_lowercase))
        || (prev.is_alphabetic() && current.is_numeric())
        || (prev.is_numeric() && current.is_alphabetic())
}

/// Lowercase and stem a token, skipping stop words.
fn index_token(token: &str, tokens: &mut Vec<String>, stemmer: &Stemmer) {
    if token.chars().count() < MIN_TOKEN_LENGTH {
        return;
    }
    let lowercase = token.to_lowercase();

    if STOP_WORDS.contains(&lowercase.as_str()) {
        return;
    }

    let stemmed = stemmer.stem(&lowercase);
    tokens.push(stemmed.into_owned());
}

/// Hashes a term for fast lookup (case-insensitive).
///
/// Seedless, so hashes are stable across processes and can be persisted in snapshots.
pub(crate) fn hash_term(term: &str) -> u64 {
    xxh3_64(term.to_lowercase().as_bytes())
}
