//! Keyword and full-text search over documentation entries.
//!
//! This module provides the immutable [`SearchIndex`] with substring keyword
//! queries, exact location lookups, and a TF-IDF term index for free-text
//! search, along with tokenization and scoring.

pub mod index;
pub mod query;
pub mod scoring;
pub(crate) mod tokenize;

pub use index::{Match, Page, SearchHit, SearchIndex, Suggestion, TermIndex};
pub use query::Keywords;
pub use scoring::IndexOptions;
