//! Keyword normalization for substring queries.

use std::fmt;

/// An ordered list of normalized query keywords.
///
/// Normalization trims surrounding whitespace, case-folds, and drops
/// keywords that end up empty. Order is preserved; duplicates are kept so
/// that a repeated keyword counts twice toward the match weight.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keywords(Vec<String>);

impl Keywords {
    /// Normalize an already split sequence of keywords.
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            keywords
                .into_iter()
                .map(|keyword| keyword.as_ref().trim().to_lowercase())
                .filter(|keyword| !keyword.is_empty())
                .collect(),
        )
    }

    /// Split a free-form query string on whitespace.
    ///
    /// Examples:
    /// - `"Discrete  belief"` → `["discrete", "belief"]`
    /// - `"   "` → `[]`
    pub fn parse(query: &str) -> Self {
        Self::new(query.split_whitespace())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// A copy of these keywords with one more appended.
    pub fn with(&self, keyword: &str) -> Self {
        let mut keywords = self.0.clone();
        keywords.extend(Self::new([keyword]).0);
        Self(keywords)
    }
}

impl fmt::Display for Keywords {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl<S: AsRef<str>> FromIterator<S> for Keywords {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter)
    }
}
