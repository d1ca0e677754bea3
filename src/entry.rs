//! Documentation entry records and their category tags.

use crate::error::IndexError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of a documentation entry.
///
/// The set is open: generators may emit tags this crate has never seen.
/// Those are kept verbatim in [`Category::Other`] and displayed unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    Page,
    Type,
    Method,
    Section,
    Other(String),
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Page => "page",
            Self::Type => "type",
            Self::Method => "method",
            Self::Section => "section",
            Self::Other(tag) => tag,
        }
    }
}

impl From<String> for Category {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "page" => Self::Page,
            "type" => Self::Type,
            "method" => Self::Method,
            "section" => Self::Section,
            _ => Self::Other(tag),
        }
    }
}

impl From<Category> for String {
    fn from(category: Category) -> Self {
        match category {
            Category::Other(tag) => tag,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s.to_string()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One searchable documentation record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Page path, optionally followed by `#` and an anchor.
    pub location: String,
    /// Title of the page this entry belongs to.
    pub page: String,
    pub title: String,
    pub category: Category,
    /// Rendered doc-string or section prose. May be empty.
    pub text: String,
}

impl Entry {
    /// The page path part of the location (everything before the first `#`).
    pub fn page_path(&self) -> &str {
        self.location
            .split_once('#')
            .map_or(self.location.as_str(), |(path, _)| path)
    }

    /// The in-page anchor, if the location names one.
    ///
    /// Page-level locations such as `discrete.html#` have an empty fragment
    /// and therefore no anchor.
    pub fn anchor(&self) -> Option<&str> {
        self.location
            .split_once('#')
            .map(|(_, anchor)| anchor)
            .filter(|anchor| !anchor.is_empty())
    }
}

/// A record as handed over by the loader, before validation.
///
/// Every field is optional here; [`RawEntry::validate`] turns it into an
/// [`Entry`] or reports which field is missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawEntry {
    pub location: Option<String>,
    pub page: Option<String>,
    pub title: Option<String>,
    pub category: Option<String>,
    pub text: Option<String>,
}

impl RawEntry {
    /// Validates the record found at `position` in the input sequence.
    pub fn validate(self, position: usize) -> Result<Entry, IndexError> {
        let missing = |field: &str| IndexError::malformed(position, format!("missing `{field}`"));

        let location = self.location.ok_or_else(|| missing("location"))?;
        let page = self.page.ok_or_else(|| missing("page"))?;
        let title = self.title.ok_or_else(|| missing("title"))?;
        let category = self.category.ok_or_else(|| missing("category"))?;
        let text = self.text.ok_or_else(|| missing("text"))?;

        if category.trim().is_empty() {
            return Err(IndexError::malformed(position, "empty `category`"));
        }

        Ok(Entry {
            location,
            page,
            title,
            category: Category::from(category),
            text,
        })
    }
}

impl From<Entry> for RawEntry {
    fn from(entry: Entry) -> Self {
        Self {
            location: Some(entry.location),
            page: Some(entry.page),
            title: Some(entry.title),
            category: Some(entry.category.into()),
            text: Some(entry.text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    fn raw(location: &str, category: Option<&str>) -> RawEntry {
        RawEntry {
            location: Some(location.to_string()),
            page: Some("Discrete".to_string()),
            title: Some("Discrete".to_string()),
            category: category.map(String::from),
            text: Some(String::new()),
        }
    }

    #[rstest]
    #[case("page", Category::Page)]
    #[case("type", Category::Type)]
    #[case("method", Category::Method)]
    #[case("section", Category::Section)]
    #[case("macro", Category::Other("macro".to_string()))]
    fn test_category_from_tag(#[case] tag: &str, #[case] expected: Category) {
        let category: Category = tag.parse().unwrap();
        check!(category == expected);
        check!(category.to_string() == tag);
    }

    #[test]
    fn test_unknown_category_round_trips_through_json() {
        let category: Category = serde_json::from_str("\"constant\"").unwrap();
        check!(category == Category::Other("constant".to_string()));
        check!(serde_json::to_string(&category).unwrap() == "\"constant\"");
    }

    #[rstest]
    #[case("discrete.html#", "discrete.html", None)]
    #[case(
        "discrete.html#BeliefUpdaters.DiscreteBelief",
        "discrete.html",
        Some("BeliefUpdaters.DiscreteBelief")
    )]
    #[case("index.html", "index.html", None)]
    #[case("a.html#b#c", "a.html", Some("b#c"))]
    fn test_location_parts(
        #[case] location: &str,
        #[case] page_path: &str,
        #[case] anchor: Option<&str>,
    ) {
        let entry = raw(location, Some("page")).validate(0).unwrap();
        check!(entry.page_path() == page_path);
        check!(entry.anchor() == anchor);
    }

    #[test]
    fn test_validate_reports_missing_category() {
        let_assert!(Err(IndexError::MalformedEntry { position, reason }) = raw("x#", None).validate(3));
        check!(position == 3);
        check!(reason.contains("category"));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn test_validate_rejects_empty_category(#[case] category: &str) {
        let result = raw("x#", Some(category)).validate(0);
        check!(matches!(result, Err(IndexError::MalformedEntry { .. })));
    }

    #[test]
    fn test_empty_text_is_valid() {
        let entry = raw("void.html#", Some("page")).validate(0).unwrap();
        check!(entry.text.is_empty());
    }
}
