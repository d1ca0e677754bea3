//! Reading documentation generator output into raw records.
//!
//! Generators ship the index as a script (`var documenterSearchIndex = {"docs": [...]}`)
//! so a static page can load it with a `<script>` tag. The script body is
//! JSON apart from the assignment prefix and the trailing commas the
//! generator leaves after the last record.

use crate::entry::RawEntry;
use crate::error::{IndexError, LoadError};
use ignore::WalkBuilder;
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// File name documentation generators use for the search index script.
pub const SEARCH_INDEX_FILE: &str = "search_index.js";

static ASSIGNMENT_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:var|let|const)\s+[A-Za-z_$][\w$]*\s*=\s*").expect("valid regex")
});

/// Parse the contents of a search index script or JSON document.
///
/// Accepted shapes:
/// - `var name = {"docs": [...]};`
/// - `{"docs": [...]}`
/// - `[...]`
pub fn parse_search_index(text: &str) -> Result<Vec<RawEntry>, LoadError> {
    let body = strip_assignment(text);
    let body = strip_trailing_commas(body);
    let document: Value = serde_json::from_str(&body)?;

    let records = match document {
        Value::Array(records) => records,
        Value::Object(mut object) => match object.remove("docs") {
            Some(Value::Array(records)) => records,
            Some(_) => return Err(LoadError::Shape("`docs` is not an array".to_string())),
            None => return Err(LoadError::Shape("missing `docs` array".to_string())),
        },
        _ => {
            return Err(LoadError::Shape(
                "expected an array of records or an object with `docs`".to_string(),
            ));
        }
    };

    records
        .into_iter()
        .enumerate()
        .map(|(position, record)| raw_entry(position, record))
        .collect()
}

/// Read and parse a search index file.
pub fn load_file(path: &Path) -> Result<Vec<RawEntry>, LoadError> {
    parse_source(path, read_source(path)?)
}

/// Read the raw bytes of a search index file.
pub fn read_source(path: &Path) -> Result<Vec<u8>, LoadError> {
    std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Decode and parse the bytes read from the search index file at `path`.
pub fn parse_source(path: &Path, bytes: Vec<u8>) -> Result<Vec<RawEntry>, LoadError> {
    let text = String::from_utf8(bytes).map_err(|source| LoadError::Utf8 {
        path: path.to_path_buf(),
        source,
    })?;
    let records = parse_search_index(&text)?;
    tracing::info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Find every search index script under a documentation build directory.
///
/// Hidden and ignored paths are skipped. Results are sorted for stable output.
pub fn discover(root: &Path) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkBuilder::new(root)
        .build()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_some_and(|t| t.is_file()))
        .filter(|e| e.file_name() == SEARCH_INDEX_FILE)
        .map(ignore::DirEntry::into_path)
        .collect();

    found.sort();
    tracing::debug!("Discovered {} search index files under {}", found.len(), root.display());
    found
}

fn raw_entry(position: usize, record: Value) -> Result<RawEntry, LoadError> {
    if !record.is_object() {
        return Err(IndexError::malformed(position, "record is not an object").into());
    }
    serde_json::from_value(record)
        .map_err(|e| IndexError::malformed(position, e.to_string()).into())
}

/// Remove a leading `var name =` and a trailing `;`.
fn strip_assignment(text: &str) -> &str {
    let body = match ASSIGNMENT_PREFIX.find(text) {
        Some(prefix) => &text[prefix.end()..],
        None => text,
    };
    body.trim_end().trim_end_matches(';')
}

/// Remove commas that directly precede `]` or `}` (ignoring whitespace),
/// leaving string literals untouched.
fn strip_trailing_commas(text: &str) -> Cow<'_, str> {
    if !text.contains(',') {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut pending_comma: Option<usize> = None; // Index in `out` of a comma not yet confirmed

    for c in text.chars() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        match c {
            '"' => {
                pending_comma = None;
                in_string = true;
                out.push(c);
            }
            ',' => {
                pending_comma = Some(out.len());
                out.push(c);
            }
            ']' | '}' => {
                if let Some(at) = pending_comma.take() {
                    out.remove(at);
                }
                out.push(c);
            }
            c if c.is_whitespace() => out.push(c),
            _ => {
                pending_comma = None;
                out.push(c);
            }
        }
    }

    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use rstest::rstest;

    #[rstest]
    #[case("var documenterSearchIndex = {\"docs\": []};", "{\"docs\": []}")]
    #[case("  const idx={\"docs\": []}\n", "{\"docs\": []}")]
    #[case("[]", "[]")]
    fn test_strip_assignment(#[case] input: &str, #[case] expected: &str) {
        check!(strip_assignment(input) == expected);
    }

    #[rstest]
    #[case("[1, 2, ]", "[1, 2 ]")]
    #[case("{\"a\": 1,\n}", "{\"a\": 1\n}")]
    #[case("[\"a, ]\", 1]", "[\"a, ]\", 1]")]
    #[case("[\"quote \\\", ]\",]", "[\"quote \\\", ]\"]")]
    #[case("[1, 2]", "[1, 2]")]
    fn test_strip_trailing_commas(#[case] input: &str, #[case] expected: &str) {
        check!(strip_trailing_commas(input) == expected);
    }

    #[test]
    fn test_parse_documenter_script() {
        let script = r#"var documenterSearchIndex = {"docs": [

{
    "location": "void.html#",
    "page": "Nothing",
    "title": "Nothing",
    "category": "page",
    "text": ""
},

]}
"#;
        let records = parse_search_index(script).unwrap();
        check!(records.len() == 1);
        check!(records[0].location.as_deref() == Some("void.html#"));
    }

    #[test]
    fn test_parse_bare_array_keeps_missing_fields() {
        let records = parse_search_index(r#"[{"location": "a.html#", "extra": 1}]"#).unwrap();
        check!(records[0].location.as_deref() == Some("a.html#"));
        check!(records[0].category.is_none());
    }

    #[rstest]
    #[case(r#"[1]"#)]
    #[case(r#"[{"location": 5}]"#)]
    fn test_parse_rejects_bad_records(#[case] input: &str) {
        let_assert!(Err(LoadError::Malformed(IndexError::MalformedEntry { position, .. })) =
            parse_search_index(input));
        check!(position == 0);
    }

    #[rstest]
    #[case(r#"{"pages": []}"#)]
    #[case(r#"{"docs": {}}"#)]
    #[case(r#""docs""#)]
    fn test_parse_rejects_bad_shape(#[case] input: &str) {
        check!(matches!(parse_search_index(input), Err(LoadError::Shape(_))));
    }

    #[test]
    fn test_parse_source_rejects_invalid_utf8() {
        let path = Path::new("docs/search_index.js");
        let bytes = b"[{\"location\": \"a\xff\"}]".to_vec();
        let_assert!(Err(LoadError::Utf8 { path: reported, .. }) = parse_source(path, bytes));
        check!(reported == path);
    }

    #[test]
    fn test_parse_rejects_invalid_json() {
        check!(matches!(parse_search_index("var x = {"), Err(LoadError::Json(_))));
    }
}
