//! Shared test fixtures and utilities for integration tests.
//!
//! # Available Fixtures
//!
//! - `belief_index`: the BeliefUpdaters documentation index, built with default weights
//! - `belief_records`: the raw records of that index, in generator order
//!
//! [`TempWorkspace`] provides a temp directory for tests that need real
//! files (loading, discovery, snapshots).

use docsearch::{RawEntry, SearchIndex, load::parse_search_index};
use rstest::fixture;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Returns the bundled documentation index script.
#[allow(dead_code)] // Used across different integration test crates
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/latest/search_index.js")
}

/// Shorthand for a complete raw record.
#[allow(dead_code)]
pub fn record(location: &str, page: &str, title: &str, category: &str, text: &str) -> RawEntry {
    RawEntry {
        location: Some(location.to_string()),
        page: Some(page.to_string()),
        title: Some(title.to_string()),
        category: Some(category.to_string()),
        text: Some(text.to_string()),
    }
}

#[fixture]
pub fn belief_records() -> Vec<RawEntry> {
    let script = std::fs::read_to_string(fixture_path()).expect("Failed to read fixture index");
    parse_search_index(&script).expect("Fixture index should parse")
}

#[fixture]
pub fn belief_index(belief_records: Vec<RawEntry>) -> SearchIndex {
    SearchIndex::build(belief_records).expect("Fixture index should build")
}

/// A temporary workspace directory for test isolation.
///
/// Automatically cleaned up when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    /// Creates a new empty temporary workspace.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    /// Returns the root path of this workspace.
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content within this workspace.
    ///
    /// Parent directories are created automatically if they don't exist.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
        full_path
    }

    /// Copies the bundled BeliefUpdaters index into this workspace.
    pub fn copy_fixture(&self, dest_relative: &str) -> PathBuf {
        let content =
            std::fs::read_to_string(fixture_path()).expect("Failed to read fixture index");
        self.create_file(dest_relative, &content)
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}
