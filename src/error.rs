//! Error handling types and utilities.

use std::path::PathBuf;
use thiserror::Error;

/// A specialized Result type for application-level docsearch operations.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods in the CLI and configuration layers. Library
/// operations return the typed errors below.
pub type Result<T> = anyhow::Result<T>;

/// Errors raised by [`SearchIndex`](crate::search::SearchIndex) construction and lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A record lacks a required field or carries an invalid category.
    /// The whole build attempt is abandoned.
    #[error("malformed entry at position {position}: {reason}")]
    MalformedEntry { position: usize, reason: String },
    /// No entry has this exact location.
    #[error("no entry with location '{location}'")]
    NotFound { location: String },
}

impl IndexError {
    pub(crate) fn malformed(position: usize, reason: impl Into<String>) -> Self {
        Self::MalformedEntry {
            position,
            reason: reason.into(),
        }
    }
}

/// Errors raised while reading a generator's search index output.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read search index at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("search index at {} is not valid UTF-8", path.display())]
    Utf8 {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },
    #[error("search index is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The document parsed but is neither a record array nor an object with a `docs` array.
    #[error("unexpected search index shape: {0}")]
    Shape(String),
    #[error(transparent)]
    Malformed(#[from] IndexError),
}

/// Errors raised while reading or writing an index snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot I/O failed at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("snapshot encoding failed: {0}")]
    Encoding(#[from] postcard::Error),
    /// The snapshot was written by another format version, for other source
    /// bytes, or decodes to an index whose parts disagree.
    #[error("snapshot is stale ({0})")]
    Stale(&'static str),
}
