//! On-disk snapshots of built search indexes.
//!
//! A snapshot is keyed by the source file path and validated against an
//! xxh3 digest of the source bytes, so an edited or regenerated index is
//! never served from a stale snapshot.

use crate::error::{LoadError, SnapshotError};
use crate::load::{parse_source, read_source};
use crate::search::{IndexOptions, SearchIndex};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use xxhash_rust::xxh3::xxh3_64;

/// Bumped whenever the persisted layout of [`SearchIndex`] changes.
const SNAPSHOT_VERSION: u32 = 2;

#[derive(Serialize)]
struct SnapshotRef<'a> {
    version: u32,
    digest: u64,
    index: &'a SearchIndex,
}

#[derive(Deserialize)]
struct Snapshot {
    version: u32,
    digest: u64,
    index: SearchIndex,
}

/// Digest of a search index source, used to detect changes.
pub fn source_digest(bytes: &[u8]) -> u64 {
    xxh3_64(bytes)
}

/// Snapshot file for `source` inside `cache_dir`.
pub fn snapshot_path(cache_dir: &Path, source: &Path) -> PathBuf {
    let canonical = source
        .canonicalize()
        .unwrap_or_else(|_| source.to_path_buf());
    let key = xxh3_64(canonical.to_string_lossy().as_bytes());
    cache_dir.join(format!("{:016x}.index", key))
}

/// Read a snapshot, accepting it only for the same source digest and weights.
pub fn read(
    path: &Path,
    digest: u64,
    options: IndexOptions,
) -> Result<SearchIndex, SnapshotError> {
    let bytes = std::fs::read(path).map_err(|source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let snapshot: Snapshot = postcard::from_bytes(&bytes)?;

    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SnapshotError::Stale("format version changed"));
    }
    if snapshot.digest != digest {
        return Err(SnapshotError::Stale("source changed"));
    }
    if snapshot.index.options() != options {
        return Err(SnapshotError::Stale("ranking weights changed"));
    }
    if !snapshot.index.is_consistent() {
        return Err(SnapshotError::Stale("inconsistent index contents"));
    }
    Ok(snapshot.index)
}

/// Write a snapshot, replacing any previous one atomically.
pub fn write(path: &Path, digest: u64, index: &SearchIndex) -> Result<(), SnapshotError> {
    let io_err = |source| SnapshotError::Io {
        path: path.to_path_buf(),
        source,
    };

    let bytes = postcard::to_stdvec(&SnapshotRef {
        version: SNAPSHOT_VERSION,
        digest,
        index,
    })?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let tmp = path.with_extension("index.tmp");
    std::fs::write(&tmp, bytes).map_err(io_err)?;
    std::fs::rename(&tmp, path).map_err(io_err)?;
    Ok(())
}

/// Load the index at `source`, reusing a snapshot from `cache_dir` when it is current.
///
/// Without a `cache_dir` the source is always parsed and built. Snapshot
/// problems are logged and never fail the load.
pub fn load_or_build(
    source: &Path,
    cache_dir: Option<&Path>,
    options: IndexOptions,
) -> Result<SearchIndex, LoadError> {
    let bytes = read_source(source)?;
    let digest = source_digest(&bytes);
    let snapshot = cache_dir.map(|dir| snapshot_path(dir, source));

    if let Some(path) = &snapshot
        && path.exists()
    {
        match read(path, digest, options) {
            Ok(index) => {
                tracing::debug!(
                    "Using snapshot {} for {} ({} entries)",
                    path.display(),
                    source.display(),
                    index.len()
                );
                return Ok(index);
            }
            Err(e) => tracing::info!("Rebuilding index for {}: {}", source.display(), e),
        }
    }

    let records = parse_source(source, bytes)?;
    let index = SearchIndex::build_with(records, options)?;

    if let Some(path) = &snapshot {
        match write(path, digest, &index) {
            Ok(()) => tracing::debug!("Stored snapshot at {}", path.display()),
            Err(e) => tracing::warn!("Failed to store snapshot at {}: {}", path.display(), e),
        }
    }

    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::load::parse_search_index;
    use assert2::{check, let_assert};
    use tempfile::TempDir;

    const SOURCE: &str = r#"var documenterSearchIndex = {"docs": [
{"location": "void.html#", "page": "Nothing", "title": "Nothing", "category": "page", "text": ""},
{"location": "void.html#BeliefUpdaters.NothingUpdater", "page": "Nothing", "title": "BeliefUpdaters.NothingUpdater", "category": "type", "text": "update always returns nothing."},
]}"#;

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snap.index");
        let index = SearchIndex::build(parse_search_index(SOURCE).unwrap()).unwrap();

        write(&path, 42, &index).unwrap();
        let restored = read(&path, 42, IndexOptions::default()).unwrap();

        check!(restored.entries() == index.entries());
        check!(restored.query(["nothing"]).len() == 2);
        check!(restored.search("returns", 5).len() == 1);
    }

    #[test]
    fn test_read_rejects_other_digest_and_weights() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("snap.index");
        let index = SearchIndex::build(parse_search_index(SOURCE).unwrap()).unwrap();
        write(&path, 1, &index).unwrap();

        let_assert!(Err(SnapshotError::Stale(_)) = read(&path, 2, IndexOptions::default()));

        let other = IndexOptions {
            title_weight: 10,
            text_weight: 1,
        };
        let_assert!(Err(SnapshotError::Stale(_)) = read(&path, 1, other));
    }

    #[test]
    fn test_snapshot_path_is_stable() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("search_index.js");
        check!(snapshot_path(dir.path(), &source) == snapshot_path(dir.path(), &source));
        check!(snapshot_path(dir.path(), &source).extension().unwrap() == "index");
    }
}
