//! User configuration loaded from TOML.

use crate::error::Result;
use crate::search::IndexOptions;
use crate::search::scoring::{DEFAULT_TEXT_WEIGHT, DEFAULT_TITLE_WEIGHT};
use anyhow::{Context, ensure};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Directory name used under the platform config and cache directories.
const APP_DIR: &str = "docsearch";

/// Default number of results printed per query.
const DEFAULT_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Weight of a keyword occurrence in an entry title
    pub title_weight: u32,
    /// Weight of a keyword occurrence in an entry text
    pub text_weight: u32,
    /// Maximum number of results to print
    pub limit: usize,
    /// Reuse built indexes across runs
    pub snapshots: bool,
    /// Where snapshots live; defaults to the platform cache directory
    pub cache_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            title_weight: DEFAULT_TITLE_WEIGHT,
            text_weight: DEFAULT_TEXT_WEIGHT,
            limit: DEFAULT_LIMIT,
            snapshots: true,
            cache_dir: None,
        }
    }
}

impl Config {
    /// Default config file location, e.g. `~/.config/docsearch/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the default location is
    /// tried and a missing file yields [`Config::default`].
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config at {}", path.display()))?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse config")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        ensure!(self.title_weight > 0, "title_weight must be greater than zero");
        ensure!(self.text_weight > 0, "text_weight must be greater than zero");
        ensure!(self.limit > 0, "limit must be greater than zero");
        Ok(())
    }

    pub fn index_options(&self) -> IndexOptions {
        IndexOptions {
            title_weight: self.title_weight,
            text_weight: self.text_weight,
        }
    }

    /// Snapshot directory, or `None` when snapshots are disabled or no cache directory exists.
    pub fn snapshot_dir(&self) -> Option<PathBuf> {
        if !self.snapshots {
            return None;
        }
        self.cache_dir
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join(APP_DIR)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::parse("").unwrap();
        check!(config == Config::default());
        check!(config.index_options() == IndexOptions::default());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse("title_weight = 10\ncache_dir = \"/tmp/docsearch\"").unwrap();
        check!(config.title_weight == 10);
        check!(config.text_weight == DEFAULT_TEXT_WEIGHT);
        check!(config.snapshot_dir() == Some(PathBuf::from("/tmp/docsearch")));
    }

    #[test]
    fn test_snapshots_disabled() {
        let config = Config::parse("snapshots = false").unwrap();
        check!(config.snapshot_dir().is_none());
    }

    #[rstest]
    #[case("title_weight = 0")]
    #[case("text_weight = 0")]
    #[case("limit = 0")]
    #[case("unknown = 1")]
    #[case("title_weight = \"high\"")]
    fn test_invalid_config(#[case] content: &str) {
        check!(Config::parse(content).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::TempDir::new().unwrap();
        check!(Config::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
