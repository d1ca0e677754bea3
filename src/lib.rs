//! Search over documentation indexes produced by static documentation generators.
//!
//! Records are loaded with [`load`], validated into an immutable
//! [`SearchIndex`], and queried by keywords, exact location, or free text.

pub mod cli;
pub mod config;
pub mod entry;
pub mod error;
pub mod format;
pub mod load;
pub mod search;
pub mod snapshot;
pub mod tracing;

pub use config::Config;
pub use entry::{Category, Entry, RawEntry};
pub use error::{IndexError, LoadError, SnapshotError};
pub use search::{IndexOptions, Keywords, Match, SearchIndex};
