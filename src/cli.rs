//! Command-line interface.

use crate::config::Config;
use crate::error::Result;
use crate::format::{format_entry, format_hits, format_matches, format_pages, format_suggestions};
use crate::load::discover;
use crate::search::{Keywords, SearchIndex};
use crate::snapshot::load_or_build;
use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Number of suggestions shown when a lookup misses.
const SUGGESTION_LIMIT: usize = 5;

#[derive(Debug, Parser)]
#[command(name = "docsearch")]
#[command(about = "Search generated documentation indexes", long_about = None)]
pub struct Cli {
    /// A search_index.js file, or a documentation build directory containing one
    pub index: PathBuf,
    /// Config file (default: the platform config directory)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Always rebuild the index instead of reusing a snapshot
    #[arg(long, global = true)]
    pub no_snapshot: bool,
    /// Log more (-v: info, -vv: debug); DOCSEARCH_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Entries containing every keyword, ranked by match weight
    Query {
        #[arg(required = true)]
        keywords: Vec<String>,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// Show the entry at an exact location
    Lookup { location: String },
    /// Stemmed free-text search
    Search {
        #[arg(required = true)]
        text: Vec<String>,
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },
    /// List documentation pages
    Pages,
    /// Summarize the index
    Stats,
}

impl Cli {
    /// Log level selected by the `-v` count.
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        }
    }
}

/// Rendered command output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub text: String,
    /// False when the command found nothing it was asked for
    pub success: bool,
}

impl Output {
    fn ok(text: String) -> Self {
        Self {
            text,
            success: true,
        }
    }
}

/// Load the index named on the command line and run the command against it.
pub fn run(cli: &Cli) -> Result<Output> {
    let config = Config::load(cli.config.as_deref())?;
    let source = resolve_source(&cli.index)?;
    let cache_dir = if cli.no_snapshot {
        None
    } else {
        config.snapshot_dir()
    };

    let index = load_or_build(&source, cache_dir.as_deref(), config.index_options())
        .with_context(|| format!("Failed to load search index {}", source.display()))?;

    Ok(execute(&index, &cli.command, &config))
}

/// Run one command against a built index.
pub fn execute(index: &SearchIndex, command: &Commands, config: &Config) -> Output {
    match command {
        Commands::Query { keywords, limit } => {
            let keywords = Keywords::new(keywords);
            let mut matches = index.query_scored(&keywords);
            matches.truncate(limit.unwrap_or(config.limit));
            Output {
                success: !matches.is_empty(),
                text: format_matches(&matches, &keywords.to_string()),
            }
        }
        Commands::Lookup { location } => match index.lookup(location) {
            Some(entry) => Output::ok(format_entry(entry)),
            None => Output {
                text: format_suggestions(location, &index.suggest(location, SUGGESTION_LIMIT)),
                success: false,
            },
        },
        Commands::Search { text, limit } => {
            let text = text.join(" ");
            let hits = index.search(&text, limit.unwrap_or(config.limit));
            Output {
                success: !hits.is_empty(),
                text: format_hits(&hits, &text),
            }
        }
        Commands::Pages => Output::ok(format_pages(index.pages())),
        Commands::Stats => Output::ok(format_stats(index)),
    }
}

fn format_stats(index: &SearchIndex) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "entries: {}", index.len());
    let _ = writeln!(output, "locations: {}", index.locations().count());
    let _ = writeln!(output, "pages: {}", index.pages().len());
    let _ = writeln!(output, "terms: {}", index.term_index().term_count());
    for (category, count) in index.category_counts() {
        let _ = writeln!(output, "  {}: {}", category, count);
    }
    output
}

/// Resolve the index argument to a single search index file.
pub fn resolve_source(path: &Path) -> Result<PathBuf> {
    if !path.is_dir() {
        return Ok(path.to_path_buf());
    }

    let mut found = discover(path);
    match found.len() {
        0 => bail!("No search index found under {}", path.display()),
        1 => Ok(found.remove(0)),
        n => {
            let listing: Vec<String> = found.iter().map(|p| p.display().to_string()).collect();
            bail!(
                "Found {} search indexes under {}; pass one of:\n{}",
                n,
                path.display(),
                listing.join("\n")
            )
        }
    }
}
