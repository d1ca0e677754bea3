//! Plain-text rendering of search results.

use crate::entry::Entry;
use crate::search::scoring::relative_relevance;
use crate::search::{Match, Page, SearchHit, Suggestion};
use std::fmt::Write as _;

/// First non-empty line of an entry's text, trimmed.
pub fn summary_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).find(|line| !line.is_empty())
}

fn write_result(output: &mut String, rank: usize, entry: &Entry, relevance: u8) {
    let _ = writeln!(
        output,
        "{}. `{}` ({}) - relevance: {}%",
        rank, entry.title, entry.category, relevance
    );
    let _ = writeln!(output, "   {}", entry.location);
    if let Some(line) = summary_line(&entry.text) {
        let _ = writeln!(output, "   {}", line);
    }
    output.push('\n');
}

/// Render keyword query matches.
pub fn format_matches(matches: &[Match<'_>], query: &str) -> String {
    if matches.is_empty() {
        return format!(
            "No results found for '{}'.\n\n\
             Search tips:\n\
             • Every keyword must appear in the title or text\n\
             • Try fewer or shorter keywords\n\
             • Use `search` for stemmed free-text matching\n",
            query
        );
    }

    let mut output = format!("Results for '{}':\n\n", query);
    let best = f64::from(matches[0].weight);
    for (idx, m) in matches.iter().enumerate() {
        let relevance = relative_relevance(f64::from(m.weight), best);
        write_result(&mut output, idx + 1, m.entry, relevance);
    }
    output
}

/// Render free-text search hits.
pub fn format_hits(hits: &[SearchHit<'_>], query: &str) -> String {
    if hits.is_empty() {
        return format!(
            "No results found for '{}'.\n\n\
             Search tips:\n\
             • Search uses stemming: 'updaters' matches 'updater'\n\
             • CamelCase names are split: 'DiscreteBelief' matches 'belief'\n",
            query
        );
    }

    let mut output = format!("Search results for '{}':\n\n", query);
    let best = f64::from(hits[0].score);
    for (idx, hit) in hits.iter().enumerate() {
        let relevance = relative_relevance(f64::from(hit.score), best);
        write_result(&mut output, idx + 1, hit.entry, relevance);
    }
    output
}

/// Render a single entry in full.
pub fn format_entry(entry: &Entry) -> String {
    let mut output = format!("{} ({})\n", entry.title, entry.category);
    let _ = writeln!(output, "page: {}", entry.page);
    let _ = writeln!(output, "location: {}", entry.location);
    let text = entry.text.trim_end();
    if !text.is_empty() {
        let _ = write!(output, "\n{}\n", text);
    }
    output
}

/// Render "did you mean" suggestions for a missed lookup.
pub fn format_suggestions(location: &str, suggestions: &[Suggestion<'_>]) -> String {
    let mut output = format!("No entry with location '{}'.", location);
    if suggestions.is_empty() {
        output.push('\n');
        return output;
    }
    output.push_str(" Did you mean one of these?\n\n");
    for suggestion in suggestions {
        let _ = writeln!(
            output,
            "• `{}` ({})",
            suggestion.entry.location, suggestion.entry.category
        );
    }
    output
}

/// Render the page list.
pub fn format_pages(pages: &[Page]) -> String {
    let mut output = String::new();
    for page in pages {
        let _ = writeln!(
            output,
            "{} - {} ({} entries)",
            page.path,
            page.title,
            page.entry_count()
        );
    }
    output
}
