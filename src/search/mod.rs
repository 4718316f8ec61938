//! Search functionality.
//!
//! Provides literal text search within documents with:
//! - Case-sensitive, non-overlapping matching, line by line
//! - A single cached result set, replaced by every search
//! - Wrapping navigation between matches

use serde::Serialize;

use crate::error::{EngineError, Result};

/// Longest context snippet attached to a hit, in characters.
pub const CONTEXT_CHARS: usize = 100;

/// One occurrence of the query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    /// One-based line number.
    pub line: usize,
    /// Zero-based character offset within the line.
    pub column: usize,
    /// Up to [`CONTEXT_CHARS`] characters of the line around the match.
    pub context: String,
}

#[derive(Debug, Clone, Default)]
enum ResultSet {
    #[default]
    Never,
    /// The text changed since the last search.
    Stale,
    Ready(Vec<SearchHit>),
}

/// Substring scanner holding the hits of the most recent search.
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    results: ResultSet,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find every occurrence of `query` in `text` and cache the hits.
    ///
    /// Returns the number of hits; zero means "not found".
    pub fn search(&mut self, text: &str, query: &str) -> usize {
        let hits = find_matches(text, query);
        let count = hits.len();
        tracing::debug!(count, query_len = query.len(), "search results replaced");
        self.results = ResultSet::Ready(hits);
        count
    }

    /// Hit at `index` from the latest search.
    ///
    /// `Ok(None)` for an out-of-range index or after the results went stale.
    ///
    /// # Errors
    /// Returns [`EngineError::NoSearch`] if no search has ever run.
    pub fn result_at(&self, index: usize) -> Result<Option<&SearchHit>> {
        match &self.results {
            ResultSet::Never => Err(EngineError::NoSearch),
            ResultSet::Stale => Ok(None),
            ResultSet::Ready(hits) => Ok(hits.get(index)),
        }
    }

    /// Drop the cached hits because the text they point into changed.
    pub fn invalidate(&mut self) {
        if matches!(self.results, ResultSet::Ready(_)) {
            self.results = ResultSet::Stale;
        }
    }

    /// Hits from the latest search, empty when stale or never run.
    pub fn hits(&self) -> &[SearchHit] {
        match &self.results {
            ResultSet::Ready(hits) => hits,
            ResultSet::Never | ResultSet::Stale => &[],
        }
    }

    pub fn len(&self) -> usize {
        self.hits().len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits().is_empty()
    }

    /// Index of the hit after `current`, wrapping to the first.
    pub fn next_index(&self, current: Option<usize>) -> Option<usize> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        Some(current.map_or(0, |idx| (idx + 1) % len))
    }

    /// Index of the hit before `current`, wrapping to the last.
    pub fn prev_index(&self, current: Option<usize>) -> Option<usize> {
        let len = self.len();
        if len == 0 {
            return None;
        }
        Some(match current {
            Some(idx) if idx > 0 && idx <= len => idx - 1,
            _ => len - 1,
        })
    }
}

/// All non-overlapping occurrences of `query`, scanning each line left to
/// right.
pub fn find_matches(text: &str, query: &str) -> Vec<SearchHit> {
    if query.is_empty() || query.contains('\n') {
        return Vec::new();
    }
    let query_chars = query.chars().count();
    let mut hits = Vec::new();

    for (line_idx, line) in text.lines().enumerate() {
        let mut scanned_bytes = 0;
        let mut scanned_chars = 0;
        for (byte_idx, _) in line.match_indices(query) {
            scanned_chars += line[scanned_bytes..byte_idx].chars().count();
            scanned_bytes = byte_idx;
            hits.push(SearchHit {
                line: line_idx + 1,
                column: scanned_chars,
                context: context_snippet(line, scanned_chars, query_chars),
            });
        }
    }
    hits
}

/// Window of the line centred on the match, or starting at it when the
/// match fills the window. Cut on character boundaries.
fn context_snippet(line: &str, column: usize, match_chars: usize) -> String {
    let lead = CONTEXT_CHARS.saturating_sub(match_chars) / 2;
    let start = column.saturating_sub(lead);
    line.chars().skip(start).take(CONTEXT_CHARS).collect()
}
