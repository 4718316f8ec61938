use std::collections::HashMap;

use serde::Serialize;

use crate::error::{EngineError, Result};

/// A distinct token and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrequencyEntry {
    pub word: String,
    pub count: usize,
}

/// Ranked token counts from the most recent [`analyze`](Self::analyze).
///
/// Each call replaces the previous ranking wholesale. Every distinct token
/// is kept, even when the caller only displays the top few.
#[derive(Debug, Clone, Default)]
pub struct FrequencyAnalyzer {
    ranking: Option<Vec<FrequencyEntry>>,
}

impl FrequencyAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count case-folded tokens in `text`; returns the number of distinct
    /// tokens.
    pub fn analyze(&mut self, text: &str) -> usize {
        let mut counts: HashMap<String, usize> = HashMap::new();
        for (_, token) in super::tokens(text) {
            *counts.entry(token.to_lowercase()).or_insert(0) += 1;
        }

        let mut ranking: Vec<FrequencyEntry> = counts
            .into_iter()
            .map(|(word, count)| FrequencyEntry { word, count })
            .collect();
        ranking.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.word.cmp(&b.word)));

        let distinct = ranking.len();
        tracing::debug!(distinct, "word frequency ranking replaced");
        self.ranking = Some(ranking);
        distinct
    }

    /// Entry at `index` in the latest ranking.
    ///
    /// # Errors
    /// Returns [`EngineError::NoAnalysis`] if `analyze` was never called.
    pub fn entry_at(&self, index: usize) -> Result<Option<&FrequencyEntry>> {
        self.ranking
            .as_ref()
            .map(|ranking| ranking.get(index))
            .ok_or(EngineError::NoAnalysis)
    }

    /// The first `limit` entries of the latest ranking.
    pub fn top(&self, limit: usize) -> &[FrequencyEntry] {
        match self.ranking.as_deref() {
            Some(ranking) => &ranking[..limit.min(ranking.len())],
            None => &[],
        }
    }

    /// Number of distinct tokens in the latest ranking.
    pub fn len(&self) -> usize {
        self.ranking.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str, count: usize) -> FrequencyEntry {
        FrequencyEntry {
            word: word.to_string(),
            count,
        }
    }

    #[test]
    fn test_analyze_ranks_by_count_then_alphabet() {
        let mut analyzer = FrequencyAnalyzer::new();
        let distinct = analyzer.analyze("the cat sat on the mat the cat ran");
        assert_eq!(distinct, 6);
        assert_eq!(
            analyzer.top(10),
            &[
                entry("the", 3),
                entry("cat", 2),
                entry("mat", 1),
                entry("on", 1),
                entry("ran", 1),
                entry("sat", 1),
            ]
        );
    }

    #[test]
    fn test_analyze_folds_case() {
        let mut analyzer = FrequencyAnalyzer::new();
        analyzer.analyze("Rust rust RUST");
        assert_eq!(analyzer.entry_at(0).unwrap(), Some(&entry("rust", 3)));
    }

    #[test]
    fn test_entry_at_before_analysis_is_usage_error() {
        let analyzer = FrequencyAnalyzer::new();
        assert!(matches!(analyzer.entry_at(0), Err(EngineError::NoAnalysis)));
        assert!(analyzer.top(5).is_empty());
    }

    #[test]
    fn test_entry_at_out_of_range() {
        let mut analyzer = FrequencyAnalyzer::new();
        analyzer.analyze("one two");
        assert_eq!(analyzer.entry_at(2).unwrap(), None);
    }

    #[test]
    fn test_top_caps_display_but_keeps_all() {
        let mut analyzer = FrequencyAnalyzer::new();
        let distinct = analyzer.analyze("a b c d e f g");
        assert_eq!(distinct, 7);
        assert_eq!(analyzer.top(3).len(), 3);
        assert_eq!(analyzer.len(), 7);
        assert_eq!(analyzer.entry_at(6).unwrap(), Some(&entry("g", 1)));
    }

    #[test]
    fn test_new_analysis_replaces_previous() {
        let mut analyzer = FrequencyAnalyzer::new();
        analyzer.analyze("alpha beta gamma");
        let distinct = analyzer.analyze("");
        assert_eq!(distinct, 0);
        assert_eq!(analyzer.entry_at(0).unwrap(), None);
    }
}
