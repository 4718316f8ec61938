//! Per-document facade over the text engine.
//!
//! An [`Engine`] bundles one document's history, search cache and frequency
//! ranking with a shared [`Lexicon`]. Text always comes in from the caller;
//! the engine never holds the live buffer.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::analysis::{FrequencyAnalyzer, FrequencyEntry, TextStats};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::history::{History, Snapshot};
use crate::lexicon::Lexicon;
use crate::search::{SearchEngine, SearchHit};
use crate::transform::{self, CaseMode};

/// Text produced by a whole-document rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Rewrite {
    pub text: String,
    /// Set when `text` was cut to fit the output limit.
    pub truncated: bool,
}

impl Rewrite {
    /// Wrap `text`, cutting it to `max_bytes` if needed.
    pub fn fit(text: String, max_bytes: Option<usize>) -> Self {
        match max_bytes {
            Some(limit) if text.len() > limit => {
                let kept = fit_to_capacity(&text, limit);
                tracing::warn!(
                    full_bytes = text.len(),
                    kept_bytes = kept.len(),
                    limit,
                    "rewrite truncated at line boundary"
                );
                Self {
                    text: kept.to_string(),
                    truncated: true,
                }
            }
            _ => Self {
                text,
                truncated: false,
            },
        }
    }
}

/// Longest prefix of `text` that ends on a line boundary and fits in
/// `max_bytes`. Empty when even the first line is too long.
pub fn fit_to_capacity(text: &str, max_bytes: usize) -> &str {
    if text.len() <= max_bytes {
        return text;
    }
    text.as_bytes()[..max_bytes]
        .iter()
        .rposition(|&b| b == b'\n')
        .map_or("", |end| &text[..=end])
}

/// Engine state for a single open document.
#[derive(Debug)]
pub struct Engine {
    lexicon: Arc<Lexicon>,
    history: History,
    search: SearchEngine,
    frequency: FrequencyAnalyzer,
    config: EngineConfig,
}

impl Engine {
    /// Load the configured lexicon (or the built-in word list) and build an
    /// engine around it.
    ///
    /// # Errors
    /// Returns an error if the lexicon file cannot be read or holds no words.
    pub fn initialize(config: EngineConfig) -> Result<Self> {
        let _scope = crate::perf::scope("engine.initialize");
        let lexicon = match &config.lexicon_path {
            Some(path) => Lexicon::load(path)?,
            None => Lexicon::builtin(),
        };
        Ok(Self::with_lexicon(Arc::new(lexicon), config))
    }

    pub fn with_lexicon(lexicon: Arc<Lexicon>, config: EngineConfig) -> Self {
        Self {
            lexicon,
            history: History::new(config.history_depth),
            search: SearchEngine::new(),
            frequency: FrequencyAnalyzer::new(),
            config,
        }
    }

    /// A fresh engine for another document, sharing this one's lexicon.
    pub fn for_new_document(&self) -> Self {
        Self::with_lexicon(Arc::clone(&self.lexicon), self.config.clone())
    }

    pub fn lexicon(&self) -> &Arc<Lexicon> {
        &self.lexicon
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub const fn history(&self) -> &History {
        &self.history
    }

    // --- History ---

    /// Record a settled edit.
    pub fn checkpoint(&mut self, text: &str) {
        let changed = self.history.current().is_none_or(|current| current != text);
        self.history.checkpoint(text);
        if changed {
            self.search.invalidate();
        }
    }

    pub fn undo(&mut self, current_text: &str) -> Option<Snapshot> {
        let snapshot = self.history.undo(current_text)?;
        self.search.invalidate();
        Some(snapshot)
    }

    pub fn redo(&mut self, current_text: &str) -> Option<Snapshot> {
        let snapshot = self.history.redo(current_text)?;
        self.search.invalidate();
        Some(snapshot)
    }

    pub fn mark_clean(&mut self) {
        self.history.mark_clean();
    }

    pub fn is_dirty(&self) -> bool {
        self.history.is_dirty()
    }

    // --- Lexicon ---

    pub fn complete(&self, prefix: &str) -> Vec<String> {
        self.lexicon.complete(prefix)
    }

    pub fn suggest(&self, word: &str) -> Vec<String> {
        self.lexicon.suggest(word)
    }

    pub fn best_correction(&self, word: &str) -> Option<String> {
        self.lexicon.best_correction(word)
    }

    /// Correct every misspelled word; also returns the replacement count.
    pub fn correct_document(&self, text: &str) -> (Rewrite, usize) {
        let (corrected, replaced) = self.lexicon.correct_document(text);
        (self.rewrite(corrected), replaced)
    }

    // --- Search ---

    pub fn search(&mut self, text: &str, query: &str) -> usize {
        let _scope = crate::perf::scope("engine.search");
        self.search.search(text, query)
    }

    /// # Errors
    /// Returns [`EngineError::NoSearch`](crate::error::EngineError::NoSearch)
    /// if no search has run yet.
    pub fn result_at(&self, index: usize) -> Result<Option<&SearchHit>> {
        self.search.result_at(index)
    }

    pub fn next_result(&self, current: Option<usize>) -> Option<usize> {
        self.search.next_index(current)
    }

    pub fn prev_result(&self, current: Option<usize>) -> Option<usize> {
        self.search.prev_index(current)
    }

    // --- Analysis ---

    pub fn analyze(&mut self, text: &str) -> usize {
        let _scope = crate::perf::scope("engine.analyze");
        self.frequency.analyze(text)
    }

    /// # Errors
    /// Returns [`EngineError::NoAnalysis`](crate::error::EngineError::NoAnalysis)
    /// if `analyze` was never called.
    pub fn entry_at(&self, index: usize) -> Result<Option<&FrequencyEntry>> {
        self.frequency.entry_at(index)
    }

    /// The ranking cut to the configured display limit.
    pub fn top_words(&self) -> &[FrequencyEntry] {
        self.frequency.top(self.config.display_limit)
    }

    pub fn stats(&self, text: &str) -> TextStats {
        TextStats::of(text)
    }

    // --- Transforms ---

    pub fn duplicate_line(&self, text: &str, line: usize) -> Rewrite {
        self.rewrite(transform::duplicate_line(text, line))
    }

    pub fn move_line_up(&self, text: &str, line: usize) -> Rewrite {
        self.rewrite(transform::move_line_up(text, line))
    }

    pub fn move_line_down(&self, text: &str, line: usize) -> Rewrite {
        self.rewrite(transform::move_line_down(text, line))
    }

    pub fn toggle_comment(&self, text: &str, line: usize) -> Rewrite {
        self.rewrite(transform::toggle_comment(
            text,
            line,
            &self.config.comment_marker,
        ))
    }

    pub fn trim_trailing_whitespace(&self, text: &str) -> Rewrite {
        self.rewrite(transform::trim_trailing_whitespace(text))
    }

    pub fn remove_empty_lines(&self, text: &str) -> Rewrite {
        self.rewrite(transform::remove_empty_lines(text))
    }

    pub fn sort_lines(&self, text: &str) -> Rewrite {
        self.rewrite(transform::sort_lines(text))
    }

    pub fn convert_case(&self, text: &str, start: usize, end: usize, mode: CaseMode) -> Rewrite {
        self.rewrite(transform::convert_case(text, start, end, mode))
    }

    pub fn calculate_indent(&self, text: &str, line: usize) -> usize {
        transform::calculate_indent(text, line, &self.config.indent)
    }

    pub fn line_position(&self, text: &str, line: usize) -> Option<usize> {
        transform::line_position(text, line)
    }

    // --- Files ---

    /// # Errors
    /// Returns [`EngineError::Io`](crate::error::EngineError::Io) on failure.
    pub fn load(&self, path: &Path) -> Result<String> {
        crate::files::load(path)
    }

    /// # Errors
    /// Returns [`EngineError::Io`](crate::error::EngineError::Io) on failure.
    pub fn save(&self, path: &Path, text: &str) -> Result<()> {
        crate::files::save(path, text)
    }

    fn rewrite(&self, text: String) -> Rewrite {
        Rewrite::fit(text, self.config.max_output_bytes)
    }
}
