//! Dictionary of known words backing completion and correction.
//!
//! A [`Lexicon`] is built once and then only read, so a single instance can
//! be shared between every open document behind an `Arc`. It owns two
//! query structures:
//! - [`PrefixIndex`]: a transducer over the folded keys answering "words
//!   starting with P"
//! - the fuzzy matcher in [`fuzzy`]: a Levenshtein automaton over the same
//!   transducer answering "words close to W"

pub mod fuzzy;
mod prefix;

use std::collections::HashMap;
use std::path::Path;

pub use fuzzy::{Tolerance, levenshtein};
pub use prefix::{MIN_PREFIX_CHARS, PrefixIndex};

use crate::error::{EngineError, Result};

/// Maximum number of words any suggestion query returns.
pub const MAX_SUGGESTIONS: usize = 5;

/// Word list compiled into the binary, used when no lexicon file is configured.
const BUILTIN_WORDS: &str = include_str!("../../data/words.txt");

/// A single known word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexiconEntry {
    word: String,
    folded: String,
    len: usize,
    rank: Option<u32>,
}

impl LexiconEntry {
    fn new(word: &str, rank: Option<u32>) -> Self {
        let folded = word.to_lowercase();
        let len = folded.chars().count();
        Self {
            word: word.to_string(),
            folded,
            len,
            rank,
        }
    }

    /// The word as written in the lexicon source.
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Lowercase form used for matching.
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Length in characters.
    pub const fn len(&self) -> usize {
        self.len
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Usage rank; lower is more common.
    pub const fn rank(&self) -> Option<u32> {
        self.rank
    }

    /// Tie-break key: ranked entries first, then alphabetical.
    pub(crate) fn order_key(&self) -> (u32, &str, &str) {
        (self.rank.unwrap_or(u32::MAX), &self.folded, &self.word)
    }
}

/// Immutable word list plus its query indices.
#[derive(Debug, Clone)]
pub struct Lexicon {
    entries: Vec<LexiconEntry>,
    by_folded: HashMap<String, usize>,
    prefix: PrefixIndex,
    tolerance: Tolerance,
}

impl Lexicon {
    /// Build a lexicon from plain words. Duplicates (after case folding)
    /// keep their first occurrence.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::from_ranked(words.into_iter().map(|w| (w.as_ref().to_string(), None)))
    }

    /// Parse lexicon source text: one word per line, optionally followed by
    /// an integer usage rank. Blank lines and `#` comments are skipped.
    ///
    /// # Errors
    /// Returns [`EngineError::EmptyLexicon`] if no usable word was found.
    pub fn parse(name: &str, content: &str) -> Result<Self> {
        let lexicon = Self::from_ranked(parse_lines(content));
        if lexicon.is_empty() {
            return Err(EngineError::EmptyLexicon(name.to_string()));
        }
        tracing::info!(source = name, words = lexicon.len(), "lexicon loaded");
        Ok(lexicon)
    }

    /// Load a lexicon file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or holds no words.
    pub fn load(path: &Path) -> Result<Self> {
        let _scope = crate::perf::scope("lexicon.load");
        let content = std::fs::read_to_string(path).map_err(|source| EngineError::LexiconLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&path.display().to_string(), &content)
    }

    /// The word list compiled into the crate.
    pub fn builtin() -> Self {
        let lexicon = Self::from_ranked(parse_lines(BUILTIN_WORDS));
        tracing::debug!(words = lexicon.len(), "builtin lexicon loaded");
        lexicon
    }

    /// Replace the fuzzy-matching tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    pub const fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    /// Number of distinct words.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[LexiconEntry] {
        &self.entries
    }

    pub(crate) const fn index(&self) -> &PrefixIndex {
        &self.prefix
    }

    /// Case-insensitive exact membership.
    pub fn contains(&self, word: &str) -> bool {
        self.by_folded.contains_key(&word.to_lowercase())
    }

    /// Look up the entry for `word`, ignoring case.
    pub fn get(&self, word: &str) -> Option<&LexiconEntry> {
        self.by_folded
            .get(&word.to_lowercase())
            .map(|&idx| &self.entries[idx])
    }

    /// Up to [`MAX_SUGGESTIONS`] words starting with `prefix`, shortest first.
    ///
    /// Prefixes shorter than [`MIN_PREFIX_CHARS`] yield nothing.
    pub fn complete(&self, prefix: &str) -> Vec<String> {
        self.prefix
            .complete(&self.entries, prefix, MAX_SUGGESTIONS)
            .into_iter()
            .map(|entry| entry.word.clone())
            .collect()
    }

    /// Up to [`MAX_SUGGESTIONS`] words closest to `word` by edit distance.
    pub fn suggest(&self, word: &str) -> Vec<String> {
        fuzzy::rank(self, word, MAX_SUGGESTIONS)
            .into_iter()
            .map(|(_, entry)| entry.word.clone())
            .collect()
    }

    /// The closest word within tolerance, if any.
    pub fn best_correction(&self, word: &str) -> Option<String> {
        fuzzy::rank(self, word, 1)
            .into_iter()
            .next()
            .map(|(_, entry)| entry.word.clone())
    }

    /// Replace misspelled words in `text`; returns the new text and the
    /// number of replacements.
    pub fn correct_document(&self, text: &str) -> (String, usize) {
        fuzzy::correct_document(self, text)
    }

    fn from_ranked<I>(words: I) -> Self
    where
        I: IntoIterator<Item = (String, Option<u32>)>,
    {
        let mut entries = Vec::new();
        let mut by_folded = HashMap::new();
        for (word, rank) in words {
            let word = word.trim();
            if word.is_empty() || !word.chars().all(char::is_alphabetic) {
                continue;
            }
            let entry = LexiconEntry::new(word, rank);
            if by_folded.contains_key(&entry.folded) {
                continue;
            }
            by_folded.insert(entry.folded.clone(), entries.len());
            entries.push(entry);
        }
        let prefix = PrefixIndex::build(&entries);
        Self {
            entries,
            by_folded,
            prefix,
            tolerance: Tolerance::default(),
        }
    }
}

fn parse_lines(content: &str) -> impl Iterator<Item = (String, Option<u32>)> + '_ {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            let word = parts.next()?;
            let rank = parts.next().and_then(|r| r.parse().ok());
            Some((word.to_string(), rank))
        })
}
