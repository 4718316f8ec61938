//! Tokenizing and document statistics.
//!
//! A token is a maximal run of alphanumeric characters and underscores.
//! The same tokenizer drives word-frequency ranking and document-wide
//! spelling correction.

mod frequency;

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

pub use frequency::{FrequencyAnalyzer, FrequencyEntry};

use crate::editor::LineBuffer;

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Alphabetic}\p{N}_]+").expect("token pattern is valid")
});

/// Byte range and text of every token in `text`, left to right.
pub fn tokens(text: &str) -> impl Iterator<Item = (Range<usize>, &str)> {
    TOKEN.find_iter(text).map(|m| (m.range(), m.as_str()))
}

/// Counts shown in the editor's status bar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TextStats {
    /// Whitespace-separated words.
    pub words: usize,
    pub lines: usize,
    /// Unicode scalar values.
    pub characters: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            words: text.split_whitespace().count(),
            lines: LineBuffer::from_text(text).line_count(),
            characters: text.chars().count(),
        }
    }
}
