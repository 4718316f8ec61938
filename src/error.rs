//! Errors surfaced across the engine boundary.
//!
//! "Nothing found" is never an error: empty history, zero matches and
//! missing suggestions come back as `None` or empty collections. Only
//! startup failures, I/O and contract violations end up here.

use std::path::PathBuf;

use thiserror::Error;

/// Failure reported by the text engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The lexicon file could not be read.
    #[error("failed to load lexicon from {path}")]
    LexiconLoad {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The lexicon source contained no usable words.
    #[error("lexicon {0} contains no words")]
    EmptyLexicon(String),

    /// A search result was requested before any search ran.
    #[error("no search has been run")]
    NoSearch,

    /// A frequency entry was requested before any analysis ran.
    #[error("no word-frequency analysis has been run")]
    NoAnalysis,

    /// Reading or writing a document failed.
    #[error("I/O error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;
