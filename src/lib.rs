// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. search::SearchHit)
    clippy::module_name_repetitions
)]

//! # Quill
//!
//! The text engine behind a small desktop editor.
//!
//! Quill keeps everything an editor front end needs but should not compute
//! itself:
//! - Undo/redo history over whole-document snapshots
//! - Word completion and spelling suggestions from a shared lexicon
//! - Literal search with cached, navigable results
//! - Word-frequency ranking and document statistics
//! - Line transforms (duplicate, move, comment, sort, case, indent)
//!
//! ## Architecture
//!
//! The front end owns the live text and passes it in on every call. One
//! [`engine::Engine`] per open document holds that document's history and
//! caches; the [`lexicon::Lexicon`] is built once and shared behind an `Arc`.
//!
//! ## Modules
//!
//! - [`engine`]: Per-document facade and output capacity
//! - [`history`]: Snapshot undo/redo
//! - [`lexicon`]: Word list, prefix index and fuzzy matching
//! - [`search`]: Substring search
//! - [`analysis`]: Tokens, frequencies and statistics
//! - [`transform`]: Line-addressed rewrites
//! - [`editor`]: Line buffer shared by the transforms
//! - [`config`]: rc-file flags and engine settings

pub mod analysis;
pub mod config;
pub mod editor;
pub mod engine;
pub mod error;
pub mod files;
pub mod history;
pub mod lexicon;
pub mod perf;
pub mod search;
pub mod transform;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::engine::{Engine, Rewrite};
    pub use crate::error::EngineError;
    pub use crate::history::Snapshot;
    pub use crate::lexicon::Lexicon;
    pub use crate::transform::CaseMode;
}
