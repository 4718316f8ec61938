//! Undo/redo history over whole-document snapshots.
//!
//! The caller decides when an edit has settled (a debounce timer after
//! typing stops, or a structural command) and records it with
//! [`History::checkpoint`]. History granularity is therefore whatever the
//! caller coalesces, never individual keystrokes.

use std::collections::VecDeque;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Default number of snapshots kept on each stack.
pub const DEFAULT_DEPTH: usize = 200;

/// Immutable copy of the document text at a checkpoint.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Snapshot(Arc<str>);

impl Snapshot {
    pub fn new(text: &str) -> Self {
        Self(Arc::from(text))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Snapshot {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Snapshot {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<Snapshot> for String {
    fn from(snapshot: Snapshot) -> Self {
        snapshot.0.to_string()
    }
}

impl PartialEq<str> for Snapshot {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for Snapshot {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

impl fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Snapshot({} bytes)", self.0.len())
    }
}

/// Current text plus linear undo and redo stacks.
#[derive(Debug, Clone)]
pub struct History {
    current: Option<Snapshot>,
    undo_stack: VecDeque<Snapshot>,
    redo_stack: VecDeque<Snapshot>,
    max_depth: usize,
    clean: Option<Snapshot>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_DEPTH)
    }
}

impl History {
    /// Create an empty history keeping at most `max_depth` snapshots per
    /// stack. A depth of zero is treated as one.
    pub fn new(max_depth: usize) -> Self {
        Self {
            current: None,
            undo_stack: VecDeque::new(),
            redo_stack: VecDeque::new(),
            max_depth: max_depth.max(1),
            clean: None,
        }
    }

    /// Record `text` as the current state unless it equals the last
    /// recorded state. A real change clears the redo stack.
    pub fn checkpoint(&mut self, text: &str) {
        if self.current.as_ref().is_some_and(|current| current == text) {
            return;
        }
        if let Some(previous) = self.current.replace(Snapshot::new(text)) {
            push_bounded(&mut self.undo_stack, previous, self.max_depth);
        }
        if !self.redo_stack.is_empty() {
            tracing::debug!(dropped = self.redo_stack.len(), "redo history cleared");
            self.redo_stack.clear();
        }
    }

    /// Step back one checkpoint. `current_text` is the caller's live
    /// buffer, which becomes the redo target.
    pub fn undo(&mut self, current_text: &str) -> Option<Snapshot> {
        let snapshot = self.undo_stack.pop_back()?;
        push_bounded(&mut self.redo_stack, Snapshot::new(current_text), self.max_depth);
        self.current = Some(snapshot.clone());
        Some(snapshot)
    }

    /// Step forward one checkpoint; the mirror of [`undo`](Self::undo).
    pub fn redo(&mut self, current_text: &str) -> Option<Snapshot> {
        let snapshot = self.redo_stack.pop_back()?;
        push_bounded(&mut self.undo_stack, Snapshot::new(current_text), self.max_depth);
        self.current = Some(snapshot.clone());
        Some(snapshot)
    }

    /// The most recently recorded state.
    pub const fn current(&self) -> Option<&Snapshot> {
        self.current.as_ref()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub const fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Mark the current state as saved.
    pub fn mark_clean(&mut self) {
        self.clean.clone_from(&self.current);
    }

    /// Whether the current state differs from the last saved one.
    pub fn is_dirty(&self) -> bool {
        self.current != self.clean
    }
}

fn push_bounded(stack: &mut VecDeque<Snapshot>, snapshot: Snapshot, max_depth: usize) {
    stack.push_back(snapshot);
    while stack.len() > max_depth {
        stack.pop_front();
        tracing::debug!(max_depth, "oldest history snapshot evicted");
    }
}
