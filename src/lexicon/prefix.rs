use std::fmt;

use fst::automaton::{Automaton, Str};
use fst::{IntoStreamer, Map, Streamer};

use super::LexiconEntry;

/// Shortest prefix (in characters) that produces completions.
pub const MIN_PREFIX_CHARS: usize = 2;

/// Case-folded keys in a finite state transducer, each mapped to the
/// position of its entry in the lexicon.
///
/// Keys sharing a prefix share a path through the transducer, so a prefix
/// query walks that path once and streams every key below it. The same map
/// answers any other [`Automaton`], which is how the fuzzy matcher finds
/// words within an edit distance.
#[derive(Clone, Default)]
pub struct PrefixIndex {
    keys: Map<Vec<u8>>,
}

impl PrefixIndex {
    /// Index `entries` by folded form. Folded forms must be unique.
    pub fn build(entries: &[LexiconEntry]) -> Self {
        let mut keys: Vec<(&str, u64)> = entries
            .iter()
            .enumerate()
            .map(|(idx, entry)| (entry.folded(), idx as u64))
            .collect();
        keys.sort_unstable();

        match Map::from_iter(keys.into_iter().map(|(key, idx)| (key.as_bytes(), idx))) {
            Ok(keys) => Self { keys },
            Err(err) => {
                tracing::error!(%err, "failed to build lexicon index");
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Positions of every entry whose folded key `automaton` accepts, in
    /// key order.
    pub(crate) fn matching<A: Automaton>(&self, automaton: A) -> Vec<usize> {
        let mut stream = self.keys.search(automaton).into_stream();
        let mut found = Vec::new();
        while let Some((_, idx)) = stream.next() {
            found.extend(usize::try_from(idx).ok());
        }
        found
    }

    /// Entries starting with `prefix`, ordered by length, then rank, then
    /// alphabetically, truncated to `limit`.
    pub fn complete<'a>(
        &self,
        entries: &'a [LexiconEntry],
        prefix: &str,
        limit: usize,
    ) -> Vec<&'a LexiconEntry> {
        if prefix.chars().count() < MIN_PREFIX_CHARS {
            return Vec::new();
        }
        let folded = prefix.to_lowercase();

        let mut matches: Vec<&LexiconEntry> = self
            .matching(Str::new(&folded).starts_with())
            .into_iter()
            .filter_map(|idx| entries.get(idx))
            .collect();
        matches.sort_by(|a, b| (a.len(), a.order_key()).cmp(&(b.len(), b.order_key())));
        matches.truncate(limit);
        matches
    }
}

impl fmt::Debug for PrefixIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrefixIndex")
            .field("keys", &self.keys.len())
            .finish()
    }
}
