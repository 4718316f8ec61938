//! Edit-distance ranking over the lexicon.
//!
//! Candidates come from a Levenshtein automaton run over the lexicon's
//! transducer, so only keys within the allowed distance are ever visited.
//! Queries whose automaton would be too large fall back to a length-filtered
//! scan. Either way a candidate is admitted only when its plain Levenshtein
//! distance is within [`Tolerance::max_distance`].
//!
//! With [`Tolerance::transpositions`] enabled (the default) admitted words
//! are ranked by optimal string alignment distance, where swapping two
//! adjacent characters costs one edit, so `teh` ranks `the` at distance 1.
//! The swap never widens the admitted set.

use std::collections::HashMap;

use fst::automaton::Levenshtein;

use super::{Lexicon, LexiconEntry};

/// States a Levenshtein automaton may grow to before the scan is used.
const AUTOMATON_STATE_LIMIT: usize = 10_000;

/// How far a word may be from a lexicon entry and still match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tolerance {
    /// Words up to this many characters use `short_max`.
    pub short_word_len: usize,
    pub short_max: usize,
    pub long_max: usize,
    /// Rank an adjacent swap as a single edit.
    pub transpositions: bool,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            short_word_len: 6,
            short_max: 2,
            long_max: 3,
            transpositions: true,
        }
    }
}

impl Tolerance {
    /// Largest accepted distance for a word of `len` characters.
    pub const fn max_distance(&self, len: usize) -> usize {
        if len <= self.short_word_len {
            self.short_max
        } else {
            self.long_max
        }
    }

    /// Distance used to order an admitted candidate.
    fn ranking_distance(&self, query: &str, candidate: &str, edits: usize) -> usize {
        if self.transpositions {
            strsim::osa_distance(query, candidate)
        } else {
            edits
        }
    }
}

/// Plain Levenshtein distance (insert, delete, substitute) between two
/// strings, by characters.
pub fn levenshtein(a: &str, b: &str) -> usize {
    strsim::levenshtein(a, b)
}

/// Entries within tolerance of `word`, closest first, then by rank and
/// alphabetically.
pub(crate) fn rank<'a>(lexicon: &'a Lexicon, word: &str, limit: usize) -> Vec<(usize, &'a LexiconEntry)> {
    rank_with_limit(lexicon, word, limit, AUTOMATON_STATE_LIMIT)
}

fn rank_with_limit<'a>(
    lexicon: &'a Lexicon,
    word: &str,
    limit: usize,
    state_limit: usize,
) -> Vec<(usize, &'a LexiconEntry)> {
    let folded = word.to_lowercase();
    let len = folded.chars().count();
    if len == 0 || limit == 0 {
        return Vec::new();
    }
    let tolerance = lexicon.tolerance();
    let max = tolerance.max_distance(len);

    let mut found: Vec<(usize, &LexiconEntry)> = candidates(lexicon, &folded, max, state_limit)
        .into_iter()
        .filter_map(|entry| {
            let edits = strsim::levenshtein(&folded, entry.folded());
            (edits <= max)
                .then(|| (tolerance.ranking_distance(&folded, entry.folded(), edits), entry))
        })
        .collect();
    found.sort_by(|a, b| (a.0, a.1.order_key()).cmp(&(b.0, b.1.order_key())));
    found.truncate(limit);
    found
}

/// Entries that may lie within `max` edits of `folded`.
fn candidates<'a>(
    lexicon: &'a Lexicon,
    folded: &str,
    max: usize,
    state_limit: usize,
) -> Vec<&'a LexiconEntry> {
    let distance = u32::try_from(max).unwrap_or(u32::MAX);
    match Levenshtein::new_with_limit(folded, distance, state_limit) {
        Ok(automaton) => lexicon
            .index()
            .matching(automaton)
            .into_iter()
            .filter_map(|idx| lexicon.entries().get(idx))
            .collect(),
        Err(err) => {
            tracing::debug!(%err, word = folded, "scanning lexicon instead");
            let len = folded.chars().count();
            lexicon
                .entries()
                .iter()
                .filter(|entry| entry.len().abs_diff(len) <= max)
                .collect()
        }
    }
}

pub(crate) fn correct_document(lexicon: &Lexicon, text: &str) -> (String, usize) {
    let _scope = crate::perf::scope("correct_document");
    let mut out = String::with_capacity(text.len());
    let mut corrections: HashMap<String, Option<String>> = HashMap::new();
    let mut replaced = 0;
    let mut last = 0;

    for (range, token) in crate::analysis::tokens(text) {
        out.push_str(&text[last..range.start]);
        last = range.end;

        // Numbers and identifiers are never spelling mistakes.
        if !token.chars().all(char::is_alphabetic) || lexicon.contains(token) {
            out.push_str(token);
            continue;
        }
        let correction = corrections
            .entry(token.to_lowercase())
            .or_insert_with_key(|key| lexicon.best_correction(key));
        if let Some(correction) = correction {
            out.push_str(&match_case(token, correction));
            replaced += 1;
        } else {
            out.push_str(token);
        }
    }
    out.push_str(&text[last..]);

    tracing::debug!(replaced, "document corrected");
    (out, replaced)
}

/// Carry the capitalisation of `token` over to `replacement`.
fn match_case(token: &str, replacement: &str) -> String {
    let mut chars = token.chars();
    let first_upper = chars.next().is_some_and(char::is_uppercase);
    let rest_upper = chars.clone().next().is_some() && chars.all(char::is_uppercase);

    if first_upper && rest_upper {
        replacement.to_uppercase()
    } else if first_upper {
        let mut rest = replacement.chars();
        rest.next()
            .map(|first| first.to_uppercase().chain(rest).collect())
            .unwrap_or_default()
    } else {
        replacement.to_string()
    }
}
