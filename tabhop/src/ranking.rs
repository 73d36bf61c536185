//! Fuzzy subsequence scoring.
//!
//! A pattern matches a text when every pattern unit can be consumed, in order,
//! by a single left-to-right walk over the text. The score rewards contiguous
//! runs, word-start matches, early matches, tight spans and literal substrings.
//! A query is a conjunction of whitespace-separated patterns.

use crate::matcher::FoldedText;

/// Per-unit score for a consumed unit that follows a gap
const GAP_HIT_SCORE: f64 = 1.0;
/// Contiguous hits score `run_length * CONSECUTIVE_MULTIPLIER`
const CONSECUTIVE_MULTIPLIER: f64 = 2.0;
/// `pattern_len * WORD_START_BONUS` when the first hit starts a word
const WORD_START_BONUS: f64 = 3.0;
/// Subtracted per unit before the first hit
const START_PENALTY: f64 = 0.15;
/// Subtracted per unit between first and last hit
const SPAN_PENALTY: f64 = 0.08;
/// `pattern_len * SUBSTRING_BONUS` when the folded pattern occurs literally
const SUBSTRING_BONUS: f64 = 4.0;
/// `pattern_count * ALL_PATTERNS_BONUS` when every pattern of a query matched
const ALL_PATTERNS_BONUS: f64 = 2.0;

/// Outcome of matching one pattern (or a whole query) against one text
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchScore {
    pub matches: bool,
    pub score: f64,
}

impl MatchScore {
    /// Trivial match: empty pattern or empty query
    pub const EMPTY: MatchScore = MatchScore { matches: true, score: 0.0 };
    pub const NO_MATCH: MatchScore = MatchScore { matches: false, score: 0.0 };
}

/// Units consumed by one left-to-right walk of a pattern over a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Consumption {
    /// Ascending text indices, one per consumed pattern unit
    pub(crate) indices: Vec<usize>,
    /// Whether every pattern unit was consumed
    pub(crate) complete: bool,
}

/// Greedy in-order consumption of `pattern` by `text`.
///
/// Stops as soon as the pattern is exhausted. Partial consumption is returned
/// as-is so the highlighter can mark it.
pub(crate) fn consume(text: &FoldedText, pattern: &FoldedText) -> Consumption {
    let wanted = pattern.units();
    let mut indices = Vec::with_capacity(wanted.len());

    for (i, unit) in text.units().iter().enumerate() {
        let Some(next) = wanted.get(indices.len()) else {
            break;
        };
        if unit.matches(next) {
            indices.push(i);
        }
    }

    let complete = indices.len() == wanted.len();
    Consumption { indices, complete }
}

/// Score one pattern against one text.
pub fn score_one(text: &str, pattern: &str) -> MatchScore {
    score_pattern(&FoldedText::new(text), &FoldedText::new(pattern))
}

pub(crate) fn score_pattern(text: &FoldedText, pattern: &FoldedText) -> MatchScore {
    if pattern.is_empty() {
        return MatchScore::EMPTY;
    }
    if pattern.len() > text.len() {
        return MatchScore::NO_MATCH;
    }

    let consumption = consume(text, pattern);
    if !consumption.complete {
        return MatchScore::NO_MATCH;
    }
    let indices = &consumption.indices;

    // A hit at index 0 counts as contiguous: nothing unmatched precedes it.
    let mut score = 0.0;
    let mut run = 0u32;
    let mut previous: Option<usize> = None;
    for &i in indices {
        let follows = previous.map_or(i == 0, |p| p + 1 == i);
        if follows {
            run += 1;
            score += f64::from(run) * CONSECUTIVE_MULTIPLIER;
        } else {
            run = 1;
            score += GAP_HIT_SCORE;
        }
        previous = Some(i);
    }

    let pattern_len = pattern.len() as f64;
    let first = indices[0];
    let last = indices[indices.len() - 1];

    if first == 0 || text.units()[first - 1].is_space() {
        score += pattern_len * WORD_START_BONUS;
    }
    score -= first as f64 * START_PENALTY;
    score -= (last - first) as f64 * SPAN_PENALTY;
    if text.contains(pattern) {
        score += pattern_len * SUBSTRING_BONUS;
    }

    MatchScore { matches: true, score }
}

/// Split search text into non-empty whitespace-separated patterns.
pub fn split_patterns(query: &str) -> Vec<&str> {
    query.split_whitespace().collect()
}

/// Match every whitespace-separated pattern of `query` against `text`.
pub fn fuzzy_search(text: &str, query: &str) -> MatchScore {
    let patterns: Vec<FoldedText> = split_patterns(query)
        .into_iter()
        .map(FoldedText::new)
        .collect();
    fuzzy_search_folded(&FoldedText::new(text), &patterns)
}

pub(crate) fn fuzzy_search_folded(text: &FoldedText, patterns: &[FoldedText]) -> MatchScore {
    if patterns.is_empty() {
        return MatchScore::EMPTY;
    }

    let mut total = 0.0;
    for pattern in patterns {
        let result = score_pattern(text, pattern);
        if !result.matches {
            return MatchScore::NO_MATCH;
        }
        total += result.score;
    }
    total += patterns.len() as f64 * ALL_PATTERNS_BONUS;

    MatchScore { matches: true, score: total }
}
