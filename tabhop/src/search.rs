//! Candidate filtering and ordering.
//!
//! Commands act as independent gates (`@audio`, `@pinned`) or switch the
//! searched field (`@url`). Residual text, when present, must fuzzy-match the
//! searched field and its score decides the order. Without residual text the
//! original tab order is kept.

use std::time::Instant;

use tracing::debug;

use crate::candidate::TabCandidate;
use crate::interface::{SearchField, TabInfo};
use crate::matcher::FoldedText;
use crate::query::{Command, ParsedQuery};
use crate::ranking::fuzzy_search_folded;

/// A surviving candidate for one query evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedTab {
    /// Position in the candidate list passed to [`filter_tabs`]
    pub index: usize,
    pub tab_id: i64,
    pub score: f64,
    pub field: SearchField,
}

/// Filter and order `candidates` for a raw query string.
pub fn filter_tabs(candidates: &[TabCandidate], query: &str) -> Vec<RankedTab> {
    filter_parsed(candidates, &ParsedQuery::parse(query))
}

/// Convenience wrapper for callers holding plain tabs.
pub fn rank_tabs(tabs: &[TabInfo], query: &str) -> Vec<RankedTab> {
    let candidates: Vec<TabCandidate> = tabs.iter().cloned().map(TabCandidate::new).collect();
    filter_tabs(&candidates, query)
}

pub(crate) fn filter_parsed(candidates: &[TabCandidate], query: &ParsedQuery) -> Vec<RankedTab> {
    let started = Instant::now();
    let field = query.field();

    if query.is_blank() {
        return candidates
            .iter()
            .enumerate()
            .map(|(index, c)| RankedTab {
                index,
                tab_id: c.tab().id,
                score: 0.0,
                field,
            })
            .collect();
    }

    let patterns: Vec<FoldedText> = query
        .patterns()
        .into_iter()
        .map(FoldedText::new)
        .collect();

    let mut ranked: Vec<RankedTab> = candidates
        .iter()
        .enumerate()
        .filter(|(_, c)| passes_gates(c.tab(), &query.commands))
        .filter_map(|(index, c)| {
            let score = if patterns.is_empty() {
                0.0
            } else {
                let result = fuzzy_search_folded(c.folded(field), &patterns);
                if !result.matches {
                    return None;
                }
                result.score
            };
            Some(RankedTab {
                index,
                tab_id: c.tab().id,
                score,
                field,
            })
        })
        .collect();

    // Stable: ties keep tab order
    if query.has_text() {
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    }

    debug!(
        residual = %query.residual,
        commands = query.commands.len(),
        survivors = ranked.len(),
        total = candidates.len(),
        elapsed_us = started.elapsed().as_micros() as u64,
        "filtered tabs"
    );
    ranked
}

fn passes_gates(tab: &TabInfo, commands: &[Command]) -> bool {
    commands.iter().all(|command| match command {
        Command::Audio => tab.has_audio(),
        Command::Pinned => tab.pinned,
        Command::Url | Command::Unknown(_) => true,
    })
}
