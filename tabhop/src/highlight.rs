//! Match highlighting.
//!
//! Re-runs the in-order consumption walk for each pattern of the residual
//! query, unions the consumed grapheme indices, and coalesces them into
//! contiguous ranges. Ranges are grapheme-cluster indices so a base letter and
//! its combining accent are never split by a marker.

use std::collections::BTreeSet;

use unicode_segmentation::UnicodeSegmentation;

use crate::interface::HighlightRange;
use crate::matcher::FoldedText;
use crate::query::ParsedQuery;
use crate::ranking::consume;

/// Opening and closing text inserted around each highlighted range
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightMarker {
    pub open: String,
    pub close: String,
}

impl Default for HighlightMarker {
    fn default() -> Self {
        Self {
            open: r#"<span class="highlight">"#.to_string(),
            close: "</span>".to_string(),
        }
    }
}

/// Highlight ranges for `query` over `text`. Command tokens are ignored.
pub fn highlight_ranges(text: &str, query: &str) -> Vec<HighlightRange> {
    let patterns = folded_patterns(&ParsedQuery::parse(query));
    ranges_for(&FoldedText::new(text), &patterns)
}

pub(crate) fn folded_patterns(query: &ParsedQuery) -> Vec<FoldedText> {
    query.patterns().into_iter().map(FoldedText::new).collect()
}

pub(crate) fn ranges_for(text: &FoldedText, patterns: &[FoldedText]) -> Vec<HighlightRange> {
    let consumed: BTreeSet<usize> = patterns
        .iter()
        .flat_map(|pattern| consume(text, pattern).indices)
        .collect();
    indices_to_ranges(consumed)
}

/// Coalesce ascending, deduplicated indices into maximal end-exclusive ranges.
fn indices_to_ranges(sorted: impl IntoIterator<Item = usize>) -> Vec<HighlightRange> {
    let mut ranges: Vec<HighlightRange> = Vec::new();
    for idx in sorted {
        let idx = idx as u64;
        match ranges.last_mut() {
            Some(last) if last.end == idx => last.end = idx + 1,
            _ => ranges.push(HighlightRange { start: idx, end: idx + 1 }),
        }
    }
    ranges
}

/// Wrap matched ranges of `text` in the default HTML span.
pub fn highlight(text: &str, query: &str) -> String {
    highlight_with(text, query, &HighlightMarker::default())
}

/// Wrap matched ranges of `text` in `marker`. Text without residual search
/// text comes back unchanged.
pub fn highlight_with(text: &str, query: &str, marker: &HighlightMarker) -> String {
    let ranges = highlight_ranges(text, query);
    apply_marker(text, &ranges, marker)
}

/// Insert `marker` around each range in one forward walk over the graphemes.
/// `ranges` must be sorted and non-overlapping, as produced by this module.
pub fn apply_marker(text: &str, ranges: &[HighlightRange], marker: &HighlightMarker) -> String {
    if ranges.is_empty() {
        return text.to_string();
    }

    let extra = ranges.len() * (marker.open.len() + marker.close.len());
    let mut out = String::with_capacity(text.len() + extra);
    let mut pending = ranges.iter().peekable();
    let mut open: Option<&HighlightRange> = None;

    for (i, grapheme) in text.graphemes(true).enumerate() {
        let i = i as u64;
        if open.is_none() {
            if let Some(range) = pending.next_if(|r| r.start == i) {
                out.push_str(&marker.open);
                open = Some(range);
            }
        }
        out.push_str(grapheme);
        if let Some(range) = open {
            if range.end == i + 1 {
                out.push_str(&marker.close);
                open = None;
            }
        }
    }
    // Range running past the text end (stale ranges for a different string)
    if open.is_some() {
        out.push_str(&marker.close);
    }
    out
}
