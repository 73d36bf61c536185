//! Highlighting on multi-byte and combining-mark text.
//!
//! Ranges are grapheme-cluster indices; a host that indexes by UTF-16 code
//! units has to convert. These tests pin the grapheme contract and check that
//! markers never split a character from its accent.

use tabhop::{highlight, highlight_ranges, highlight_with, HighlightMarker, HighlightRange};
use unicode_segmentation::UnicodeSegmentation;

fn brackets() -> HighlightMarker {
    HighlightMarker {
        open: "[".to_string(),
        close: "]".to_string(),
    }
}

fn range(start: u64, end: u64) -> HighlightRange {
    HighlightRange { start, end }
}

/// Convert grapheme index to UTF-16 code unit index
fn grapheme_to_utf16_index(content: &str, grapheme_index: usize) -> usize {
    content
        .graphemes(true)
        .take(grapheme_index)
        .map(|g| g.encode_utf16().count())
        .sum()
}

#[test]
fn documented_examples() {
    assert_eq!(highlight("hello", "he"), r#"<span class="highlight">he</span>llo"#);
    assert_eq!(highlight_ranges("hello", "ho"), vec![range(0, 1), range(4, 5)]);
}

#[test]
fn decomposed_accent_stays_with_its_letter() {
    // "é" written as e + U+0301
    let text = "Re\u{301}sume\u{301} template";
    assert_eq!(highlight_ranges(text, "resume"), vec![range(0, 6)]);
    assert_eq!(
        highlight_with(text, "resume", &brackets()),
        "[Re\u{301}sume\u{301}] template"
    );
}

#[test]
fn precomposed_and_decomposed_agree() {
    let composed = highlight_ranges("Crème brûlée", "creme brulee");
    let decomposed = highlight_ranges("Cre\u{300}me bru\u{302}le\u{301}e", "creme brulee");
    assert_eq!(composed, decomposed);
    assert_eq!(composed, vec![range(0, 5), range(6, 12)]);
}

#[test]
fn emoji_before_match_shifts_by_one_grapheme() {
    // family emoji is one grapheme of several code points
    let text = "👨‍👩‍👧 Family photos";
    let ranges = highlight_ranges(text, "family");
    assert_eq!(ranges, vec![range(2, 8)]);
    assert_eq!(highlight_with(text, "family", &brackets()), "👨‍👩‍👧 [Family] photos");
    assert_eq!(grapheme_to_utf16_index(text, 2), 9);
}

#[test]
fn url_field_highlight() {
    let url = "https://docs.rs/serde/latest/serde/";
    assert_eq!(
        highlight_with(url, "@url docs.rs", &brackets()),
        "https://[docs.rs]/serde/latest/serde/"
    );
}

#[test]
fn multiple_patterns_are_unioned() {
    // each pattern walks from the start: "doc" takes the D of Design
    assert_eq!(
        highlight_with("Design Document", "doc des", &brackets()),
        "[Des]ign D[oc]ument"
    );
}

#[test]
fn command_only_query_leaves_text_alone() {
    assert_eq!(highlight("Spotify – Discover Weekly", "@audio"), "Spotify – Discover Weekly");
}

#[test]
fn marker_text_is_inserted_verbatim() {
    let marker = HighlightMarker {
        open: "\u{1b}[1m".to_string(),
        close: "\u{1b}[0m".to_string(),
    };
    assert_eq!(highlight_with("tokyo", "tok", &marker), "\u{1b}[1mtok\u{1b}[0myo");
}
