//! Accent-insensitive character matching.
//!
//! Two characters match when their base forms (lower-cased, NFD-decomposed,
//! combining marks removed) are equal, or when both belong to the same
//! equivalence class in [`EQUIVALENCE_CLASSES`]. The class table only matters
//! for letters that do not decompose (e.g. `œ`); everything else is already
//! handled by the base form.
//!
//! Text is compared one extended grapheme cluster at a time so that a letter
//! and its combining accent are always treated as a single unit.

use std::borrow::Cow;
use std::collections::HashMap;

use once_cell::sync::Lazy;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

/// Base letter → accented variants considered equal to it.
pub const EQUIVALENCE_CLASSES: &[(char, &[char])] = &[
    ('e', &['é', 'è', 'ê', 'ë']),
    ('a', &['à', 'â', 'ä']),
    ('i', &['î', 'ï']),
    ('u', &['ù', 'û', 'ü']),
    ('o', &['ô', 'ö', 'œ']),
    ('c', &['ç']),
    ('y', &['ÿ']),
];

/// Member (base or variant) → its class's base letter
static CLASS_OF: Lazy<HashMap<char, char>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for &(base, variants) in EQUIVALENCE_CLASSES {
        map.insert(base, base);
        for &variant in variants {
            map.insert(variant, base);
        }
    }
    map
});

/// Lower-case, decompose, and strip combining marks.
///
/// Returns [`Cow::Borrowed`] for ASCII input that is already lower-case.
pub fn fold(s: &str) -> Cow<'_, str> {
    if s.bytes().all(|b| b.is_ascii() && !b.is_ascii_uppercase()) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        s.to_lowercase()
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .collect(),
    )
}

/// Comparison key for one grapheme cluster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BaseForm {
    folded: String,
    class: Option<char>,
}

impl BaseForm {
    pub fn of(grapheme: &str) -> Self {
        let folded = fold(grapheme).into_owned();
        let class = single_char(&folded).and_then(|c| CLASS_OF.get(&c).copied());
        Self { folded, class }
    }

    pub fn folded(&self) -> &str {
        &self.folded
    }

    pub fn matches(&self, other: &BaseForm) -> bool {
        if self.folded == other.folded {
            return true;
        }
        matches!((self.class, other.class), (Some(a), Some(b)) if a == b)
    }

    pub(crate) fn is_space(&self) -> bool {
        self.folded == " "
    }
}

fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

/// Accent-insensitive equality of two characters.
pub fn chars_match(a: char, b: char) -> bool {
    let mut buf_a = [0u8; 4];
    let mut buf_b = [0u8; 4];
    graphemes_match(a.encode_utf8(&mut buf_a), b.encode_utf8(&mut buf_b))
}

/// Accent-insensitive equality of two grapheme clusters.
pub fn graphemes_match(a: &str, b: &str) -> bool {
    BaseForm::of(a).matches(&BaseForm::of(b))
}

/// Text pre-split into grapheme units with their base forms.
///
/// Built once per field (see `candidate.rs`) and reused across keystrokes.
#[derive(Debug, Clone, Default)]
pub struct FoldedText {
    units: Vec<BaseForm>,
    /// Concatenation of all unit base forms, for literal substring checks
    joined: String,
}

impl FoldedText {
    pub fn new(text: &str) -> Self {
        let units: Vec<BaseForm> = text.graphemes(true).map(BaseForm::of).collect();
        let joined = units.iter().map(BaseForm::folded).collect();
        Self { units, joined }
    }

    /// Number of grapheme units
    pub fn len(&self) -> usize {
        self.units.len()
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    pub fn units(&self) -> &[BaseForm] {
        &self.units
    }

    /// Folded literal substring test
    pub fn contains(&self, other: &FoldedText) -> bool {
        self.joined.contains(other.joined.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accented_vowels_match_base() {
        assert!(chars_match('e', 'é'));
        assert!(chars_match('é', 'e'));
        assert!(chars_match('a', 'à'));
        assert!(chars_match('c', 'ç'));
        assert!(chars_match('y', 'ÿ'));
        assert!(chars_match('u', 'Ü'));
    }

    #[test]
    fn test_different_letters_do_not_match() {
        assert!(!chars_match('e', 'a'));
        assert!(!chars_match('é', 'à'));
        assert!(!chars_match('c', 'k'));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(chars_match('A', 'a'));
        assert!(chars_match('É', 'e'));
    }

    #[test]
    fn test_ligature_uses_equivalence_table() {
        // œ has no canonical decomposition, only the table links it to o
        assert!(chars_match('o', 'œ'));
        assert!(chars_match('Œ', 'ö'));
        assert!(!chars_match('e', 'œ'));
    }

    #[test]
    fn test_non_latin_falls_back_to_equality() {
        assert!(chars_match('7', '7'));
        assert!(!chars_match('7', '1'));
        assert!(chars_match('🎵', '🎵'));
        assert!(!chars_match('🎵', '🎶'));
        assert!(chars_match('Ж', 'ж'));
    }

    #[test]
    fn test_combining_sequence_is_one_unit() {
        let text = FoldedText::new("cafe\u{301}");
        assert_eq!(text.len(), 4);
        assert!(graphemes_match("e\u{301}", "e"));
        assert!(graphemes_match("e\u{301}", "é"));
    }

    #[test]
    fn test_fold_borrows_plain_ascii() {
        assert!(matches!(fold("hello"), Cow::Borrowed(_)));
        assert_eq!(fold("Crème Brûlée"), "creme brulee");
    }

    #[test]
    fn test_folded_contains() {
        let text = FoldedText::new("Café de Flore");
        assert!(text.contains(&FoldedText::new("CAFE")));
        assert!(text.contains(&FoldedText::new("é de")));
        assert!(!text.contains(&FoldedText::new("cafes")));
    }
}
