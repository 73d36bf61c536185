//! Tab candidate with memoized derived state.
//!
//! Module isolation ensures no code outside this module can mutate `tab`
//! after construction, so the `OnceLock` caches can never go stale.

use std::sync::OnceLock;

use crate::interface::{SearchField, TabInfo};
use crate::matcher::FoldedText;

/// A tab plus the folded form of its searchable fields.
/// `folded(field)` is computed on first access and cached, so every keystroke
/// after the first reuses the grapheme segmentation and accent folding.
#[derive(Debug, Clone)]
pub struct TabCandidate {
    tab: TabInfo,
    title: OnceLock<FoldedText>,
    url: OnceLock<FoldedText>,
}

impl TabCandidate {
    pub fn new(tab: TabInfo) -> Self {
        Self {
            tab,
            title: OnceLock::new(),
            url: OnceLock::new(),
        }
    }

    pub fn tab(&self) -> &TabInfo {
        &self.tab
    }

    pub fn folded(&self, field: SearchField) -> &FoldedText {
        let cell = match field {
            SearchField::Title => &self.title,
            SearchField::Url => &self.url,
        };
        cell.get_or_init(|| FoldedText::new(self.tab.field(field)))
    }
}
