//! Demo tab list used by tests and benchmarks.
//!
//! A mix of pinned, audible, muted and accented tabs, loaded once from the
//! bundled CSV.

use once_cell::sync::Lazy;

/// One demo tab. Mirrors the host's tab record without depending on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoTab {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub active: bool,
    pub pinned: bool,
    pub audible: bool,
    pub muted: bool,
}

const TABS_CSV: &str = include_str!("../data/tabs.csv");

static DEMO_TABS: Lazy<Vec<DemoTab>> = Lazy::new(|| {
    let mut reader = csv::Reader::from_reader(TABS_CSV.as_bytes());
    reader
        .records()
        .map(|record| {
            let record = record.expect("bundled tabs.csv is well-formed");
            let flag = |i: usize| &record[i] == "true";
            DemoTab {
                id: record[0].parse().expect("numeric tab id"),
                title: record[1].to_string(),
                url: record[2].to_string(),
                active: flag(3),
                pinned: flag(4),
                audible: flag(5),
                muted: flag(6),
            }
        })
        .collect()
});

/// All demo tabs, in window order
pub fn demo_tabs() -> &'static [DemoTab] {
    &DEMO_TABS
}

/// Demo tabs repeated `copies` times with fresh ids, for benchmarks
pub fn scaled_demo_tabs(copies: usize) -> Vec<DemoTab> {
    let base = demo_tabs();
    (0..copies)
        .flat_map(|copy| {
            base.iter().map(move |tab| DemoTab {
                id: (copy * base.len()) as i64 + tab.id,
                active: copy == 0 && tab.active,
                ..tab.clone()
            })
        })
        .collect()
}
