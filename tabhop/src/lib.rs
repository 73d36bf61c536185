//! TabHop Core - fuzzy ranking engine for a browser tab switcher
//!
//! This library narrows a list of open tabs with accent-insensitive,
//! multi-token fuzzy search plus `@audio`, `@pinned` and `@url` commands,
//! and reports highlight ranges for the matched characters.
//!
//! Types are exported via UniFFI proc-macros (#[derive(uniffi::Record/Enum)]).

pub(crate) mod candidate;
pub mod database;
pub mod highlight;
pub mod interface;
pub mod matcher;
pub mod query;
pub mod ranking;
pub mod search;
mod session;

pub use candidate::TabCandidate;
pub use highlight::{highlight, highlight_ranges, highlight_with, HighlightMarker};
pub use interface::*;
pub use matcher::chars_match;
pub use query::{complete_command, Command, ParsedQuery};
pub use ranking::{fuzzy_search, score_one, MatchScore};
pub use search::{filter_tabs, rank_tabs, RankedTab};
pub use session::TabSession;

uniffi::setup_scaffolding!("tabhop");
