//! TabHop FFI Interface Definition
//!
//! This file defines the public interface exposed to the host shell via UniFFI.
//! It acts as the source of truth for shared types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// ENUMS
// ═══════════════════════════════════════════════════════════════════════════════

/// Which tab field a query was matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    #[default]
    Title,
    Url,
}

/// Speaker badge shown next to a tab. Muted wins over playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, uniffi::Enum)]
#[serde(rename_all = "lowercase")]
pub enum AudioIndicator {
    #[default]
    None,
    Playing,
    Muted,
}

// ═══════════════════════════════════════════════════════════════════════════════
// RECORDS (Structs)
// ═══════════════════════════════════════════════════════════════════════════════

/// One open tab as reported by the host's tab source
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, uniffi::Record)]
pub struct TabInfo {
    pub id: i64,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub audible: bool,
    #[serde(default)]
    pub muted: bool,
}

impl TabInfo {
    /// The text of the given field
    pub fn field(&self, field: SearchField) -> &str {
        match field {
            SearchField::Title => &self.title,
            SearchField::Url => &self.url,
        }
    }

    /// Tab is playing sound, or has been muted by the user
    pub fn has_audio(&self) -> bool {
        self.audible || self.muted
    }

    pub fn audio_indicator(&self) -> AudioIndicator {
        if self.muted {
            AudioIndicator::Muted
        } else if self.audible {
            AudioIndicator::Playing
        } else {
            AudioIndicator::None
        }
    }
}

/// A highlight range over grapheme-cluster indices, end-exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct HighlightRange {
    pub start: u64,
    pub end: u64,
}

/// One visible row in the switcher list
#[derive(Debug, Clone, PartialEq, Serialize, uniffi::Record)]
pub struct RenderRow {
    pub tab_id: i64,
    /// Text of the searched field (URL under `@url`, title otherwise)
    pub display_text: String,
    /// Highlight ranges into `display_text`
    pub highlights: Vec<HighlightRange>,
    pub score: f64,
    pub field: SearchField,
    pub audio: AudioIndicator,
    pub selected: bool,
}

/// Everything the host needs to redraw the switcher after an input event
#[derive(Debug, Clone, PartialEq, Default, Serialize, uniffi::Record)]
pub struct RenderModel {
    pub query: String,
    pub rows: Vec<RenderRow>,
    pub selected_tab_id: Option<i64>,
    /// True when a query is active and nothing survived it
    pub no_results: bool,
    /// Non-fatal message for the user (host or storage failure)
    pub notice: Option<String>,
}

/// Error type for TabHop operations
#[derive(Debug, Error, uniffi::Error)]
pub enum TabHopError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    #[error("Host error: {0}")]
    HostError(String),
}

// ═══════════════════════════════════════════════════════════════════════════════
// HOST INTERFACE
// ═══════════════════════════════════════════════════════════════════════════════

/// Activation sink implemented by the host shell.
#[uniffi::export(with_foreign)]
pub trait TabHost: Send + Sync {
    /// Bring the tab with this id to the foreground
    fn activate_tab(&self, tab_id: i64) -> Result<(), TabHopError>;

    /// Dismiss the switcher surface
    fn close_switcher(&self);
}

impl From<crate::database::DatabaseError> for TabHopError {
    fn from(e: crate::database::DatabaseError) -> Self {
        TabHopError::DatabaseError(e.to_string())
    }
}

impl From<uniffi::UnexpectedUniFFICallbackError> for TabHopError {
    fn from(e: uniffi::UnexpectedUniFFICallbackError) -> Self {
        TabHopError::HostError(e.reason)
    }
}
