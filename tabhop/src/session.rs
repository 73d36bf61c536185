//! TabSession - switcher controller exported to the host shell
//!
//! Owns the tab list, the current query, the visible result list and the
//! selection. Every host input event maps to one synchronous method that
//! returns a fresh [`RenderModel`]. Ranking and highlighting are pure
//! functions of (candidates, query); this type only keeps their output.
//!
//! Concurrency Model:
//! Input events arrive one at a time from the host's event loop. The state
//! sits behind a mutex only because UniFFI objects are shared as `Arc<Self>`
//! and must be `Send + Sync`.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::candidate::TabCandidate;
use crate::database::Database;
use crate::highlight::{folded_patterns, ranges_for};
use crate::interface::{RenderModel, RenderRow, TabHopError, TabHost, TabInfo};
use crate::query::{self, ParsedQuery};
use crate::search::{filter_parsed, RankedTab};

struct SessionState {
    query: String,
    parsed: ParsedQuery,
    results: Vec<RankedTab>,
    /// Position in `results`
    selected: Option<usize>,
    notice: Option<String>,
}

#[derive(uniffi::Object)]
pub struct TabSession {
    candidates: Vec<TabCandidate>,
    host: Arc<dyn TabHost>,
    db: Option<Database>,
    state: Mutex<SessionState>,
}

// Internal implementation (not exported via FFI)
impl TabSession {
    /// Start a session over `tabs`.
    ///
    /// The active tab is selected first. If `db` holds a non-empty last query,
    /// it is restored and applied immediately.
    pub fn with_store(tabs: Vec<TabInfo>, host: Arc<dyn TabHost>, db: Option<Database>) -> Self {
        let candidates: Vec<TabCandidate> = tabs.into_iter().map(TabCandidate::new).collect();
        let parsed = ParsedQuery::default();
        let results = filter_parsed(&candidates, &parsed);
        let selected = candidates
            .iter()
            .position(|c| c.tab().active)
            .or_else(|| (!candidates.is_empty()).then_some(0));

        let session = Self {
            candidates,
            host,
            db,
            state: Mutex::new(SessionState {
                query: String::new(),
                parsed,
                results,
                selected,
                notice: None,
            }),
        };

        let restored = session.db.as_ref().and_then(|db| match db.load_last_query() {
            Ok(query) => query.filter(|q| !q.is_empty()),
            Err(e) => {
                warn!(error = %e, "failed to restore last query");
                None
            }
        });
        if let Some(query) = restored {
            debug!(%query, "restoring last query");
            session.on_query_changed(query);
        }
        session
    }

    fn persist_query(&self, state: &mut SessionState) {
        let Some(db) = &self.db else {
            return;
        };
        if let Err(e) = db.save_last_query(&state.query) {
            warn!(error = %e, "failed to save last query");
            state.notice = Some(format!("Could not save search: {e}"));
        }
    }

    /// Selection changed: persist the query that produced it
    fn select(&self, state: &mut SessionState, position: Option<usize>) {
        state.selected = position;
        if position.is_some() {
            self.persist_query(state);
        }
    }

    fn apply_query(&self, state: &mut SessionState, query: String) {
        state.parsed = ParsedQuery::parse(&query);
        state.query = query;
        state.results = filter_parsed(&self.candidates, &state.parsed);
        state.notice = None;
        let first = (!state.results.is_empty()).then_some(0);
        self.select(state, first);
    }

    fn step_selection(&self, forward: bool) -> RenderModel {
        let mut state = self.state.lock();
        let len = state.results.len();
        if len > 0 {
            let next = match (state.selected, forward) {
                (Some(i), true) => (i + 1) % len,
                (Some(i), false) => (i + len - 1) % len,
                (None, true) => 0,
                (None, false) => len - 1,
            };
            self.select(&mut state, Some(next));
        }
        self.build_model(&state)
    }

    fn build_model(&self, state: &SessionState) -> RenderModel {
        let patterns = folded_patterns(&state.parsed);
        let rows: Vec<RenderRow> = state
            .results
            .iter()
            .enumerate()
            .map(|(position, ranked)| {
                let candidate = &self.candidates[ranked.index];
                let tab = candidate.tab();
                RenderRow {
                    tab_id: tab.id,
                    display_text: tab.field(ranked.field).to_string(),
                    highlights: ranges_for(candidate.folded(ranked.field), &patterns),
                    score: ranked.score,
                    field: ranked.field,
                    audio: tab.audio_indicator(),
                    selected: state.selected == Some(position),
                }
            })
            .collect();

        RenderModel {
            query: state.query.clone(),
            selected_tab_id: state.selected.map(|i| state.results[i].tab_id),
            no_results: rows.is_empty() && !self.candidates.is_empty(),
            rows,
            notice: state.notice.clone(),
        }
    }

    /// Tab ids of the visible rows, in display order
    pub fn visible_tab_ids(&self) -> Vec<i64> {
        self.state.lock().results.iter().map(|r| r.tab_id).collect()
    }
}

#[uniffi::export]
impl TabSession {
    /// Create a session. `store_path` enables last-query persistence.
    #[uniffi::constructor]
    pub fn new(
        tabs: Vec<TabInfo>,
        host: Arc<dyn TabHost>,
        store_path: Option<String>,
    ) -> Result<Arc<Self>, TabHopError> {
        let db = store_path.map(Database::open).transpose()?;
        Ok(Arc::new(Self::with_store(tabs, host, db)))
    }

    /// The search input changed
    pub fn on_query_changed(&self, query: String) -> RenderModel {
        let mut state = self.state.lock();
        self.apply_query(&mut state, query);
        self.build_model(&state)
    }

    /// Arrow down: next visible row, wrapping to the top
    pub fn select_next(&self) -> RenderModel {
        self.step_selection(true)
    }

    /// Arrow up: previous visible row, wrapping to the bottom
    pub fn select_previous(&self) -> RenderModel {
        self.step_selection(false)
    }

    /// Tab key: complete a trailing `@partial` and re-filter.
    /// Returns the completed query, or `None` if nothing was completed.
    pub fn complete_command(&self) -> Option<String> {
        let mut state = self.state.lock();
        let completed = query::complete_command(&state.query)?;
        self.apply_query(&mut state, completed.clone());
        Some(completed)
    }

    /// Enter or click: hand the selected tab to the host and close.
    /// Host failures are reported through `notice`; the session stays usable.
    pub fn activate_selected(&self) -> RenderModel {
        let mut state = self.state.lock();
        let Some(tab_id) = state.selected.map(|i| state.results[i].tab_id) else {
            return self.build_model(&state);
        };
        state.notice = match self.host.activate_tab(tab_id) {
            Ok(()) => {
                self.host.close_switcher();
                None
            }
            Err(e) => {
                warn!(tab_id, error = %e, "tab activation failed");
                Some(format!("Could not switch to tab: {e}"))
            }
        };
        self.build_model(&state)
    }

    /// Activate a specific row (mouse click). Ids that are not visible are
    /// ignored and the host is not called.
    pub fn activate_tab(&self, tab_id: i64) -> RenderModel {
        {
            let mut state = self.state.lock();
            let Some(position) = state.results.iter().position(|r| r.tab_id == tab_id) else {
                debug!(tab_id, "ignoring click on a tab that is not visible");
                return self.build_model(&state);
            };
            state.selected = Some(position);
        }
        self.activate_selected()
    }

    pub fn render_model(&self) -> RenderModel {
        let state = self.state.lock();
        self.build_model(&state)
    }

    pub fn query(&self) -> String {
        self.state.lock().query.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingHost {
        activated: Mutex<Vec<i64>>,
        closed: Mutex<u32>,
        fail: bool,
    }

    impl TabHost for RecordingHost {
        fn activate_tab(&self, tab_id: i64) -> Result<(), TabHopError> {
            if self.fail {
                return Err(TabHopError::HostError("tab is gone".to_string()));
            }
            self.activated.lock().push(tab_id);
            Ok(())
        }

        fn close_switcher(&self) {
            *self.closed.lock() += 1;
        }
    }

    fn tab(id: i64, title: &str) -> TabInfo {
        TabInfo {
            id,
            title: title.to_string(),
            url: format!("https://site{id}.example"),
            ..Default::default()
        }
    }

    fn tabs() -> Vec<TabInfo> {
        let mut active = tab(2, "Rust Playground");
        active.active = true;
        vec![tab(1, "Inbox - Mail"), active, tab(3, "Rust Book")]
    }

    #[test]
    fn test_active_tab_selected_at_start() {
        let session = TabSession::with_store(tabs(), Arc::new(RecordingHost::default()), None);
        let model = session.render_model();
        assert_eq!(model.selected_tab_id, Some(2));
        assert_eq!(model.rows.len(), 3);
        assert!(!model.no_results);
    }

    #[test]
    fn test_query_selects_first_result() {
        let session = TabSession::with_store(tabs(), Arc::new(RecordingHost::default()), None);
        let model = session.on_query_changed("rust book".to_string());
        assert_eq!(model.rows[0].tab_id, 3);
        assert_eq!(model.selected_tab_id, Some(3));
        assert!(model.rows[0].selected);
        assert!(!model.rows[0].highlights.is_empty());
    }

    #[test]
    fn test_no_results() {
        let session = TabSession::with_store(tabs(), Arc::new(RecordingHost::default()), None);
        let model = session.on_query_changed("zzzz".to_string());
        assert!(model.rows.is_empty());
        assert!(model.no_results);
        assert_eq!(model.selected_tab_id, None);
    }

    #[test]
    fn test_activation_closes_switcher() {
        let host = Arc::new(RecordingHost::default());
        let session = TabSession::with_store(tabs(), host.clone(), None);
        session.on_query_changed("inbox".to_string());
        let model = session.activate_selected();
        assert_eq!(model.notice, None);
        assert_eq!(*host.activated.lock(), vec![1]);
        assert_eq!(*host.closed.lock(), 1);
    }

    #[test]
    fn test_activation_failure_is_a_notice() {
        let host = Arc::new(RecordingHost {
            fail: true,
            ..Default::default()
        });
        let session = TabSession::with_store(tabs(), host.clone(), None);
        let model = session.activate_selected();
        assert!(model.notice.unwrap().contains("tab is gone"));
        assert_eq!(*host.closed.lock(), 0);

        // still usable
        let model = session.on_query_changed("mail".to_string());
        assert_eq!(model.selected_tab_id, Some(1));
        assert_eq!(model.notice, None);
    }

    #[test]
    fn test_click_on_hidden_tab_is_ignored() {
        let host = Arc::new(RecordingHost::default());
        let session = TabSession::with_store(tabs(), host.clone(), None);
        session.on_query_changed("rust book".to_string());

        let model = session.activate_tab(1);
        assert!(host.activated.lock().is_empty());
        assert_eq!(*host.closed.lock(), 0);
        assert_eq!(model.selected_tab_id, Some(3));
    }
}
