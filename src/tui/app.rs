//! TUI application state and event handling.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::api::{HistoryDetail, HistoryEntry, Watch};
use crate::error::FetchFailure;

use super::event::TuiEvent;

/// Selectable page sizes for the history table.
pub const PAGE_SIZES: &[usize] = &[10, 50, 100];

/// Column the history table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    TriggerTime,
    State,
    Comment,
}

impl SortColumn {
    pub fn label(self) -> &'static str {
        match self {
            Self::TriggerTime => "trigger time",
            Self::State => "state",
            Self::Comment => "comment",
        }
    }
}

/// A detail fetch the main loop should spawn. `seq` is the monotonic token
/// the completion must carry to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRequest {
    pub entry_id: String,
    pub seq: u64,
}

/// The main application state.
pub struct App {
    pub watch_id: String,
    pub server_url: String,

    // Initial load
    pub loading: bool,
    pub watch: Option<Watch>,
    pub history: Vec<HistoryEntry>,
    pub load_error: Option<FetchFailure>,

    // Table view: selection is an index into the sorted order
    pub selected: Option<usize>,
    pub sort: Option<SortColumn>,
    pub sort_desc: bool,
    pub page_size: usize,

    // Detail flyout
    pub detail: Option<HistoryDetail>,
    pub detail_visible: bool,
    pub detail_error: Option<FetchFailure>,
    pub detail_loading: bool,
    pub detail_scroll: usize,
    detail_seq: u64,
    pending_detail: Option<DetailRequest>,

    pub tick: u64,
    pub should_quit: bool,
}

impl App {
    pub fn new(watch_id: String, server_url: String) -> Self {
        Self {
            watch_id,
            server_url,
            loading: true,
            watch: None,
            history: Vec::new(),
            load_error: None,
            selected: None,
            sort: None,
            sort_desc: false,
            page_size: PAGE_SIZES[0],
            detail: None,
            detail_visible: false,
            detail_error: None,
            detail_loading: false,
            detail_scroll: 0,
            detail_seq: 0,
            pending_detail: None,
            tick: 0,
            should_quit: false,
        }
    }

    /// Handle all TUI events, returning true if the screen needs redrawing.
    pub fn handle_event(&mut self, event: TuiEvent) -> bool {
        match event {
            TuiEvent::Key(key) => self.handle_key_event(key),
            TuiEvent::Tick => {
                self.tick = self.tick.wrapping_add(1);
                true
            }
            TuiEvent::HistoryLoaded(result) => {
                self.loading = false;
                match result {
                    Ok(data) => {
                        self.watch = Some(data.watch);
                        self.history = data.entries;
                        self.selected = if self.history.is_empty() {
                            None
                        } else {
                            Some(0)
                        };
                    }
                    Err(failure) => {
                        self.load_error = Some(failure);
                    }
                }
                true
            }
            TuiEvent::DetailLoaded { seq, result } => {
                // A newer request was started after this one; drop it.
                if seq != self.detail_seq {
                    return false;
                }
                self.detail_loading = false;
                match result {
                    Ok(detail) => {
                        self.detail = Some(detail);
                        self.detail_error = None;
                        self.detail_scroll = 0;
                        self.detail_visible = true;
                    }
                    Err(failure) => {
                        self.detail = None;
                        self.detail_error = Some(failure);
                        self.detail_visible = true;
                    }
                }
                true
            }
        }
    }

    /// Take the detail fetch the last key press requested, if any. The main
    /// loop spawns the actual request.
    pub fn take_detail_request(&mut self) -> Option<DetailRequest> {
        self.pending_detail.take()
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') => {
                self.should_quit = true;
                return true;
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return true;
            }
            _ => {}
        }

        if self.detail_visible || self.detail_loading {
            self.handle_detail_keys(key)
        } else {
            self.handle_table_keys(key)
        }
    }

    fn handle_detail_keys(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Esc => {
                self.close_detail();
                true
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    fn handle_table_keys(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if !self.history.is_empty() {
                    let max = self.history.len() - 1;
                    self.selected = Some(self.selected.map(|s| (s + 1).min(max)).unwrap_or(0));
                }
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if !self.history.is_empty() {
                    self.selected = Some(self.selected.map(|s| s.saturating_sub(1)).unwrap_or(0));
                }
                true
            }
            KeyCode::Char('l') | KeyCode::Right => {
                self.move_page(1);
                true
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.move_page(-1);
                true
            }
            KeyCode::Char('s') => {
                self.cycle_sort();
                true
            }
            KeyCode::Char('o') => {
                self.sort_desc = !self.sort_desc;
                true
            }
            KeyCode::Char('z') => {
                self.cycle_page_size();
                true
            }
            KeyCode::Enter => {
                self.request_detail();
                true
            }
            _ => false,
        }
    }

    /// Issue a fresh detail fetch for the selected entry. Every activation
    /// re-fetches, even for an entry already viewed.
    fn request_detail(&mut self) {
        let Some(sel) = self.selected else { return };
        let order = self.sorted_indices();
        let Some(&idx) = order.get(sel) else { return };
        let entry_id = self.history[idx].id.clone();

        self.detail_seq += 1;
        self.detail_loading = true;
        self.detail_error = None;
        self.pending_detail = Some(DetailRequest {
            entry_id,
            seq: self.detail_seq,
        });
    }

    fn close_detail(&mut self) {
        self.detail = None;
        self.detail_visible = false;
        self.detail_error = None;
        self.detail_loading = false;
        self.detail_scroll = 0;
    }

    fn cycle_sort(&mut self) {
        self.sort = match self.sort {
            None => Some(SortColumn::TriggerTime),
            Some(SortColumn::TriggerTime) => Some(SortColumn::State),
            Some(SortColumn::State) => Some(SortColumn::Comment),
            Some(SortColumn::Comment) => None,
        };
    }

    fn cycle_page_size(&mut self) {
        let pos = PAGE_SIZES
            .iter()
            .position(|&s| s == self.page_size)
            .unwrap_or(0);
        self.page_size = PAGE_SIZES[(pos + 1) % PAGE_SIZES.len()];
    }

    fn move_page(&mut self, dir: i64) {
        if self.history.is_empty() {
            return;
        }
        let max = self.history.len() - 1;
        let current = self.selected.unwrap_or(0) as i64;
        let next = current + dir * self.page_size as i64;
        self.selected = Some(next.clamp(0, max as i64) as usize);
    }

    /// Indices into `history` in display order: client-side sort over the
    /// fetched set, insertion order when unsorted.
    pub fn sorted_indices(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.history.len()).collect();
        if let Some(column) = self.sort {
            match column {
                SortColumn::TriggerTime => {
                    order.sort_by_key(|&i| self.history[i].start_time);
                }
                SortColumn::State => {
                    order.sort_by_key(|&i| self.history[i].watch_status.state.as_str());
                }
                SortColumn::Comment => {
                    order.sort_by(|&a, &b| {
                        let ca = self.history[a].watch_status.comment.as_deref().unwrap_or("");
                        let cb = self.history[b].watch_status.comment.as_deref().unwrap_or("");
                        ca.cmp(cb)
                    });
                }
            }
            if self.sort_desc {
                order.reverse();
            }
        }
        order
    }

    /// Current page number (0-based), derived from the selection.
    pub fn page(&self) -> usize {
        self.selected.unwrap_or(0) / self.page_size
    }

    /// Total number of pages at the current page size.
    pub fn page_count(&self) -> usize {
        self.history.len().div_ceil(self.page_size).max(1)
    }

    /// Display-order indices of the entries on the current page.
    pub fn page_rows(&self) -> Vec<usize> {
        let order = self.sorted_indices();
        let start = self.page() * self.page_size;
        order
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect()
    }

    /// Spinner frame based on tick counter.
    pub fn spinner_frame(&self) -> &'static str {
        const FRAMES: &[&str] = &[
            "\u{2801}", "\u{2809}", "\u{2819}", "\u{2839}", "\u{2838}", "\u{2830}", "\u{2820}",
            "\u{2800}",
        ];
        FRAMES[(self.tick as usize / 2) % FRAMES.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{DetailStatus, WatchState, WatchStatus};
    use crate::error::{FetchFailure, FetchStage};
    use crate::tui::event::HistoryData;
    use chrono::{TimeZone, Utc};

    fn entry(id: &str, minute: u32, state: WatchState, comment: Option<&str>) -> HistoryEntry {
        HistoryEntry {
            id: id.to_string(),
            start_time: Utc.with_ymd_and_hms(2026, 8, 30, 12, minute, 0).unwrap(),
            watch_status: WatchStatus {
                state,
                comment: comment.map(|c| c.to_string()),
            },
        }
    }

    fn detail(id: &str) -> HistoryDetail {
        HistoryDetail {
            id: id.to_string(),
            details: serde_json::json!({ "foo": 1 }),
            watch_status: DetailStatus {
                action_statuses: Vec::new(),
            },
        }
    }

    fn loaded_app(entries: Vec<HistoryEntry>) -> App {
        let mut app = App::new("w1".to_string(), "http://localhost:8080".to_string());
        app.handle_event(TuiEvent::HistoryLoaded(Ok(HistoryData {
            watch: Watch {
                id: "w1".to_string(),
                name: None,
            },
            entries,
        })));
        app
    }

    fn key(code: KeyCode) -> TuiEvent {
        TuiEvent::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_quit_key() {
        let mut app = App::new("w1".to_string(), "http://localhost:8080".to_string());
        app.handle_event(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[test]
    fn test_history_load_populates_state() {
        let app = loaded_app(vec![entry("h1", 0, WatchState::Ok, None)]);
        assert!(!app.loading);
        assert_eq!(app.history.len(), 1);
        assert_eq!(app.selected, Some(0));
        assert_eq!(app.watch.as_ref().unwrap().id, "w1");
    }

    #[test]
    fn test_empty_history_has_no_selection() {
        let app = loaded_app(Vec::new());
        assert!(!app.loading);
        assert_eq!(app.selected, None);
    }

    #[test]
    fn test_history_load_failure_sets_error() {
        let mut app = App::new("w1".to_string(), "http://localhost:8080".to_string());
        app.handle_event(TuiEvent::HistoryLoaded(Err(FetchFailure {
            stage: FetchStage::Watch,
            message: "connection refused".to_string(),
        })));
        assert!(!app.loading);
        assert_eq!(app.load_error.as_ref().unwrap().stage, FetchStage::Watch);
    }

    #[test]
    fn test_enter_requests_detail_for_selected_entry() {
        let mut app = loaded_app(vec![
            entry("h1", 0, WatchState::Ok, None),
            entry("h2", 1, WatchState::Firing, None),
        ]);
        app.handle_event(key(KeyCode::Char('j')));
        app.handle_event(key(KeyCode::Enter));
        let req = app.take_detail_request().unwrap();
        assert_eq!(req.entry_id, "h2");
        assert_eq!(req.seq, 1);
        assert!(app.detail_loading);
        assert!(app.take_detail_request().is_none());
    }

    #[test]
    fn test_reopening_refetches_with_new_seq() {
        let mut app = loaded_app(vec![entry("h1", 0, WatchState::Ok, None)]);
        app.handle_event(key(KeyCode::Enter));
        let first = app.take_detail_request().unwrap();
        app.handle_event(TuiEvent::DetailLoaded {
            seq: first.seq,
            result: Ok(detail("h1")),
        });
        assert!(app.detail_visible);

        app.handle_event(key(KeyCode::Esc));
        assert!(!app.detail_visible);
        assert!(app.detail.is_none());

        // Same row again: a fresh fetch, not a cached detail
        app.handle_event(key(KeyCode::Enter));
        let second = app.take_detail_request().unwrap();
        assert_eq!(second.entry_id, "h1");
        assert_eq!(second.seq, first.seq + 1);
    }

    #[test]
    fn test_stale_detail_completion_is_dropped() {
        let mut app = loaded_app(vec![
            entry("h1", 0, WatchState::Ok, None),
            entry("h2", 1, WatchState::Error, None),
        ]);
        app.handle_event(key(KeyCode::Enter));
        let first = app.take_detail_request().unwrap();
        assert_eq!(first.entry_id, "h1");
        // User closes the loading flyout, moves on, and activates another
        // row while the first fetch is still in flight.
        app.handle_event(key(KeyCode::Esc));
        app.handle_event(key(KeyCode::Char('j')));
        app.handle_event(key(KeyCode::Enter));
        let second = app.take_detail_request().unwrap();
        assert_eq!(second.entry_id, "h2");
        assert!(second.seq > first.seq);

        app.handle_event(TuiEvent::DetailLoaded {
            seq: first.seq,
            result: Ok(detail("h1")),
        });
        assert!(!app.detail_visible);
        assert!(app.detail.is_none());

        app.handle_event(TuiEvent::DetailLoaded {
            seq: second.seq,
            result: Ok(detail("h2")),
        });
        assert!(app.detail_visible);
        assert_eq!(app.detail.as_ref().unwrap().id, "h2");
    }

    #[test]
    fn test_detail_failure_shows_inline_error() {
        let mut app = loaded_app(vec![entry("h1", 0, WatchState::Ok, None)]);
        app.handle_event(key(KeyCode::Enter));
        let req = app.take_detail_request().unwrap();
        app.handle_event(TuiEvent::DetailLoaded {
            seq: req.seq,
            result: Err(FetchFailure {
                stage: FetchStage::Detail,
                message: "HTTP 500".to_string(),
            }),
        });
        assert!(app.detail_visible);
        assert!(app.detail.is_none());
        assert!(app.detail_error.is_some());
        // Table stays interactive after closing the flyout
        app.handle_event(key(KeyCode::Esc));
        app.handle_event(key(KeyCode::Enter));
        assert!(app.take_detail_request().is_some());
    }

    #[test]
    fn test_sort_cycle_and_direction() {
        let mut app = loaded_app(vec![
            entry("h1", 5, WatchState::Ok, Some("b")),
            entry("h2", 1, WatchState::Error, Some("a")),
            entry("h3", 9, WatchState::Firing, Some("c")),
        ]);
        assert_eq!(app.sorted_indices(), vec![0, 1, 2]);

        app.handle_event(key(KeyCode::Char('s')));
        assert_eq!(app.sort, Some(SortColumn::TriggerTime));
        assert_eq!(app.sorted_indices(), vec![1, 0, 2]);

        app.handle_event(key(KeyCode::Char('o')));
        assert_eq!(app.sorted_indices(), vec![2, 0, 1]);
        app.handle_event(key(KeyCode::Char('o')));

        app.handle_event(key(KeyCode::Char('s')));
        assert_eq!(app.sort, Some(SortColumn::State));
        // error < firing < ok alphabetically
        assert_eq!(app.sorted_indices(), vec![1, 2, 0]);

        app.handle_event(key(KeyCode::Char('s')));
        assert_eq!(app.sort, Some(SortColumn::Comment));
        assert_eq!(app.sorted_indices(), vec![1, 0, 2]);

        app.handle_event(key(KeyCode::Char('s')));
        assert_eq!(app.sort, None);
    }

    #[test]
    fn test_pagination_split() {
        let entries: Vec<HistoryEntry> = (0..23)
            .map(|i| entry(&format!("h{}", i), i % 60, WatchState::Ok, None))
            .collect();
        let mut app = loaded_app(entries);
        assert_eq!(app.page_size, 10);
        assert_eq!(app.page_count(), 3);
        assert_eq!(app.page_rows().len(), 10);

        app.handle_event(key(KeyCode::Char('l')));
        assert_eq!(app.page(), 1);
        app.handle_event(key(KeyCode::Char('l')));
        assert_eq!(app.page(), 2);
        assert_eq!(app.page_rows().len(), 3);
        // Clamped at the last entry
        app.handle_event(key(KeyCode::Char('l')));
        assert_eq!(app.selected, Some(22));
    }

    #[test]
    fn test_page_size_cycles_through_options() {
        let mut app = loaded_app(Vec::new());
        assert_eq!(app.page_size, 10);
        app.handle_event(key(KeyCode::Char('z')));
        assert_eq!(app.page_size, 50);
        app.handle_event(key(KeyCode::Char('z')));
        assert_eq!(app.page_size, 100);
        app.handle_event(key(KeyCode::Char('z')));
        assert_eq!(app.page_size, 10);
    }

    #[test]
    fn test_empty_page_count_is_one() {
        let app = loaded_app(Vec::new());
        assert_eq!(app.page_count(), 1);
        assert!(app.page_rows().is_empty());
    }
}
