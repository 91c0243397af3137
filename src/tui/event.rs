//! TUI event types merging terminal, fetch-completion, and tick events.

use crossterm::event::KeyEvent;

use crate::api::{HistoryDetail, HistoryEntry, Watch};
use crate::error::FetchFailure;

/// All events the TUI main loop handles.
pub enum TuiEvent {
    /// Terminal key press
    Key(KeyEvent),
    /// Tick for spinner animation
    Tick,
    /// Initial watch metadata + history load finished
    HistoryLoaded(Result<HistoryData, FetchFailure>),
    /// A detail fetch finished. `seq` identifies which request this answers;
    /// stale completions are dropped by the app.
    DetailLoaded {
        seq: u64,
        result: Result<HistoryDetail, FetchFailure>,
    },
}

/// Data loaded via REST on startup.
pub struct HistoryData {
    pub watch: Watch,
    pub entries: Vec<HistoryEntry>,
}
