//! Wire types for the watcher REST API.
//!
//! These mirror the JSON shapes the watcher service returns. Field names on
//! the wire are camelCase (`startTime`, `watchStatus`, `actionStatuses`).

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// Execution state of a watch, as reported per history entry and per action.
///
/// A state the client does not recognize deserializes to `Unknown` rather
/// than failing the whole response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WatchState {
    Ok,
    Disabled,
    Firing,
    Error,
    ConfigError,
    #[serde(other)]
    Unknown,
}

impl WatchState {
    /// The literal state text shown next to the icon.
    pub fn as_str(&self) -> &'static str {
        match self {
            WatchState::Ok => "ok",
            WatchState::Disabled => "disabled",
            WatchState::Firing => "firing",
            WatchState::Error => "error",
            WatchState::ConfigError => "config-error",
            WatchState::Unknown => "unknown",
        }
    }
}

/// Metadata for one watch. The backend owns the full shape; only the fields
/// the view uses are modeled.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Watch {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// Nested status object on a history entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchStatus {
    pub state: WatchState,
    #[serde(default)]
    pub comment: Option<String>,
}

/// One recorded execution of a watch.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub watch_status: WatchStatus,
}

/// The outcome of one action attempted during an execution.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStatus {
    pub id: String,
    pub state: WatchState,
}

/// Status object on a history detail, holding per-action outcomes.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailStatus {
    #[serde(default)]
    pub action_statuses: Vec<ActionStatus>,
}

/// Full detail for one history entry.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryDetail {
    pub id: String,
    /// Raw execution payload, arbitrary structure.
    #[serde(default)]
    pub details: serde_json::Value,
    #[serde(default)]
    pub watch_status: DetailStatus,
}
