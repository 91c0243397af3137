//! REST client for the watcher API.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::api::{HistoryDetail, HistoryEntry, Watch};
use crate::error::{Error, FetchFailure, FetchStage};

use super::event::{HistoryData, TuiEvent};

/// Relative time window for the history fetch. Fixed, not configurable.
pub const HISTORY_WINDOW: &str = "now-1h";

/// Response envelope for a single watch.
#[derive(Deserialize)]
struct WatchResponse {
    watch: Watch,
}

/// Response envelope for a watch's history listing.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryResponse {
    watch_history_items: Vec<HistoryEntry>,
}

/// Response envelope for a single history entry detail.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DetailResponse {
    watch_history_item: HistoryDetail,
}

pub fn watch_url(base: &str, watch_id: &str) -> String {
    format!(
        "{}/api/watcher/watch/{}",
        base.trim_end_matches('/'),
        watch_id
    )
}

pub fn history_url(base: &str, watch_id: &str) -> String {
    format!(
        "{}/api/watcher/watch/{}/history?startTime={}",
        base.trim_end_matches('/'),
        watch_id,
        HISTORY_WINDOW
    )
}

pub fn detail_url(base: &str, entry_id: &str) -> String {
    format!(
        "{}/api/watcher/history/{}",
        base.trim_end_matches('/'),
        entry_id
    )
}

fn auth_headers(token: Option<&str>) -> reqwest::header::HeaderMap {
    let mut headers = reqwest::header::HeaderMap::new();
    if let Some(t) = token {
        if let Ok(val) = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", t)) {
            headers.insert(reqwest::header::AUTHORIZATION, val);
        }
    }
    headers
}

async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    headers: &reqwest::header::HeaderMap,
    url: &str,
) -> Result<T, Error> {
    let resp = client.get(url).headers(headers.clone()).send().await?;
    if !resp.status().is_success() {
        return Err(Error::Status {
            status: resp.status().as_u16(),
            url: url.to_string(),
        });
    }
    Ok(resp.json::<T>().await?)
}

/// Load watch metadata and the trailing hour of history, then report the
/// outcome as a single event. Runs once per view lifetime.
pub async fn load_history(
    base_url: String,
    token: Option<String>,
    watch_id: String,
    tx: mpsc::Sender<TuiEvent>,
) {
    info!("Loading history for watch {} from {}", watch_id, base_url);

    let client = reqwest::Client::new();
    let headers = auth_headers(token.as_deref());

    let result = fetch_history(&client, &headers, &base_url, &watch_id).await;
    match &result {
        Ok(data) => info!("Loaded {} history entries", data.entries.len()),
        Err(failure) => error!("{}", failure),
    }

    let _ = tx.send(TuiEvent::HistoryLoaded(result)).await;
}

async fn fetch_history(
    client: &reqwest::Client,
    headers: &reqwest::header::HeaderMap,
    base_url: &str,
    watch_id: &str,
) -> Result<HistoryData, FetchFailure> {
    // Watch metadata first, then history.
    let watch = get_json::<WatchResponse>(client, headers, &watch_url(base_url, watch_id))
        .await
        .map_err(|e| FetchFailure::new(FetchStage::Watch, &e))?;

    let history = get_json::<HistoryResponse>(client, headers, &history_url(base_url, watch_id))
        .await
        .map_err(|e| FetchFailure::new(FetchStage::History, &e))?;

    Ok(HistoryData {
        watch: watch.watch,
        entries: history.watch_history_items,
    })
}

/// Fetch full detail for one history entry and report the outcome, tagged
/// with the request's sequence token so stale completions can be dropped.
pub async fn load_detail(
    base_url: String,
    token: Option<String>,
    entry_id: String,
    seq: u64,
    tx: mpsc::Sender<TuiEvent>,
) {
    let client = reqwest::Client::new();
    let headers = auth_headers(token.as_deref());

    let result = get_json::<DetailResponse>(&client, &headers, &detail_url(&base_url, &entry_id))
        .await
        .map(|r| r.watch_history_item)
        .map_err(|e| {
            let failure = FetchFailure::new(FetchStage::Detail, &e);
            error!("{}", failure);
            failure
        });

    let _ = tx.send(TuiEvent::DetailLoaded { seq, result }).await;
}
