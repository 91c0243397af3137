//! Error types for watchmon.

use thiserror::Error;

/// Result type alias for watchmon operations.
pub type Result<T> = std::result::Result<T, Error>;

/// watchmon error types.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which fetch a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStage {
    Watch,
    History,
    Detail,
}

impl std::fmt::Display for FetchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchStage::Watch => write!(f, "watch"),
            FetchStage::History => write!(f, "history"),
            FetchStage::Detail => write!(f, "detail"),
        }
    }
}

/// A failed fetch, carried through the event channel to the view.
///
/// The underlying `reqwest` errors are not `Clone`, so the cause is kept as
/// a formatted message.
#[derive(Debug, Clone)]
pub struct FetchFailure {
    pub stage: FetchStage,
    pub message: String,
}

impl FetchFailure {
    pub fn new(stage: FetchStage, err: &Error) -> Self {
        Self {
            stage,
            message: err.to_string(),
        }
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} fetch failed: {}", self.stage, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failure_display() {
        let failure = FetchFailure {
            stage: FetchStage::History,
            message: "connection refused".to_string(),
        };
        assert_eq!(
            failure.to_string(),
            "history fetch failed: connection refused"
        );
    }

    #[test]
    fn test_status_error_display() {
        let err = Error::Status {
            status: 404,
            url: "http://localhost:8080/api/watcher/watch/w1".to_string(),
        };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("/api/watcher/watch/w1"));
    }
}
