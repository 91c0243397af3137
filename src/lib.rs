//! watchmon - terminal history viewer for watch executions
//!
//! A watch is a scheduled monitoring rule evaluated by a backend watcher
//! service. watchmon connects to that service's REST API and renders the
//! trailing hour of a watch's execution history as a sortable, paginated
//! table, with a flyout showing per-action status and the raw execution
//! payload for any selected entry.
//!
//! ## Usage
//!
//! ```text
//! watchmon history my-cluster-health-watch --url http://localhost:8080
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod tui;

pub use error::{Error, Result};
