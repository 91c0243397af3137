//! Configuration management.
//!
//! watchmon configuration can come from:
//! - Environment variables (WATCHMON_*)
//! - Config file (~/.config/watchmon/config.toml)
//!
//! CLI flags override both.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// watchmon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Watcher server to connect to
    #[serde(default)]
    pub server: ServerConfig,
}

/// Watcher server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Base URL of the watcher REST API
    #[serde(default = "default_url")]
    pub url: String,

    /// Bearer token sent with every request
    #[serde(default)]
    pub token: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            token: None,
        }
    }
}

fn default_url() -> String {
    "http://localhost:8080".to_string()
}

impl Config {
    /// Load configuration from default locations.
    pub fn load() -> Self {
        let mut config = Self::default();

        let path = Self::config_dir().join("config.toml");
        if let Ok(partial) = Self::load_partial_from_path(&path) {
            config.apply_partial(partial);
        }

        config.apply_env_overrides();
        config
    }

    /// Get the config directory.
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|d| d.join("watchmon"))
            .unwrap_or_else(|| PathBuf::from(".watchmon"))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("WATCHMON_SERVER_URL") {
            self.server.url = url;
        }
        if let Ok(token) = std::env::var("WATCHMON_SERVER_TOKEN") {
            self.server.token = Some(token);
        }
    }

    fn load_partial_from_path(path: &Path) -> std::result::Result<PartialConfig, ()> {
        let content = std::fs::read_to_string(path).map_err(|_| ())?;
        toml::from_str(&content).map_err(|_| ())
    }

    fn apply_partial(&mut self, partial: PartialConfig) {
        if let Some(server) = partial.server {
            self.server = server;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct PartialConfig {
    server: Option<ServerConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.server.url, "http://localhost:8080");
        assert!(config.server.token.is_none());
    }

    #[test]
    fn test_parse_partial_toml() {
        let partial: PartialConfig = toml::from_str(
            r#"
            [server]
            url = "https://watcher.internal:9443"
            token = "secret"
            "#,
        )
        .unwrap();
        let mut config = Config::default();
        config.apply_partial(partial);
        assert_eq!(config.server.url, "https://watcher.internal:9443");
        assert_eq!(config.server.token.as_deref(), Some("secret"));
    }

    #[test]
    fn test_missing_server_section_keeps_defaults() {
        let partial: PartialConfig = toml::from_str("").unwrap();
        let mut config = Config::default();
        config.apply_partial(partial);
        assert_eq!(config.server.url, "http://localhost:8080");
    }
}
