use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Hub API connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HubConfig {
    /// Base URL of the hub API.
    #[serde(default = "default_hub_url")]
    pub url: String,

    /// Seconds between server list refreshes.
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,

    /// Seconds without a poller update before a server is flagged stale.
    #[serde(default = "default_stale_secs")]
    pub stale_secs: i64,

    /// Request timeout for hub API calls, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_hub_url() -> String {
    "https://hub.cm-ss13.com".to_string()
}

fn default_refresh_secs() -> u64 {
    30
}

fn default_stale_secs() -> i64 {
    300
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            url: default_hub_url(),
            refresh_secs: default_refresh_secs(),
            stale_secs: default_stale_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Plain text for a terminal (default).
    #[default]
    Text,
    /// One JSON object per line, for log collectors.
    Json,
}

/// Logging section of the config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default level when `RUST_LOG` is unset: "trace" through "error".
    #[serde(default = "default_level")]
    pub level: String,

    /// Rendering of log output.
    #[serde(default)]
    pub format: LogFormat,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: LogFormat::Text,
        }
    }
}

/// Display preferences, loaded at startup and written back whenever the
/// user toggles one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    /// Show the raw hub status line instead of the server name.
    #[serde(default)]
    pub show_status: bool,

    /// Keep servers that failed their last poll in the list.
    #[serde(default = "default_true")]
    pub show_offline: bool,
}

fn default_true() -> bool {
    true
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            show_status: false,
            show_offline: default_true(),
        }
    }
}

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Hub API settings.
    #[serde(default)]
    pub hub: HubConfig,

    /// Logging section.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Display preferences.
    #[serde(default)]
    pub prefs: Preferences,
}

/// Read a JSON5 configuration file.
pub fn load_config<T: for<'de> Deserialize<'de>>(path: impl AsRef<Path>) -> Result<T> {
    let path = path.as_ref();
    let raw = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("cannot read '{}': {}", path.display(), e)))?;
    json5::from_str(&raw)
        .map_err(|e| Error::Config(format!("bad config in '{}': {}", path.display(), e)))
}

/// Parse a configuration from a JSON5 string.
pub fn parse_config<T: for<'de> Deserialize<'de>>(raw: &str) -> Result<T> {
    json5::from_str(raw).map_err(|e| Error::Config(format!("bad config: {}", e)))
}

/// Write a configuration file, creating parent directories as needed.
///
/// Written as pretty-printed JSON, which is valid JSON5 and round-trips
/// through [`load_config`].
pub fn save_config<T: Serialize>(path: impl AsRef<Path>, config: &T) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            Error::Config(format!("cannot create '{}': {}", parent.display(), e))
        })?;
    }

    let rendered = serde_json::to_string_pretty(config)?;
    std::fs::write(path, rendered)
        .map_err(|e| Error::Config(format!("cannot write '{}': {}", path.display(), e)))
}
