//! StationWatch Common Library
//!
//! Shared types and utilities for the StationWatch hub dashboard:
//!
//! - [`server`] - Hub data model (`GameServer`, `TopicStatus`, round enums)
//! - [`stats`] - Player statistics (`PeriodStats`) and chart view-models
//! - [`format`] - Duration, countdown, relative-time and count formatting
//! - [`client`] - HTTP client for the hub API
//! - [`config`] - Configuration loading and saving (JSON5 format)
//! - [`error`] - Error types

pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod server;
pub mod stats;

// Commonly used types, re-exported at the root
pub use client::HubClient;
pub use config::{
    AppConfig, HubConfig, LogFormat, LoggingConfig, Preferences, load_config, parse_config,
    save_config,
};
pub use error::{Error, Result};
pub use format::{
    format_count, format_duration, format_duration_deciseconds, format_relative_time,
    format_relative_time_at, format_shuttle_timer, parse_as_utc,
};
pub use server::{GameServer, SecurityLevel, ShuttleMode, TopicStatus};
pub use stats::{
    HistoryPoint, Period, PeriodStats, WEEKDAYS, history_points, hourly_points,
    local_utc_offset_hours, round1, to_local_hourly, weekday_points,
};

/// Install the global tracing subscriber.
///
/// The configured level applies unless `RUST_LOG` overrides it; the JSON
/// format emits one object per line for log collectors. Fails if a
/// subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Text => registry.with(fmt::layer()).try_init(),
        LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
    }
    .map_err(|e| Error::Config(format!("cannot install tracing subscriber: {}", e)))
}
