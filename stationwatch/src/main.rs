//! StationWatch - Desktop dashboard for the SS13 community hub.
//!
//! Polls the hub REST API for server listings and player statistics and
//! renders them as a live dashboard with history charts.

use anyhow::Context;
use iced::application;

use stationwatch::app::{StationWatch, default_config_path};
use stationwatch_common::{AppConfig, init_tracing, load_config};

fn main() -> anyhow::Result<()> {
    // Logging is configured from the same file the app later loads
    let logging = default_config_path()
        .filter(|path| path.exists())
        .and_then(|path| load_config(path).ok())
        .map(|config: AppConfig| config.logging)
        .unwrap_or_default();
    init_tracing(&logging).context("Failed to initialize tracing")?;

    tracing::info!("Starting StationWatch");
    if std::env::args().any(|arg| arg == "--demo") {
        tracing::info!("Running in demo mode");
    }

    // Run the Iced application
    application(StationWatch::boot, StationWatch::update, StationWatch::view)
        .title(StationWatch::title)
        .subscription(StationWatch::subscription)
        .theme(StationWatch::theme)
        .run()
        .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
