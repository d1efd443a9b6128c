//! View components for the StationWatch application.

pub mod chart;
pub mod components;
pub mod dashboard;
pub mod formatting;
pub mod overview;
pub mod server;
pub mod settings;
pub mod stats;
pub mod theme;
