//! Reusable UI components shared across views.

pub mod status_led;
pub mod trend;

pub use status_led::{StatusLedState, status_led};
pub use trend::Trend;
