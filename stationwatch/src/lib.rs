//! StationWatch - Desktop dashboard for the SS13 community hub.
//!
//! Library form of the application so integration tests can drive it.

pub mod app;
pub mod demo;
pub mod fetch;
pub mod message;
pub mod mock;
pub mod view;

pub use app::StationWatch;
pub use message::{Message, ServerTarget};
