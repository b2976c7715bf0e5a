//! Delivery Countdown - tracks an order through preparation and delivery
//! 
//! This library provides the countdown engine that derives a remaining-time
//! estimate for the active order, ticks it down once a minute, and exposes
//! it to display consumers over an HTTP API.

pub mod config;
pub mod state;
pub mod api;
pub mod tasks;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use state::{AppState, CountdownEngine, OrderData, OrderStatus, OrderType, Phase, TimerState};
pub use api::create_router;
pub use utils::signals::shutdown_signal;
