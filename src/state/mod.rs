//! State management module
//! 
//! This module contains the countdown state, its reducers, and the engine
//! that owns it.

pub mod app_state;
pub mod engine;
pub mod order;
pub mod timer_state;

// Re-export main types
pub use app_state::AppState;
pub use engine::{CountdownEngine, SharedTimer};
pub use order::{DurationInput, OrderData, OrderType};
pub use timer_state::{OrderStatus, Phase, TickOutcome, TimerState, FLOOR_MINUTES};
