//! Background tasks module
//! 
//! This module contains the background task that advances the countdown.

pub mod countdown_ticker;

// Re-export main functions
pub use countdown_ticker::countdown_ticker_task;
