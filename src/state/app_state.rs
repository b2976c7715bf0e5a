//! Server-level application state

use std::{
    sync::{Mutex, PoisonError},
    time::{Duration, Instant},
};
use chrono::{DateTime, Utc};

use super::CountdownEngine;

/// Last command received by the server
#[derive(Debug, Clone, Default)]
struct LastAction {
    action: Option<String>,
    at: Option<DateTime<Utc>>,
}

/// Application state shared by all HTTP handlers
#[derive(Debug)]
pub struct AppState {
    /// The countdown for the active order session
    pub engine: CountdownEngine,
    /// Server metadata
    pub start_time: Instant,
    pub port: u16,
    pub host: String,
    last_action: Mutex<LastAction>,
}

impl AppState {
    /// Create a new AppState with an idle countdown engine
    pub fn new(port: u16, host: String, tick_period: Duration) -> Self {
        Self {
            engine: CountdownEngine::new(tick_period),
            start_time: Instant::now(),
            port,
            host,
            last_action: Mutex::new(LastAction::default()),
        }
    }

    /// Remember the latest command for status reporting
    pub fn record_action(&self, action: &str) {
        let mut last = self.last_action.lock().unwrap_or_else(PoisonError::into_inner);
        last.action = Some(action.to_string());
        last.at = Some(Utc::now());
    }

    /// Get last action information
    pub fn get_last_action(&self) -> (Option<String>, Option<DateTime<Utc>>) {
        let last = self.last_action.lock().unwrap_or_else(PoisonError::into_inner);
        (last.action.clone(), last.at)
    }

    /// Calculate server uptime as a formatted string
    pub fn get_uptime(&self) -> String {
        format_uptime(self.start_time.elapsed())
    }
}

fn format_uptime(duration: Duration) -> String {
    let hours = duration.as_secs() / 3600;
    let minutes = (duration.as_secs() % 3600) / 60;
    let seconds = duration.as_secs() % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uptime_formatting() {
        assert_eq!(format_uptime(Duration::from_secs(42)), "42s");
        assert_eq!(format_uptime(Duration::from_secs(125)), "2m 5s");
        assert_eq!(format_uptime(Duration::from_secs(3 * 3600 + 61)), "3h 1m 1s");
    }

    #[test]
    fn records_last_action() {
        let state = AppState::new(0, "127.0.0.1".to_string(), Duration::from_secs(60));
        assert_eq!(state.get_last_action().0, None);

        state.record_action("start");
        let (action, at) = state.get_last_action();
        assert_eq!(action.as_deref(), Some("start"));
        assert!(at.is_some());
    }
}
