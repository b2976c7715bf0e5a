//! API request and response structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::state::{AppState, OrderStatus, TimerState};

/// Body of POST /timer/status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: OrderStatus,
}

/// Countdown view returned by every timer endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerView {
    pub timer: TimerState,
    pub formatted_time: String,
    pub show_timer: bool,
    pub timestamp: DateTime<Utc>,
    pub uptime: String,
    pub last_action: Option<String>,
    pub last_action_time: Option<DateTime<Utc>>,
}

impl TimerView {
    /// Build a view from the current engine state
    pub fn capture(state: &AppState) -> Self {
        let timer = state.engine.snapshot();
        let (last_action, last_action_time) = state.get_last_action();

        Self {
            formatted_time: timer.formatted_time(),
            show_timer: timer.should_show_timer(),
            timer,
            timestamp: Utc::now(),
            uptime: state.get_uptime(),
            last_action,
            last_action_time,
        }
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    /// Create a new health response
    pub fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
