//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{extract::State, response::Json};
use tracing::info;

use crate::state::{AppState, OrderData};
use super::responses::{HealthResponse, StatusUpdate, TimerView};

/// Handle GET /timer - Return the current countdown
pub async fn timer_handler(State(state): State<Arc<AppState>>) -> Json<TimerView> {
    Json(TimerView::capture(&state))
}

/// Handle POST /timer/start - Start counting down an order
pub async fn start_handler(
    State(state): State<Arc<AppState>>,
    Json(order): Json<OrderData>,
) -> Json<TimerView> {
    info!("Start endpoint called for order {}", order.order_id);
    state.record_action("start");
    state.engine.start_timer(order);
    Json(TimerView::capture(&state))
}

/// Handle POST /timer/status - Record an order status change
pub async fn order_status_handler(
    State(state): State<Arc<AppState>>,
    Json(update): Json<StatusUpdate>,
) -> Json<TimerView> {
    info!("Status endpoint called with status {}", update.status);
    state.record_action("status");
    state.engine.update_order_status(update.status);
    Json(TimerView::capture(&state))
}

/// Handle POST /timer/stop - Reset the countdown
pub async fn stop_handler(State(state): State<Arc<AppState>>) -> Json<TimerView> {
    info!("Stop endpoint called");
    state.record_action("stop");
    state.engine.stop_timer();
    Json(TimerView::capture(&state))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
