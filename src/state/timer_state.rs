//! Timer state structure and the countdown reducers
//!
//! All transitions are pure functions of the current state (plus a wall-clock
//! reading where one is needed), so the ticker and the engine commands always
//! operate on the authoritative state rather than a captured copy.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::order::{OrderData, OrderType};

/// Minimum countdown value in minutes, shared by both phases
pub const FLOOR_MINUTES: f64 = 2.0;

/// Which leg of the order's journey is being counted down
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    #[default]
    Preparation,
    Delivery,
}

/// Last known order status. Unknown strings are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Preparing,
    Prepared,
    OutForDelivery,
    Delivery,
    Ready,
    Delivered,
    Collected,
    Cancelled,
    Other(String),
}

impl OrderStatus {
    pub fn as_str(&self) -> &str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Prepared => "prepared",
            OrderStatus::OutForDelivery => "out_for_delivery",
            OrderStatus::Delivery => "delivery",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Collected => "collected",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Other(raw) => raw,
        }
    }

    /// Whether the order has left the kitchen
    pub fn is_out_for_delivery(&self) -> bool {
        matches!(self, OrderStatus::OutForDelivery | OrderStatus::Delivery)
    }
}

impl From<&str> for OrderStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "pending" => OrderStatus::Pending,
            "confirmed" => OrderStatus::Confirmed,
            "preparing" => OrderStatus::Preparing,
            "prepared" => OrderStatus::Prepared,
            "out_for_delivery" => OrderStatus::OutForDelivery,
            "delivery" => OrderStatus::Delivery,
            "ready" => OrderStatus::Ready,
            "delivered" => OrderStatus::Delivered,
            "collected" => OrderStatus::Collected,
            "cancelled" => OrderStatus::Cancelled,
            other => OrderStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(raw: String) -> Self {
        OrderStatus::from(raw.as_str())
    }
}

impl From<OrderStatus> for String {
    fn from(status: OrderStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of a single tick, used for logging by the ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// The countdown was not running
    Idle,
    /// Counted down one minute
    Decremented,
    /// Preparation budget exhausted, delivery phase begun
    EnteredDelivery,
    /// Reached the floor; the countdown stopped
    ReachedFloor,
}

/// Countdown state for the active order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub is_active: bool,
    pub total_time: f64,
    pub preparation_time: f64,
    pub delivery_time: f64,
    pub time_remaining: f64,
    pub order_status: OrderStatus,
    pub order_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub phase: Phase,
    pub order_type: OrderType,
}

impl TimerState {
    /// Create a new inactive timer state
    pub fn new() -> Self {
        Self {
            is_active: false,
            total_time: 0.0,
            preparation_time: 0.0,
            delivery_time: 0.0,
            time_remaining: 0.0,
            order_status: OrderStatus::Pending,
            order_id: None,
            start_time: None,
            phase: Phase::Preparation,
            order_type: OrderType::Delivery,
        }
    }

    /// Reconstruct an active countdown for `order` as seen at `now`
    pub fn started(order: &OrderData, now: DateTime<Utc>) -> Self {
        let preparation_time = order.preparation_minutes();
        let delivery_time = order.delivery_minutes();
        let start_time = order.start_time.unwrap_or(now);
        let elapsed = order
            .start_time
            .map_or(0.0, |started| elapsed_minutes(started, now));

        let (total_time, phase, time_remaining) = match order.order_type {
            OrderType::Collection => (
                preparation_time,
                Phase::Preparation,
                (preparation_time - elapsed).max(FLOOR_MINUTES),
            ),
            OrderType::Delivery => {
                let total_time = preparation_time + delivery_time;
                let in_transit =
                    delivery_remaining(preparation_time, delivery_time, elapsed);

                if order.status.is_out_for_delivery() {
                    (total_time, Phase::Delivery, in_transit)
                } else {
                    let remaining = (total_time - elapsed).max(delivery_time);
                    if remaining <= delivery_time {
                        (total_time, Phase::Delivery, in_transit)
                    } else {
                        (total_time, Phase::Preparation, remaining)
                    }
                }
            }
        };

        Self {
            is_active: true,
            total_time,
            preparation_time,
            delivery_time,
            time_remaining,
            order_status: order.status.clone(),
            order_id: Some(order.order_id.clone()),
            start_time: Some(start_time),
            phase,
            order_type: order.order_type,
        }
    }

    /// Advance the countdown by one minute
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_active {
            return TickOutcome::Idle;
        }

        let next = self.time_remaining - 1.0;
        match self.phase {
            Phase::Preparation if next <= FLOOR_MINUTES => {
                self.stop_at_floor();
                TickOutcome::ReachedFloor
            }
            Phase::Preparation
                if self.order_type == OrderType::Delivery && next <= self.delivery_time =>
            {
                self.phase = Phase::Delivery;
                self.time_remaining = self.delivery_time;
                TickOutcome::EnteredDelivery
            }
            Phase::Delivery if next <= FLOOR_MINUTES => {
                self.stop_at_floor();
                TickOutcome::ReachedFloor
            }
            _ => {
                self.time_remaining = next;
                TickOutcome::Decremented
            }
        }
    }

    /// Record a new order status, resuming or ending the countdown as needed.
    ///
    /// Returns `true` when the delivery phase was resumed and the ticker must
    /// be restarted.
    pub fn apply_status(&mut self, status: OrderStatus, now: DateTime<Utc>) -> bool {
        let resumed = status.is_out_for_delivery() && self.awaiting_hand_off();
        if resumed {
            self.phase = Phase::Delivery;
            self.is_active = true;
            self.start_time = Some(now);
        }

        if status == OrderStatus::Delivered {
            self.is_active = false;
        }

        self.order_status = status;
        resumed
    }

    /// A delivery order whose preparation has finished and is waiting for
    /// the courier. The idle default state never qualifies.
    pub fn awaiting_hand_off(&self) -> bool {
        self.order_type == OrderType::Delivery
            && self.order_id.is_some()
            && self.phase == Phase::Preparation
            && !self.is_active
            && self.time_remaining >= FLOOR_MINUTES
            && self.time_remaining == self.delivery_time
    }

    /// Whether this state already counts down `order_id`
    pub fn is_running_for(&self, order_id: &str) -> bool {
        self.is_active && self.order_id.as_deref() == Some(order_id)
    }

    /// Display string: `"1h 15m"` from an hour up, otherwise `"45m"`
    pub fn formatted_time(&self) -> String {
        let remaining = self.time_remaining;
        if remaining >= 60.0 {
            let hours = (remaining / 60.0).floor();
            let minutes = (remaining % 60.0).round();
            format!("{}h {}m", hours as u64, minutes as u64)
        } else {
            format!("{}m", remaining.round() as u64)
        }
    }

    pub fn should_show_timer(&self) -> bool {
        self.time_remaining > 0.0 && self.order_status != OrderStatus::Pending
    }

    fn stop_at_floor(&mut self) {
        self.time_remaining = FLOOR_MINUTES;
        self.is_active = false;
    }
}

impl Default for TimerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Whole minutes between `started` and `now`, never negative
fn elapsed_minutes(started: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let millis = (now - started).num_milliseconds();
    millis.div_euclid(60_000).max(0) as f64
}

/// Remaining delivery time once `elapsed` minutes have passed since the order started
fn delivery_remaining(preparation_time: f64, delivery_time: f64, elapsed: f64) -> f64 {
    let delivery_elapsed = (elapsed - preparation_time).max(0.0);
    (delivery_time - delivery_elapsed).max(FLOOR_MINUTES)
}
