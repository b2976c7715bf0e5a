//! Active order data handed to the countdown engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::duration::{parse_minutes, sanitize_minutes};
use super::timer_state::OrderStatus;

/// How the order reaches the customer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderType {
    /// Picked up by the customer; only a preparation phase
    Collection,
    /// Preparation followed by a delivery phase
    #[default]
    Delivery,
}

/// A time budget as supplied by the order source: minutes or `"mm:ss"`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurationInput {
    Minutes(f64),
    Text(String),
}

impl DurationInput {
    /// Resolve to fractional minutes, degrading to 0 on bad input
    pub fn minutes(&self) -> f64 {
        match self {
            DurationInput::Minutes(minutes) => sanitize_minutes(*minutes),
            DurationInput::Text(text) => parse_minutes(text),
        }
    }
}

impl From<f64> for DurationInput {
    fn from(minutes: f64) -> Self {
        DurationInput::Minutes(minutes)
    }
}

impl From<&str> for DurationInput {
    fn from(text: &str) -> Self {
        DurationInput::Text(text.to_string())
    }
}

/// Input to `CountdownEngine::start_timer`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderData {
    pub order_id: String,
    #[serde(default, deserialize_with = "lenient_duration")]
    pub preparation_time: Option<DurationInput>,
    #[serde(default, deserialize_with = "lenient_duration")]
    pub delivery_time: Option<DurationInput>,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub start_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub order_type: OrderType,
}

impl OrderData {
    pub fn new(order_id: impl Into<String>, order_type: OrderType) -> Self {
        Self {
            order_id: order_id.into(),
            preparation_time: None,
            delivery_time: None,
            status: OrderStatus::Pending,
            start_time: None,
            order_type,
        }
    }

    pub fn preparation(mut self, time: impl Into<DurationInput>) -> Self {
        self.preparation_time = Some(time.into());
        self
    }

    pub fn delivery(mut self, time: impl Into<DurationInput>) -> Self {
        self.delivery_time = Some(time.into());
        self
    }

    pub fn status(mut self, status: impl Into<OrderStatus>) -> Self {
        self.status = status.into();
        self
    }

    pub fn started_at(mut self, start_time: DateTime<Utc>) -> Self {
        self.start_time = Some(start_time);
        self
    }

    /// Preparation budget in minutes; missing or malformed is 0
    pub fn preparation_minutes(&self) -> f64 {
        self.preparation_time.as_ref().map_or(0.0, DurationInput::minutes)
    }

    /// Delivery budget in minutes; missing or malformed is 0
    pub fn delivery_minutes(&self) -> f64 {
        self.delivery_time.as_ref().map_or(0.0, DurationInput::minutes)
    }
}

/// Accept a number or string of minutes; any other JSON value is treated as absent
fn lenient_duration<'de, D>(deserializer: D) -> Result<Option<DurationInput>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match raw {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::Number(number)) => number.as_f64().map(DurationInput::Minutes),
        Some(serde_json::Value::String(text)) => Some(DurationInput::Text(text)),
        Some(other) => {
            tracing::warn!("Ignoring non-numeric duration {}, treating as 0 minutes", other);
            None
        }
    })
}

/// Accept an ISO-8601 timestamp, null, or garbage (treated as absent)
fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    let Some(serde_json::Value::String(text)) = raw else {
        return Ok(None);
    };

    match DateTime::parse_from_rfc3339(&text) {
        Ok(parsed) => Ok(Some(parsed.with_timezone(&Utc))),
        Err(e) => {
            tracing::warn!("Ignoring unparseable order start time {:?}: {}", text, e);
            Ok(None)
        }
    }
}
