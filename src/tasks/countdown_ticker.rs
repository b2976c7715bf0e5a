//! Countdown ticker background task

use std::{sync::Arc, time::Duration};
use tokio::time::{interval_at, Instant};
use tracing::{debug, info};

use crate::state::{SharedTimer, TickOutcome};

/// Background task that advances the countdown one minute per `period`.
///
/// Exits when the countdown reaches its floor, is no longer active, or has
/// been replaced by a newer session.
pub async fn countdown_ticker_task(shared: Arc<SharedTimer>, session: u64, period: Duration) {
    debug!("Starting countdown ticker for session {} (period {:?})", session, period);

    // First step lands one full period after the start
    let mut interval = interval_at(Instant::now() + period, period);

    loop {
        interval.tick().await;

        match shared.tick(session) {
            None => {
                debug!("Ticker session {} superseded, exiting", session);
                break;
            }
            Some((TickOutcome::Idle, _)) => {
                debug!("Countdown no longer active, ticker exiting");
                break;
            }
            Some((TickOutcome::Decremented, remaining)) => {
                debug!("Countdown tick: {}min remaining", remaining);
            }
            Some((TickOutcome::EnteredDelivery, remaining)) => {
                info!("Preparation complete, delivery phase started with {}min", remaining);
            }
            Some((TickOutcome::ReachedFloor, remaining)) => {
                info!("Countdown reached its {}min floor, stopping", remaining);
                break;
            }
        }
    }
}
