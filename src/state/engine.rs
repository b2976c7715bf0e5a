//! Delivery countdown engine
//!
//! The engine is the single writer of the [`TimerState`]. Display consumers
//! read snapshots or subscribe to the watch channel; they never mutate.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};
use chrono::{DateTime, Utc};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info};

use crate::tasks::countdown_ticker_task;
use super::{
    order::OrderData,
    timer_state::{OrderStatus, TickOutcome, TimerState},
};

/// Timer state plus the session it belongs to
#[derive(Debug)]
struct TimerSlot {
    state: TimerState,
    /// Bumped whenever a command replaces or resumes the countdown
    session: u64,
}

/// State shared between the engine and its ticker task
#[derive(Debug)]
pub struct SharedTimer {
    slot: Mutex<TimerSlot>,
    updates: watch::Sender<TimerState>,
}

impl SharedTimer {
    fn new() -> Self {
        let (updates, _) = watch::channel(TimerState::new());
        Self {
            slot: Mutex::new(TimerSlot {
                state: TimerState::new(),
                session: 0,
            }),
            updates,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TimerSlot> {
        // The slot holds plain data that is consistent between statements,
        // so a panic elsewhere cannot leave it half-written.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mutate the slot and publish the resulting state if it changed
    fn with_slot<R>(&self, f: impl FnOnce(&mut TimerSlot) -> R) -> R {
        let mut slot = self.lock();
        let before = slot.state.clone();
        let result = f(&mut *slot);
        if slot.state != before {
            self.updates.send_replace(slot.state.clone());
        }
        result
    }

    pub fn snapshot(&self) -> TimerState {
        self.lock().state.clone()
    }

    /// Apply one tick if `session` is still current.
    ///
    /// Returns `None` when the countdown has been replaced or stopped since
    /// the ticker was spawned.
    pub fn tick(&self, session: u64) -> Option<(TickOutcome, f64)> {
        self.with_slot(|slot| {
            if slot.session != session {
                return None;
            }
            let outcome = slot.state.tick();
            Some((outcome, slot.state.time_remaining))
        })
    }
}

/// The running ticker and the newest session it has been asked to serve
#[derive(Debug, Default)]
struct Ticker {
    session: u64,
    handle: Option<JoinHandle<()>>,
}

/// Re-entrancy guard held for the duration of a start
struct StartGuard<'a>(&'a AtomicBool);

impl<'a> StartGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for StartGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Owns the countdown for the active order and drives its ticker.
///
/// Commands must be issued from within a Tokio runtime, since starting or
/// resuming the countdown spawns the ticker task.
#[derive(Debug)]
pub struct CountdownEngine {
    shared: Arc<SharedTimer>,
    starting: AtomicBool,
    ticker: Mutex<Ticker>,
    tick_period: Duration,
}

impl CountdownEngine {
    /// Create an idle engine. `tick_period` is the real time between
    /// one-minute countdown steps.
    pub fn new(tick_period: Duration) -> Self {
        Self {
            shared: Arc::new(SharedTimer::new()),
            starting: AtomicBool::new(false),
            ticker: Mutex::new(Ticker::default()),
            tick_period,
        }
    }

    /// Start counting down `order`. A no-op while another start is in
    /// progress or when `order` is already being counted down.
    pub fn start_timer(&self, order: OrderData) {
        self.start_timer_at(order, Utc::now());
    }

    /// Like [`start_timer`](Self::start_timer) with an explicit wall-clock reading
    pub fn start_timer_at(&self, order: OrderData, now: DateTime<Utc>) {
        let Some(_guard) = StartGuard::acquire(&self.starting) else {
            debug!("Start already in progress, ignoring start for order {}", order.order_id);
            return;
        };

        let started = self.shared.with_slot(|slot| {
            if slot.state.is_running_for(&order.order_id) {
                return None;
            }
            slot.state = TimerState::started(&order, now);
            slot.session += 1;
            Some((slot.session, slot.state.clone()))
        });

        let Some((session, state)) = started else {
            debug!("Countdown already running for order {}", order.order_id);
            return;
        };

        info!(
            "Started countdown for order {} ({:?}): phase={:?}, remaining={}min, total={}min",
            order.order_id, order.order_type, state.phase, state.time_remaining, state.total_time
        );
        self.spawn_ticker(session);
    }

    /// Record a status change from the order source
    pub fn update_order_status(&self, status: impl Into<OrderStatus>) {
        self.update_order_status_at(status, Utc::now());
    }

    /// Like [`update_order_status`](Self::update_order_status) with an explicit wall-clock reading
    pub fn update_order_status_at(&self, status: impl Into<OrderStatus>, now: DateTime<Utc>) {
        let status = status.into();
        debug!("Order status update: {}", status);

        let resumed = self.shared.with_slot(|slot| {
            if !slot.state.apply_status(status, now) {
                return None;
            }
            slot.session += 1;
            Some((slot.session, slot.state.time_remaining))
        });

        if let Some((session, remaining)) = resumed {
            info!("Order out for delivery, resuming countdown at {}min", remaining);
            self.spawn_ticker(session);
        }
    }

    /// Cancel the ticker and reset to the idle defaults
    pub fn stop_timer(&self) {
        let session = self.shared.with_slot(|slot| {
            slot.state = TimerState::new();
            slot.session += 1;
            slot.session
        });
        self.retire_ticker(session);
        info!("Countdown stopped");
    }

    /// Current countdown state
    pub fn snapshot(&self) -> TimerState {
        self.shared.snapshot()
    }

    /// Receive every published state change
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.shared.updates.subscribe()
    }

    pub fn formatted_time(&self) -> String {
        self.snapshot().formatted_time()
    }

    pub fn should_show_timer(&self) -> bool {
        self.snapshot().should_show_timer()
    }

    fn ticker(&self) -> MutexGuard<'_, Ticker> {
        self.ticker.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a ticker for `session` unless a newer session already owns the slot.
    ///
    /// Commands bump the session under the state lock but reach this point
    /// after releasing it, so two commands can arrive here out of order.
    fn spawn_ticker(&self, session: u64) {
        let mut ticker = self.ticker();
        if session < ticker.session {
            debug!("Not spawning ticker for stale session {} (current {})", session, ticker.session);
            return;
        }

        let handle = tokio::spawn(countdown_ticker_task(
            Arc::clone(&self.shared),
            session,
            self.tick_period,
        ));
        if let Some(previous) = ticker.handle.replace(handle) {
            previous.abort();
        }
        ticker.session = session;
    }

    /// Abort the running ticker on behalf of `session`
    fn retire_ticker(&self, session: u64) {
        let mut ticker = self.ticker();
        if session < ticker.session {
            return;
        }
        if let Some(handle) = ticker.handle.take() {
            handle.abort();
        }
        ticker.session = session;
    }
}

impl Drop for CountdownEngine {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker().handle.take() {
            handle.abort();
        }
    }
}
