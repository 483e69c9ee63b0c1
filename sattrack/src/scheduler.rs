//! The two refresh cycles.
//!
//! The slow cycle retrieves element sets, the fast cycle recomputes the
//! published state. Both run as local tasks on a single thread, so a tick
//! never observes a half-replaced store, and a tick runs to completion
//! before the next one starts.

use std::rc::Rc;
use tletypes::prelude::*;
use tokio::{
    sync::watch,
    task::{self, JoinHandle},
    time::{self, MissedTickBehavior},
};
use tracing::{info, warn};

use crate::{
    source::ElementSource,
    system::Tracker,
    units::{Time, Timestamp},
    PeriodicComponent,
};

/// Period of the recompute cycle
pub const FAST_PERIOD: Time = Time::from_secs(5.0);

/// Period of the element retrieval cycle
pub const SLOW_PERIOD: Time = Time::from_secs(6.0 * 60.0 * 60.0);

/// Source of the current instant handed to propagation
pub trait Clock {
    fn now(&self) -> Timestamp;
}

#[derive(Copy, Clone, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

/// Handle to the running cycles. Dropping it stops them.
#[derive(Debug)]
pub struct RefreshScheduler {
    slow: JoinHandle<()>,
    fast: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Spawns both cycles onto the current `LocalSet`. Each fires
    /// immediately, then on its period.
    ///
    /// The fast cycle also fires right after an observer change and after
    /// every successful retrieval.
    pub fn spawn<S, C>(
        tracker: Rc<Tracker>,
        source: S,
        observer: watch::Receiver<Option<ObserverLocation>>,
        clock: C,
    ) -> Self
    where
        S: ElementSource + 'static,
        C: Clock + Clone + 'static,
    {
        info!(
            fast_period = ?FAST_PERIOD,
            slow_period = ?SLOW_PERIOD,
            "Starting refresh cycles"
        );
        let slow = task::spawn_local(slow_cycle(tracker.clone(), source, clock.clone()));
        let fast = task::spawn_local(fast_cycle(tracker, observer, clock));
        Self { slow, fast }
    }

    pub fn is_running(&self) -> bool {
        !self.slow.is_finished() || !self.fast.is_finished()
    }

    /// Stops both cycles. An in-flight retrieval is abandoned, nothing is
    /// published afterwards.
    pub async fn shutdown(mut self) {
        self.slow.abort();
        self.fast.abort();
        let _ = (&mut self.slow).await;
        let _ = (&mut self.fast).await;
        info!("Refresh cycles stopped");
    }
}

impl Drop for RefreshScheduler {
    fn drop(&mut self) {
        self.slow.abort();
        self.fast.abort();
    }
}

async fn slow_cycle<S: ElementSource, C: Clock>(tracker: Rc<Tracker>, source: S, clock: C) {
    let mut interval = time::interval(SLOW_PERIOD.as_duration());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        interval.tick().await;
        match tracker.refresh(&source, clock.now()).await {
            Ok(count) => info!(count, "Element sets retrieved"),
            Err(e) => warn!(error = %e, "Element set retrieval failed, keeping the current catalog"),
        }
    }
}

async fn fast_cycle<C: Clock>(
    tracker: Rc<Tracker>,
    mut observer: watch::Receiver<Option<ObserverLocation>>,
    clock: C,
) {
    let mut interval = time::interval(FAST_PERIOD.as_duration());
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut observer_open = true;
    loop {
        tokio::select! {
            _ = interval.tick() => {}
            changed = observer.changed(), if observer_open => {
                if changed.is_err() {
                    // Sender is gone, the last location stays in effect
                    observer_open = false;
                    continue;
                }
                interval.reset();
            }
            _ = tracker.refreshed() => interval.reset(),
        }
        let location = *observer.borrow_and_update();
        tracker.tick(clock.now(), &location);
    }
}
