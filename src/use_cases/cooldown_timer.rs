// Recurring countdown for the jump drive, owned by whoever spawned it.
//
// Dropping the handle cancels the task, so no tick outlives its owner. A new
// last-jump timestamp means a new timer: drop the old handle and spawn again.

use crate::domain::cooldown::CooldownTracker;
use crate::domain::ports::Clock;
use chrono::{DateTime, Utc};
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

// Floor for the tick period; tokio rejects a zero interval.
const MIN_TICK_INTERVAL: Duration = Duration::from_millis(1);

pub struct CooldownTimer {
    remaining_rx: watch::Receiver<f64>,
    task: JoinHandle<()>,
}

impl CooldownTimer {
    /// Starts ticking every `tick_interval` until the window after `last_jump_at` has passed.
    ///
    /// `on_complete` runs exactly once, on the tick where the countdown reaches zero.
    pub fn spawn<C, F>(
        last_jump_at: DateTime<Utc>,
        window: Duration,
        tick_interval: Duration,
        clock: C,
        on_complete: F,
    ) -> Self
    where
        C: Clock + 'static,
        F: FnOnce() + Send + 'static,
    {
        let mut tracker = CooldownTracker::new(window);
        tracker.observe(Some(last_jump_at));
        let (remaining_tx, remaining_rx) = watch::channel(tracker.remaining_at(clock.now()));

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(tick_interval.max(MIN_TICK_INTERVAL));
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            let mut on_complete = Some(on_complete);

            loop {
                interval.tick().await;
                let tick = tracker.tick(clock.now());
                let _ = remaining_tx.send(tick.remaining_secs);

                if tick.completed {
                    debug!(%last_jump_at, "jump drive recharged");
                    if let Some(callback) = on_complete.take() {
                        callback();
                    }
                    break;
                }
            }
        });

        Self { remaining_rx, task }
    }

    /// Seconds left as of the latest tick.
    pub fn remaining(&self) -> f64 {
        *self.remaining_rx.borrow()
    }

    /// Receiver that changes on every tick, for re-rendering a countdown.
    pub fn subscribe(&self) -> watch::Receiver<f64> {
        self.remaining_rx.clone()
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for CooldownTimer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
