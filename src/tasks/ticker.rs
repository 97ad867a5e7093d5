//! Repeating timer with an explicit cancel

use std::time::Duration;
use tokio::{
    task::JoinHandle,
    time::{interval_at, Instant, MissedTickBehavior},
};
use tracing::debug;

/// Calls a callback once per period until cancelled or dropped.
///
/// The first call happens one full period after `start`.
#[derive(Debug)]
pub struct RepeatingTimer {
    handle: JoinHandle<()>,
}

impl RepeatingTimer {
    /// Must be called from within a tokio runtime
    pub fn start<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let handle = tokio::spawn(async move {
            loop {
                interval.tick().await;
                on_tick();
            }
        });
        debug!("Repeating timer started with period {:?}", period);
        Self { handle }
    }

    /// Stop the schedule. No callback runs after this returns, unless one
    /// is executing on another worker thread at this very moment.
    pub fn cancel(self) {
        self.handle.abort();
        debug!("Repeating timer cancelled");
    }
}

impl Drop for RepeatingTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
