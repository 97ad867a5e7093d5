//! Countdown label task

use tokio::sync::watch;
use tracing::{debug, info};

use crate::{state::TimerSnapshot, utils::label};

/// Follow timer updates and log the label a display would show
pub async fn label_task(mut updates: watch::Receiver<TimerSnapshot>) {
    let mut was_running = updates.borrow().running;

    while updates.changed().await.is_ok() {
        let snapshot = *updates.borrow_and_update();
        if snapshot.running != was_running {
            info!(
                "Timer {} ({})",
                if snapshot.running { "running" } else { "stopped" },
                label(snapshot.display_seconds)
            );
            was_running = snapshot.running;
        } else {
            debug!("{}", label(snapshot.display_seconds));
        }
    }

    debug!("Timer update channel closed, label task exiting");
}
