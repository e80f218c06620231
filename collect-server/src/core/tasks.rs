//! Background tasks
//!
//! The sweep logic itself lives in [`crate::sweeper`] and takes `now` as a
//! parameter; this module only provides the periodic trigger.

use crate::core::ServerState;
use std::time::Duration;

/// Spawn the periodic stale-order sweep
pub fn spawn_sweeper(state: ServerState) -> tokio::task::JoinHandle<()> {
    let interval_minutes = state.config.sweep_interval_minutes.max(1);
    tokio::spawn(async move {
        let sweeper = state.sweeper();
        let mut interval = tokio::time::interval(Duration::from_secs(interval_minutes * 60));
        // The first tick fires immediately and catches up after restarts
        loop {
            interval.tick().await;
            let report = sweeper.sweep(shared::util::now_millis());
            tracing::debug!(
                auto_cancelled = report.auto_cancelled.len(),
                reservations_released = report.reservations_released,
                timers_resolved = report.timers_resolved,
                "sweep tick"
            );
        }
    })
}
