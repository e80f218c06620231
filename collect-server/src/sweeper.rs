//! Stale-order sweep
//!
//! Periodic maintenance pass with three duties:
//! 1. auto-cancel PENDING orders older than the configured timeout
//! 2. release expired offer reservations
//! 3. eagerly resolve expired availability timers
//!
//! `sweep(now)` takes the clock as an explicit parameter and is idempotent -
//! any external trigger (interval task, message, manual call) may invoke it.
//! Auto-cancels go through regular lifecycle commands, so each one is its own
//! atomic conditional commit; an order that a kitchen accepts while the sweep
//! is running simply loses the race and stays accepted.

use crate::availability::AvailabilityController;
use crate::lifecycle::LifecycleManager;
use shared::order::{ActorRole, OrderCommand, OrderCommandPayload, OrderStatus};
use std::sync::Arc;

/// Outcome of one sweep pass
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SweepReport {
    /// Orders auto-cancelled this pass
    pub auto_cancelled: Vec<String>,
    /// Expired offer reservations released
    pub reservations_released: usize,
    /// Shops whose timed sub-state expired and reverted to OPEN
    pub timers_resolved: usize,
}

/// The sweeper
pub struct StaleOrderSweeper {
    manager: Arc<LifecycleManager>,
    availability: Arc<AvailabilityController>,
}

impl StaleOrderSweeper {
    pub fn new(manager: Arc<LifecycleManager>, availability: Arc<AvailabilityController>) -> Self {
        Self {
            manager,
            availability,
        }
    }

    /// Run one full sweep pass at the given clock value
    pub fn sweep(&self, now: i64) -> SweepReport {
        let auto_cancelled = self.sweep_stale_orders(now);
        let reservations_released = self.availability.reservations().sweep_expired(now);
        let timers_resolved = self.availability.resolve_timers(now);

        if !auto_cancelled.is_empty() || reservations_released > 0 || timers_resolved > 0 {
            tracing::info!(
                auto_cancelled = auto_cancelled.len(),
                reservations_released,
                timers_resolved,
                "sweep pass applied changes"
            );
        }

        SweepReport {
            auto_cancelled,
            reservations_released,
            timers_resolved,
        }
    }

    /// Auto-cancel PENDING orders whose age strictly exceeds the timeout
    pub fn sweep_stale_orders(&self, now: i64) -> Vec<String> {
        let timeout_ms = self.manager.settings().pending_timeout_minutes as i64 * 60_000;

        let open_ids = match self.manager.storage().get_open_order_ids(None) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::error!(error = %e, "sweep could not list open orders");
                return Vec::new();
            }
        };

        let mut cancelled = Vec::new();
        for order_id in open_ids {
            let order = match self.manager.get_order(&order_id) {
                Ok(Some(order)) => order,
                _ => continue,
            };
            if order.status != OrderStatus::Pending || now - order.created_at <= timeout_ms {
                continue;
            }

            // The sweep clock rides on the command timestamp so the cutoff
            // check inside the action matches this pass
            let cmd = OrderCommand {
                command_id: uuid::Uuid::new_v4().to_string(),
                actor: ActorRole::Sweeper,
                actor_id: "sweeper".to_string(),
                timestamp: now,
                payload: OrderCommandPayload::AutoCancel {
                    order_id: order_id.clone(),
                },
            };
            let response = self.manager.execute_command(cmd);
            if response.success {
                cancelled.push(order_id);
            } else {
                // Lost a race against a kitchen action; nothing to do
                tracing::debug!(order_id = %order_id, "auto-cancel skipped: {:?}", response.error);
            }
        }
        cancelled
    }
}
