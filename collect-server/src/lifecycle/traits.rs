//! Core traits of the action/applier architecture
//!
//! - [`CommandHandler`]: validates a command against the current order state
//!   and produces events. Runs inside the write transaction.
//! - [`EventApplier`]: applies one event to an order record. PURE - the same
//!   events always rebuild the same record.
//! - [`CommandContext`]: transaction-scoped view of the order store plus the
//!   sequence allocator.

use crate::lifecycle::appliers::{
    AcceptedApplier, AlternativesResolvedApplier, AutoCancelledApplier, CancelledApplier,
    DeniedApplier, EventAction, ItemsFlaggedApplier, PickedUpApplier, PreparationStartedApplier,
    RatedApplier, ReadyMarkedApplier, SubmittedApplier, TimeAddedApplier, WeightRecordedApplier,
    WeightReviewResolvedApplier,
};
use crate::lifecycle::storage::LifecycleStorage;
use crate::reconcile::{StockError, WeightError};
use async_trait::async_trait;
use enum_dispatch::enum_dispatch;
use redb::WriteTransaction;
use shared::order::{ActorRole, Order, OrderEvent, OrderStatus};
use std::collections::HashMap;

/// Action-level errors
#[derive(Debug, thiserror::Error)]
pub enum OrderError {
    #[error("order not found: {0}")]
    OrderNotFound(String),

    #[error("action {action} is not valid while order {order_id} is {current}")]
    StateConflict {
        order_id: String,
        current: OrderStatus,
        action: &'static str,
    },

    #[error("order {order_id} is already terminal ({current})")]
    AlreadyTerminal {
        order_id: String,
        current: OrderStatus,
    },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Stock(#[from] StockError),

    #[error(transparent)]
    Weight(#[from] WeightError),

    #[error("pickup token mismatch")]
    PickupMismatch,

    #[error("rating score {0} is out of range [1, 5]")]
    RatingOutOfRange(u8),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Metadata extracted from the triggering command
#[derive(Debug, Clone)]
pub struct CommandMetadata {
    pub command_id: String,
    pub actor: ActorRole,
    pub actor_id: String,
    /// Client timestamp (audit only)
    pub timestamp: i64,
}

/// Transaction-scoped command context
///
/// Orders loaded through the context reflect events already produced by the
/// current command; the manager persists `modified_orders` on commit.
pub struct CommandContext<'a> {
    txn: &'a WriteTransaction,
    storage: &'a LifecycleStorage,
    sequence: u64,
    modified: HashMap<String, Order>,
}

impl<'a> CommandContext<'a> {
    pub fn new(txn: &'a WriteTransaction, storage: &'a LifecycleStorage, current_sequence: u64) -> Self {
        Self {
            txn,
            storage,
            sequence: current_sequence,
            modified: HashMap::new(),
        }
    }

    /// Allocate the next global sequence number
    pub fn next_sequence(&mut self) -> u64 {
        self.sequence += 1;
        self.sequence
    }

    /// Highest sequence allocated so far
    pub fn current_sequence(&self) -> u64 {
        self.sequence
    }

    /// Load an order, preferring in-flight modifications from this command
    pub fn load_order(&self, order_id: &str) -> Result<Order, OrderError> {
        if let Some(order) = self.modified.get(order_id) {
            return Ok(order.clone());
        }
        self.storage
            .get_order_txn(self.txn, order_id)
            .map_err(|e| OrderError::Storage(e.to_string()))?
            .ok_or_else(|| OrderError::OrderNotFound(order_id.to_string()))
    }

    /// Stage an updated order record for persistence at commit
    pub fn save_order(&mut self, order: Order) {
        self.modified.insert(order.order_id.clone(), order);
    }

    /// Orders modified by this command
    pub fn modified_orders(&self) -> impl Iterator<Item = &Order> {
        self.modified.values()
    }
}

/// Command handler: command in, events out
#[async_trait]
pub trait CommandHandler {
    async fn execute(
        &self,
        ctx: &mut CommandContext<'_>,
        metadata: &CommandMetadata,
    ) -> Result<Vec<OrderEvent>, OrderError>;
}

/// Event applier: pure state evolution
#[enum_dispatch]
pub trait EventApplier {
    fn apply(&self, order: &mut Order, event: &OrderEvent);
}
