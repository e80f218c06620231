//! LifecycleManager - command processing and event generation
//!
//! This module handles:
//! - Command validation and processing
//! - Event generation with global sequence numbers
//! - Persistence to redb (transactional)
//! - Order record updates via event appliers
//! - Event broadcasting and notification dispatch (after commit)
//!
//! # Command Flow
//!
//! ```text
//! execute_command(cmd)
//!     ├─ 1. Idempotency check (command_id)
//!     ├─ 2. Pre-generate order id/number for Submit (own transaction)
//!     ├─ 3. Begin write transaction
//!     ├─ 4. Convert command to action and execute (re-reads order status
//!     │      inside the transaction - the conditional commit)
//!     ├─ 5. Apply events to order records via EventApplier
//!     ├─ 6. Persist events and records, maintain open index
//!     ├─ 7. Mark command processed, commit
//!     ├─ 8. Broadcast event(s), dispatch at most one notification
//!     └─ 9. Return response
//! ```
//!
//! redb serializes write transactions, so two racing transitions are applied
//! one after the other; the second re-reads the winner's status and fails its
//! guard with a state conflict instead of double-applying.

mod error;
pub use error::*;

use crate::availability::AvailabilityController;
use crate::catalog::ProductCatalog;
use crate::lifecycle::actions::{
    AutoCancelAction, CommandAction, FlagUnavailableAction, RecordWeighingAction,
    ResolveAlternativesAction, SubmitAction,
};
use crate::lifecycle::appliers::EventAction;
use crate::lifecycle::storage::{LifecycleStorage, ShopRating, StorageError};
use crate::lifecycle::traits::{CommandContext, CommandHandler, CommandMetadata, EventApplier};
use crate::notify::{Notifier, NotifyKind};
use chrono::Utc;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde_json::json;
use shared::order::{
    CommandResponse, EventPayload, Order, OrderCommand, OrderCommandPayload, OrderEvent,
    OrderEventType, OrderItem, OrderStatus, SubmittedItem,
};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Event broadcast channel capacity
const EVENT_CHANNEL_CAPACITY: usize = 16384;

/// Lifecycle tuning knobs, loaded from config at startup
#[derive(Debug, Clone)]
pub struct LifecycleSettings {
    /// Weight deviation tolerance, percent (default 10)
    pub weight_tolerance_percent: f64,
    /// PENDING orders older than this are auto-cancelled by the sweep
    pub pending_timeout_minutes: u32,
    /// Auto-cancels within the window that trigger AUTO_PAUSED
    pub auto_pause_threshold: usize,
    /// Trailing window for the auto-pause trigger, minutes
    pub auto_pause_window_minutes: i64,
}

impl Default for LifecycleSettings {
    fn default() -> Self {
        Self {
            weight_tolerance_percent: 10.0,
            pending_timeout_minutes: 60,
            auto_pause_threshold: 3,
            auto_pause_window_minutes: 30,
        }
    }
}

/// LifecycleManager for command processing
///
/// The `epoch` field is a unique identifier generated on each startup.
/// Kitchen clients use it to detect server restarts and trigger full resync.
pub struct LifecycleManager {
    storage: LifecycleStorage,
    event_tx: broadcast::Sender<OrderEvent>,
    /// Server instance epoch - unique ID generated on startup
    epoch: String,
    catalog: Arc<dyn ProductCatalog>,
    notifier: Arc<dyn Notifier>,
    /// Hook for the AUTO_PAUSED trigger; optional so the engine tests run
    /// without an availability controller
    availability: Option<Arc<AvailabilityController>>,
    /// Recent auto-cancel timestamps per shop (AUTO_PAUSED trigger input)
    auto_cancels: Arc<DashMap<String, Mutex<Vec<i64>>>>,
    settings: LifecycleSettings,
}

impl std::fmt::Debug for LifecycleManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LifecycleManager")
            .field("epoch", &self.epoch)
            .finish()
    }
}

impl LifecycleManager {
    /// Create a manager over the given storage and collaborators
    pub fn new(
        storage: LifecycleStorage,
        catalog: Arc<dyn ProductCatalog>,
        notifier: Arc<dyn Notifier>,
        settings: LifecycleSettings,
    ) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let epoch = uuid::Uuid::new_v4().to_string();
        tracing::info!(epoch = %epoch, "LifecycleManager started with new epoch");
        Self {
            storage,
            event_tx,
            epoch,
            catalog,
            notifier,
            availability: None,
            auto_cancels: Arc::new(DashMap::new()),
            settings,
        }
    }

    /// Wire the availability controller (AUTO_PAUSED entry point)
    pub fn set_availability(&mut self, availability: Arc<AvailabilityController>) {
        self.availability = Some(availability);
    }

    /// Get the server epoch (unique instance ID)
    pub fn epoch(&self) -> &str {
        &self.epoch
    }

    /// Subscribe to event broadcasts
    pub fn subscribe(&self) -> broadcast::Receiver<OrderEvent> {
        self.event_tx.subscribe()
    }

    /// Get the underlying storage
    pub fn storage(&self) -> &LifecycleStorage {
        &self.storage
    }

    /// Lifecycle settings in effect
    pub fn settings(&self) -> &LifecycleSettings {
        &self.settings
    }

    /// Generate the next order number for a shop (crash-safe via redb)
    fn next_order_number(&self, shop_id: &str) -> ManagerResult<String> {
        let count = self.storage.next_order_number(shop_id)?;
        let date_str = Utc::now().format("%Y%m%d").to_string();
        Ok(format!("ORD{}{}", date_str, 1000 + count))
    }

    /// Price submitted items against the catalog
    fn price_items(&self, items: &[SubmittedItem]) -> ManagerResult<Vec<OrderItem>> {
        let mut priced = Vec::with_capacity(items.len());
        for submitted in items {
            let product = self
                .catalog
                .get_product(submitted.product_id)
                .ok_or(ManagerError::ProductNotFound(submitted.product_id))?;
            if !product.in_stock {
                return Err(ManagerError::ProductOutOfStock(submitted.product_id));
            }
            if !product.accepts(&submitted.quantity) {
                return Err(ManagerError::Validation(format!(
                    "product {} is not sold in the submitted unit",
                    submitted.product_id
                )));
            }
            priced.push(OrderItem::new(
                format!("itm-{}", uuid::Uuid::new_v4()),
                product.product_id,
                product.name.clone(),
                submitted.quantity,
                product.unit_price_cents,
            ));
        }
        Ok(priced)
    }

    /// Execute a command and return the response
    pub fn execute_command(&self, cmd: OrderCommand) -> CommandResponse {
        match self.process_command(cmd.clone()) {
            Ok((response, events)) => {
                // Broadcast and notify after successful commit
                for event in &events {
                    if self.event_tx.send(event.clone()).is_err() {
                        tracing::debug!("Event broadcast skipped: no active receivers");
                    }
                    self.after_commit(event);
                }
                response
            }
            Err(err) => CommandResponse::error(cmd.command_id, err.into()),
        }
    }

    /// Process command and return response with events
    fn process_command(
        &self,
        cmd: OrderCommand,
    ) -> ManagerResult<(CommandResponse, Vec<OrderEvent>)> {
        tracing::debug!(command_id = %cmd.command_id, "Processing command");

        // 1. Idempotency check (before transaction)
        if self.storage.is_command_processed(&cmd.command_id)? {
            tracing::warn!(command_id = %cmd.command_id, "Duplicate command");
            return Ok((CommandResponse::duplicate(cmd.command_id), vec![]));
        }

        // 2. Pre-generate order id and number for Submit (BEFORE the main
        // transaction - redb does not allow nested write transactions)
        let action: CommandAction = match &cmd.payload {
            OrderCommandPayload::Submit {
                shop_id,
                items,
                requested_time,
                payment_method,
                customer_note,
                quoted_prep_minutes,
            } => {
                let priced = self.price_items(items)?;
                let number = self.next_order_number(shop_id)?;
                CommandAction::Submit(SubmitAction {
                    order_id: shared::util::snowflake_id().to_string(),
                    shop_id: shop_id.clone(),
                    number,
                    items: priced,
                    requested_time: *requested_time,
                    payment_method: payment_method.clone(),
                    customer_note: customer_note.clone(),
                    quoted_prep_minutes: *quoted_prep_minutes,
                })
            }
            OrderCommandPayload::FlagUnavailable { order_id, item_ids } => {
                CommandAction::FlagUnavailable(FlagUnavailableAction {
                    order_id: order_id.clone(),
                    item_ids: item_ids.clone(),
                    catalog: self.catalog.clone(),
                })
            }
            OrderCommandPayload::ResolveAlternatives { order_id, decisions } => {
                CommandAction::ResolveAlternatives(ResolveAlternativesAction {
                    order_id: order_id.clone(),
                    decisions: decisions.clone(),
                    catalog: self.catalog.clone(),
                })
            }
            OrderCommandPayload::RecordWeighing { order_id, weights } => {
                CommandAction::RecordWeighing(RecordWeighingAction {
                    order_id: order_id.clone(),
                    weights: weights.clone(),
                    tolerance_percent: self.settings.weight_tolerance_percent,
                })
            }
            OrderCommandPayload::AutoCancel { order_id } => {
                CommandAction::AutoCancel(AutoCancelAction {
                    order_id: order_id.clone(),
                    now: cmd.timestamp,
                    timeout_minutes: self.settings.pending_timeout_minutes,
                })
            }
            _ => (&cmd).into(),
        };

        // 3. Begin write transaction
        let txn = self.storage.begin_write()?;

        // Double-check idempotency within the transaction
        if self.storage.is_command_processed_txn(&txn, &cmd.command_id)? {
            return Ok((CommandResponse::duplicate(cmd.command_id), vec![]));
        }

        // 4. Create context and metadata
        let current_sequence = self.storage.get_current_sequence()?;
        let mut ctx = CommandContext::new(&txn, &self.storage, current_sequence);
        let metadata = CommandMetadata {
            command_id: cmd.command_id.clone(),
            actor: cmd.actor,
            actor_id: cmd.actor_id.clone(),
            timestamp: cmd.timestamp,
        };

        // 5. Execute the action
        let events = futures::executor::block_on(action.execute(&mut ctx, &metadata))
            .map_err(ManagerError::from)?;

        // 6. Apply events to order records
        for event in &events {
            let mut order = ctx
                .load_order(&event.order_id)
                .unwrap_or_else(|_| Order::new(event.order_id.clone()));

            // Transition-graph invariant: every committed event must be an
            // edge from the record's current status (new records start at
            // PENDING via the Submitted event)
            let is_new = order.number.is_empty();
            if !is_new && !OrderStatus::can_transition(order.status, event.status) {
                return Err(ManagerError::Internal(format!(
                    "illegal transition {} -> {} on order {}",
                    order.status, event.status, event.order_id
                )));
            }

            let applier: EventAction = event.into();
            applier.apply(&mut order, event);
            ctx.save_order(order);
        }

        // 7. Persist events
        for event in &events {
            self.storage.store_event(&txn, event)?;
        }

        // 8. Persist order records and maintain the open index
        for order in ctx.modified_orders() {
            self.storage.store_order(&txn, order)?;
            if order.is_open() {
                self.storage.mark_order_open(&txn, &order.order_id, &order.shop_id)?;
            } else {
                self.storage.mark_order_closed(&txn, &order.order_id)?;
            }
        }

        // 8b. Fold ratings into the shop aggregate
        for event in &events {
            if let EventPayload::Rated { score, .. } = &event.payload {
                self.storage.add_rating(&txn, &event.shop_id, *score)?;
            }
        }

        // 9. Update sequence counter
        let max_sequence = events
            .iter()
            .map(|e| e.sequence)
            .max()
            .unwrap_or(current_sequence);
        if max_sequence > current_sequence {
            self.storage.set_sequence(&txn, max_sequence)?;
        }

        // 10. Mark command processed and commit
        self.storage.mark_command_processed(&txn, &cmd.command_id)?;
        txn.commit().map_err(StorageError::from)?;

        let order_id = events.first().map(|e| e.order_id.clone());
        tracing::info!(
            command_id = %cmd.command_id,
            order_id = ?order_id,
            event_count = events.len(),
            "Command processed successfully"
        );
        Ok((CommandResponse::success(cmd.command_id, order_id), events))
    }

    // ========== Post-commit side effects ==========

    /// Auto-pause tracking and notification dispatch for one committed event
    fn after_commit(&self, event: &OrderEvent) {
        if event.event_type == OrderEventType::AutoCancelled {
            self.track_auto_cancel(&event.shop_id, event.timestamp);
        }
        if let Some((kind, params)) = notification_for(event) {
            self.dispatch_notification(event.order_id.clone(), kind, params);
        }
    }

    /// Record an auto-cancel and trip AUTO_PAUSED past the threshold
    fn track_auto_cancel(&self, shop_id: &str, timestamp: i64) {
        let window_ms = self.settings.auto_pause_window_minutes * 60_000;
        let entry = self
            .auto_cancels
            .entry(shop_id.to_string())
            .or_insert_with(|| Mutex::new(Vec::new()));
        let mut recent = entry.lock();
        recent.push(timestamp);
        recent.retain(|t| *t > timestamp - window_ms);

        if recent.len() >= self.settings.auto_pause_threshold {
            if let Some(availability) = &self.availability {
                availability.enter_auto_pause(
                    shop_id,
                    &format!(
                        "{} orders auto-cancelled within {} minutes",
                        recent.len(),
                        self.settings.auto_pause_window_minutes
                    ),
                );
            }
            recent.clear();
        }
    }

    /// Fire-and-forget notification; failure never affects the transition
    fn dispatch_notification(&self, order_id: String, kind: NotifyKind, params: serde_json::Value) {
        let notifier = self.notifier.clone();
        let deliver = async move {
            if let Err(e) = notifier.notify(&order_id, kind, params).await {
                tracing::warn!(
                    order_id = %order_id,
                    kind = kind.as_str(),
                    error = %e,
                    "Notification delivery failed"
                );
            }
        };
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(deliver);
            }
            Err(_) => futures::executor::block_on(deliver),
        }
    }

    // ========== Public Query Methods ==========

    /// Get an order record by ID
    pub fn get_order(&self, order_id: &str) -> ManagerResult<Option<Order>> {
        Ok(self.storage.get_order(order_id)?)
    }

    /// Open orders for a shop (kitchen display set)
    pub fn get_open_orders(&self, shop_id: &str) -> ManagerResult<Vec<Order>> {
        Ok(self.storage.get_open_orders(shop_id)?)
    }

    /// The order's timeline (append-only, commit order)
    pub fn get_timeline(&self, order_id: &str) -> ManagerResult<Vec<OrderEvent>> {
        Ok(self.storage.get_events_for_order(order_id)?)
    }

    /// Events across all orders since a sequence
    pub fn get_events_since(&self, since_sequence: u64) -> ManagerResult<Vec<OrderEvent>> {
        Ok(self.storage.get_events_since(since_sequence)?)
    }

    /// Events for one shop since a sequence
    pub fn get_shop_events_since(
        &self,
        shop_id: &str,
        since_sequence: u64,
    ) -> ManagerResult<Vec<OrderEvent>> {
        Ok(self.storage.get_shop_events_since(shop_id, since_sequence)?)
    }

    /// Current global sequence number
    pub fn get_current_sequence(&self) -> ManagerResult<u64> {
        Ok(self.storage.get_current_sequence()?)
    }

    /// Shop rating aggregate
    pub fn shop_rating(&self, shop_id: &str) -> ManagerResult<ShopRating> {
        Ok(self.storage.get_rating(shop_id)?)
    }

    /// Rebuild an order record from its events (drift verification)
    pub fn rebuild_order(&self, order_id: &str) -> ManagerResult<Order> {
        let events = self.storage.get_events_for_order(order_id)?;
        if events.is_empty() {
            return Err(ManagerError::OrderNotFound(order_id.to_string()));
        }

        let mut order = Order::new(order_id.to_string());
        for event in &events {
            let applier: EventAction = event.into();
            applier.apply(&mut order, event);
        }
        Ok(order)
    }

    /// Verify the stored record against a rebuild from events
    pub fn verify_order(&self, order_id: &str) -> ManagerResult<bool> {
        let stored = self.get_order(order_id)?;
        let rebuilt = self.rebuild_order(order_id)?;
        match stored {
            Some(s) => Ok(s.status == rebuilt.status
                && s.items.len() == rebuilt.items.len()
                && s.total_cents == rebuilt.total_cents
                && s.last_sequence == rebuilt.last_sequence),
            None => Ok(false),
        }
    }
}

/// Notification mapping: at most one per committed transition
fn notification_for(event: &OrderEvent) -> Option<(NotifyKind, serde_json::Value)> {
    match &event.payload {
        EventPayload::Accepted {
            estimated_ready, ..
        } => Some((
            NotifyKind::OrderAccepted,
            json!({ "estimated_ready": estimated_ready }),
        )),
        EventPayload::ReadyMarked { actual_ready } => Some((
            NotifyKind::OrderReady,
            json!({ "actual_ready": actual_ready }),
        )),
        EventPayload::ItemsFlagged { flagged } => Some((
            NotifyKind::StockIssue,
            json!({ "flagged": flagged }),
        )),
        EventPayload::WeightRecorded {
            total_cents,
            review_required,
            ..
        } if *review_required => Some((
            NotifyKind::WeightReview,
            json!({ "new_total_cents": total_cents }),
        )),
        EventPayload::Denied { reason } => Some((
            NotifyKind::OrderCancelled,
            json!({ "reason": reason }),
        )),
        EventPayload::Cancelled { .. } => Some((NotifyKind::OrderCancelled, json!({}))),
        EventPayload::AutoCancelled { age_minutes } => Some((
            NotifyKind::OrderCancelled,
            json!({ "auto": true, "age_minutes": age_minutes }),
        )),
        EventPayload::AlternativesResolved { cancelled, .. } if *cancelled => {
            Some((NotifyKind::OrderCancelled, json!({ "empty_after_resolution": true })))
        }
        _ => None,
    }
}

impl Clone for LifecycleManager {
    fn clone(&self) -> Self {
        Self {
            storage: self.storage.clone(),
            event_tx: self.event_tx.clone(),
            epoch: self.epoch.clone(),
            catalog: self.catalog.clone(),
            notifier: self.notifier.clone(),
            availability: self.availability.clone(),
            auto_cancels: self.auto_cancels.clone(),
            settings: self.settings.clone(),
        }
    }
}

#[cfg(test)]
mod tests;
