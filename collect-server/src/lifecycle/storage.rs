//! redb-based storage layer for the order lifecycle
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `events` | `(order_id, sequence)` | `OrderEvent` | Timeline (append-only) |
//! | `orders` | `order_id` | `Order` | Order record cache |
//! | `open_orders` | `order_id` | `shop_id` | Kitchen display index |
//! | `processed_commands` | `command_id` | `()` | Idempotency check |
//! | `counters` | name | `u64` | Global sequence + per-shop order numbers |
//! | `shop_ratings` | `shop_id` | `ShopRating` | Rolling rating aggregate |
//!
//! # Durability
//!
//! redb commits are persistent as soon as `commit()` returns (copy-on-write
//! with atomic pointer swap), which matters for counter-side devices that get
//! powered off without warning. Writers are serialized by redb: the
//! conditional-commit guarantee of the state machine rests on re-reading the
//! order inside the write transaction.

use redb::{
    Database, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use serde::{Deserialize, Serialize};
use shared::order::{Order, OrderEvent};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Table for storing events: key = (order_id, sequence), value = JSON-serialized OrderEvent
const EVENTS_TABLE: TableDefinition<(&str, u64), &[u8]> = TableDefinition::new("events");

/// Table for storing order records: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("orders");

/// Table for the open-order index: key = order_id, value = shop_id
const OPEN_ORDERS_TABLE: TableDefinition<&str, &str> = TableDefinition::new("open_orders");

/// Table for tracking processed commands: key = command_id, value = empty (idempotency)
const PROCESSED_COMMANDS_TABLE: TableDefinition<&str, ()> =
    TableDefinition::new("processed_commands");

/// Table for counters: key = "seq" or "orders:{shop_id}", value = u64
const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

/// Table for shop rating aggregates: key = shop_id, value = JSON-serialized ShopRating
const RATINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("shop_ratings");

const SEQUENCE_KEY: &str = "seq";

/// Rolling rating aggregate per shop
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShopRating {
    pub count: u64,
    pub sum: u64,
}

impl ShopRating {
    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            None
        } else {
            Some(self.sum as f64 / self.count as f64)
        }
    }
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Lifecycle storage backed by redb
#[derive(Clone)]
pub struct LifecycleStorage {
    db: Arc<Database>,
}

impl LifecycleStorage {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        let storage = Self { db: Arc::new(db) };
        storage.init_tables()?;
        Ok(storage)
    }

    fn init_tables(&self) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let _ = write_txn.open_table(EVENTS_TABLE)?;
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(OPEN_ORDERS_TABLE)?;
            let _ = write_txn.open_table(PROCESSED_COMMANDS_TABLE)?;
            let _ = write_txn.open_table(RATINGS_TABLE)?;

            let mut counters = write_txn.open_table(COUNTERS_TABLE)?;
            if counters.get(SEQUENCE_KEY)?.is_none() {
                counters.insert(SEQUENCE_KEY, 0u64)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Sequence Operations ==========

    /// Get current global sequence (read-only)
    pub fn get_current_sequence(&self) -> StorageResult<u64> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(COUNTERS_TABLE)?;
        Ok(table
            .get(SEQUENCE_KEY)?
            .map(|guard| guard.value())
            .unwrap_or(0))
    }

    /// Set the global sequence (within transaction)
    pub fn set_sequence(&self, txn: &WriteTransaction, sequence: u64) -> StorageResult<()> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        table.insert(SEQUENCE_KEY, sequence)?;
        Ok(())
    }

    // ========== Order Numbers ==========

    /// Get and increment the shop's order counter atomically
    ///
    /// Runs its own write transaction - call BEFORE the main command
    /// transaction (redb does not allow nested write transactions).
    pub fn next_order_number(&self, shop_id: &str) -> StorageResult<u64> {
        let key = format!("orders:{shop_id}");
        let txn = self.db.begin_write()?;
        let next = {
            let mut table = txn.open_table(COUNTERS_TABLE)?;
            let current = table.get(key.as_str())?.map(|g| g.value()).unwrap_or(0);
            let next = current + 1;
            table.insert(key.as_str(), next)?;
            next
        };
        txn.commit()?;
        Ok(next)
    }

    // ========== Command Idempotency ==========

    /// Check if a command has been processed
    pub fn is_command_processed(&self, command_id: &str) -> StorageResult<bool> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        Ok(table.get(command_id)?.is_some())
    }

    /// Check if a command has been processed (within transaction)
    pub fn is_command_processed_txn(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<bool> {
        let table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        Ok(table.get(command_id)?.is_some())
    }

    /// Mark a command as processed
    pub fn mark_command_processed(
        &self,
        txn: &WriteTransaction,
        command_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(PROCESSED_COMMANDS_TABLE)?;
        table.insert(command_id, ())?;
        Ok(())
    }

    // ========== Event Operations ==========

    /// Store an event
    pub fn store_event(&self, txn: &WriteTransaction, event: &OrderEvent) -> StorageResult<()> {
        let mut table = txn.open_table(EVENTS_TABLE)?;
        let key = (event.order_id.as_str(), event.sequence);
        let value = serde_json::to_vec(event)?;
        table.insert(key, value.as_slice())?;
        Ok(())
    }

    /// Get all events for an order (the order's timeline)
    pub fn get_events_for_order(&self, order_id: &str) -> StorageResult<Vec<OrderEvent>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EVENTS_TABLE)?;

        let mut events = Vec::new();
        let range_start = (order_id, 0u64);
        let range_end = (order_id, u64::MAX);

        for result in table.range(range_start..=range_end)? {
            let (_key, value) = result?;
            let event: OrderEvent = serde_json::from_slice(value.value())?;
            events.push(event);
        }

        events.sort_by_key(|e| e.sequence);
        Ok(events)
    }

    /// Get events since a given sequence (across all orders)
    pub fn get_events_since(&self, since_sequence: u64) -> StorageResult<Vec<OrderEvent>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(EVENTS_TABLE)?;

        let mut events = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let event: OrderEvent = serde_json::from_slice(value.value())?;
            if event.sequence > since_sequence {
                events.push(event);
            }
        }

        events.sort_by_key(|e| e.sequence);
        Ok(events)
    }

    /// Get events for one shop since a given sequence
    pub fn get_shop_events_since(
        &self,
        shop_id: &str,
        since_sequence: u64,
    ) -> StorageResult<Vec<OrderEvent>> {
        let mut events = self.get_events_since(since_sequence)?;
        events.retain(|e| e.shop_id == shop_id);
        Ok(events)
    }

    // ========== Order Records ==========

    /// Store an order record
    pub fn store_order(&self, txn: &WriteTransaction, order: &Order) -> StorageResult<()> {
        let mut table = txn.open_table(ORDERS_TABLE)?;
        let value = serde_json::to_vec(order)?;
        table.insert(order.order_id.as_str(), value.as_slice())?;
        Ok(())
    }

    /// Get an order record by ID
    pub fn get_order(&self, order_id: &str) -> StorageResult<Option<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    /// Get an order record by ID (within transaction)
    pub fn get_order_txn(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
    ) -> StorageResult<Option<Order>> {
        let table = txn.open_table(ORDERS_TABLE)?;

        match table.get(order_id)? {
            Some(value) => Ok(Some(serde_json::from_slice(value.value())?)),
            None => Ok(None),
        }
    }

    // ========== Open Order Index ==========

    /// Add an order to the open index
    pub fn mark_order_open(
        &self,
        txn: &WriteTransaction,
        order_id: &str,
        shop_id: &str,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(OPEN_ORDERS_TABLE)?;
        table.insert(order_id, shop_id)?;
        Ok(())
    }

    /// Remove an order from the open index
    pub fn mark_order_closed(&self, txn: &WriteTransaction, order_id: &str) -> StorageResult<()> {
        let mut table = txn.open_table(OPEN_ORDERS_TABLE)?;
        table.remove(order_id)?;
        Ok(())
    }

    /// IDs of all open orders, optionally restricted to one shop
    pub fn get_open_order_ids(&self, shop_id: Option<&str>) -> StorageResult<Vec<String>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(OPEN_ORDERS_TABLE)?;

        let mut ids = Vec::new();
        for result in table.iter()? {
            let (key, value) = result?;
            if shop_id.is_none_or(|s| s == value.value()) {
                ids.push(key.value().to_string());
            }
        }
        Ok(ids)
    }

    /// Open order records for one shop
    pub fn get_open_orders(&self, shop_id: &str) -> StorageResult<Vec<Order>> {
        let ids = self.get_open_order_ids(Some(shop_id))?;
        let mut orders = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(order) = self.get_order(&id)? {
                orders.push(order);
            }
        }
        orders.sort_by_key(|o| o.created_at);
        Ok(orders)
    }

    /// Terminal orders of a shop updated at or after `since` (history window)
    pub fn get_recent_terminal_orders(
        &self,
        shop_id: &str,
        since: i64,
    ) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;

        let mut orders = Vec::new();
        for result in table.iter()? {
            let (_key, value) = result?;
            let order: Order = serde_json::from_slice(value.value())?;
            if order.shop_id == shop_id && order.is_terminal() && order.updated_at >= since {
                orders.push(order);
            }
        }
        orders.sort_by_key(|o| std::cmp::Reverse(o.updated_at));
        Ok(orders)
    }

    // ========== Shop Ratings ==========

    /// Fold a new score into the shop's rolling aggregate (within transaction)
    pub fn add_rating(
        &self,
        txn: &WriteTransaction,
        shop_id: &str,
        score: u8,
    ) -> StorageResult<ShopRating> {
        let mut table = txn.open_table(RATINGS_TABLE)?;
        let mut rating: ShopRating = match table.get(shop_id)? {
            Some(value) => serde_json::from_slice(value.value())?,
            None => ShopRating::default(),
        };
        rating.count += 1;
        rating.sum += score as u64;
        let value = serde_json::to_vec(&rating)?;
        table.insert(shop_id, value.as_slice())?;
        Ok(rating)
    }

    /// The shop's rating aggregate
    pub fn get_rating(&self, shop_id: &str) -> StorageResult<ShopRating> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RATINGS_TABLE)?;
        match table.get(shop_id)? {
            Some(value) => Ok(serde_json::from_slice(value.value())?),
            None => Ok(ShopRating::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::order::{
        ActorRole, EventPayload, OrderEventType, OrderStatus, PickupTime,
    };

    fn event(order_id: &str, shop_id: &str, seq: u64) -> OrderEvent {
        OrderEvent::new(
            seq,
            order_id.to_string(),
            shop_id.to_string(),
            ActorRole::Customer,
            "c-1".to_string(),
            format!("cmd-{seq}"),
            OrderStatus::Pending,
            OrderEventType::Submitted,
            EventPayload::Submitted {
                number: "ORD202608081001".into(),
                items: vec![],
                total_cents: 0,
                requested_time: PickupTime::Asap,
                payment_method: "CASH".into(),
                customer_note: None,
                quoted_prep_minutes: 20,
            },
        )
    }

    #[test]
    fn test_event_roundtrip_and_ordering() {
        let storage = LifecycleStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage.store_event(&txn, &event("o1", "s1", 2)).unwrap();
        storage.store_event(&txn, &event("o1", "s1", 1)).unwrap();
        storage.store_event(&txn, &event("o2", "s1", 3)).unwrap();
        txn.commit().unwrap();

        let events = storage.get_events_for_order("o1").unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].sequence, 1);
        assert_eq!(events[1].sequence, 2);

        let all = storage.get_events_since(1).unwrap();
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn test_shop_scoped_events() {
        let storage = LifecycleStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage.store_event(&txn, &event("o1", "s1", 1)).unwrap();
        storage.store_event(&txn, &event("o2", "s2", 2)).unwrap();
        txn.commit().unwrap();

        let events = storage.get_shop_events_since("s2", 0).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].order_id, "o2");
    }

    #[test]
    fn test_open_order_index() {
        let storage = LifecycleStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        let mut order = Order::new("o1".to_string());
        order.shop_id = "s1".to_string();
        storage.store_order(&txn, &order).unwrap();
        storage.mark_order_open(&txn, "o1", "s1").unwrap();
        txn.commit().unwrap();

        assert_eq!(storage.get_open_orders("s1").unwrap().len(), 1);
        assert!(storage.get_open_orders("s2").unwrap().is_empty());

        let txn = storage.begin_write().unwrap();
        storage.mark_order_closed(&txn, "o1").unwrap();
        txn.commit().unwrap();
        assert!(storage.get_open_orders("s1").unwrap().is_empty());
    }

    #[test]
    fn test_order_numbers_are_per_shop_and_sequential() {
        let storage = LifecycleStorage::open_in_memory().unwrap();
        assert_eq!(storage.next_order_number("s1").unwrap(), 1);
        assert_eq!(storage.next_order_number("s1").unwrap(), 2);
        assert_eq!(storage.next_order_number("s2").unwrap(), 1);
    }

    #[test]
    fn test_command_idempotency_marker() {
        let storage = LifecycleStorage::open_in_memory().unwrap();
        assert!(!storage.is_command_processed("cmd-1").unwrap());

        let txn = storage.begin_write().unwrap();
        assert!(!storage.is_command_processed_txn(&txn, "cmd-1").unwrap());
        storage.mark_command_processed(&txn, "cmd-1").unwrap();
        txn.commit().unwrap();

        assert!(storage.is_command_processed("cmd-1").unwrap());
    }

    #[test]
    fn test_rating_aggregate() {
        let storage = LifecycleStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        storage.add_rating(&txn, "s1", 5).unwrap();
        storage.add_rating(&txn, "s1", 4).unwrap();
        txn.commit().unwrap();

        let rating = storage.get_rating("s1").unwrap();
        assert_eq!(rating.count, 2);
        assert_eq!(rating.sum, 9);
        assert_eq!(rating.average(), Some(4.5));
        assert_eq!(storage.get_rating("s2").unwrap().average(), None);
    }
}
