//! Kitchen synchronization API
//!
//! Reconnection protocol for kitchen clients:
//!
//! 1. Client polls with its last known sequence
//! 2. Server calculates the gap
//! 3. Small gap: incremental events (per-order commit order preserved by the
//!    global sequence)
//! 4. Large gap (or server restart, detected via epoch): full sync with the
//!    shop's open-order set
//!
//! Delivery is at-least-once; clients key on (order_id, status) and re-render
//! safely on duplicates. Live pushes ride the manager's broadcast channel
//! (SSE endpoint in the API layer); this service covers the catch-up path.

use crate::lifecycle::{LifecycleManager, ManagerError};
use serde::{Deserialize, Serialize};
use shared::order::{Order, OrderEvent};
use std::sync::Arc;

/// Maximum events to return in incremental sync
/// If the gap exceeds this, full sync is recommended
const MAX_INCREMENTAL_EVENTS: usize = 1000;

/// Bounded recent-history window, days
const HISTORY_WINDOW_DAYS: i64 = 3;

/// Sync request from a kitchen client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncRequest {
    /// Shop whose orders the client displays
    pub shop_id: String,
    /// Client's last known sequence number
    pub since_sequence: u64,
}

/// Sync response to a kitchen client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncResponse {
    /// Events since the requested sequence (incremental sync)
    pub events: Vec<OrderEvent>,
    /// Current open-order set (full sync)
    pub open_orders: Vec<Order>,
    /// Server's current sequence number
    pub server_sequence: u64,
    /// Whether full sync is required (gap too large)
    pub requires_full_sync: bool,
    /// Server instance epoch (UUID generated on startup)
    /// Used to detect server restarts - if epoch changes, client must full sync
    pub server_epoch: String,
}

impl SyncResponse {
    /// Create a full sync response
    pub fn full_sync(open_orders: Vec<Order>, server_sequence: u64, epoch: String) -> Self {
        Self {
            events: vec![],
            open_orders,
            server_sequence,
            requires_full_sync: true,
            server_epoch: epoch,
        }
    }

    /// Create an incremental sync response
    pub fn incremental(events: Vec<OrderEvent>, server_sequence: u64, epoch: String) -> Self {
        Self {
            events,
            open_orders: vec![],
            server_sequence,
            requires_full_sync: false,
            server_epoch: epoch,
        }
    }
}

/// Sync service for kitchen reconnection
pub struct SyncService {
    manager: Arc<LifecycleManager>,
}

impl SyncService {
    /// Create a new sync service
    pub fn new(manager: Arc<LifecycleManager>) -> Self {
        Self { manager }
    }

    /// Handle a sync request
    ///
    /// The response includes `server_epoch` which clients use to detect
    /// server restarts. If the epoch changes, clients must perform a full
    /// sync regardless of sequence gap.
    pub fn sync(&self, request: &SyncRequest) -> Result<SyncResponse, ManagerError> {
        let server_sequence = self.manager.get_current_sequence()?;
        let epoch = self.manager.epoch().to_string();

        // If the client is up to date, return an empty response
        if request.since_sequence >= server_sequence {
            return Ok(SyncResponse::incremental(vec![], server_sequence, epoch));
        }

        // If the gap is large, recommend full sync
        let gap = server_sequence - request.since_sequence;
        if gap > MAX_INCREMENTAL_EVENTS as u64 {
            let open_orders = self.manager.get_open_orders(&request.shop_id)?;
            return Ok(SyncResponse::full_sync(open_orders, server_sequence, epoch));
        }

        let events = self
            .manager
            .get_shop_events_since(&request.shop_id, request.since_sequence)?;

        // Double-check: if we got too many events, fall back to full sync
        if events.len() > MAX_INCREMENTAL_EVENTS {
            let open_orders = self.manager.get_open_orders(&request.shop_id)?;
            return Ok(SyncResponse::full_sync(open_orders, server_sequence, epoch));
        }

        Ok(SyncResponse::incremental(events, server_sequence, epoch))
    }

    /// The shop's current open-order set (initial connection)
    pub fn open_orders(&self, shop_id: &str) -> Result<Vec<Order>, ManagerError> {
        self.manager.get_open_orders(shop_id)
    }

    /// Terminal orders of the bounded recent-history window
    pub fn recent_history(&self, shop_id: &str, now: i64) -> Result<Vec<Order>, ManagerError> {
        let since = now - HISTORY_WINDOW_DAYS * 24 * 60 * 60 * 1000;
        Ok(self
            .manager
            .storage()
            .get_recent_terminal_orders(shop_id, since)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{InMemoryCatalog, ProductInfo};
    use crate::lifecycle::{LifecycleSettings, LifecycleStorage};
    use crate::notify::LogNotifier;
    use shared::order::{
        ActorRole, OrderCommand, OrderCommandPayload, PickupTime, Quantity, SubmittedItem,
    };

    fn create_test_manager() -> Arc<LifecycleManager> {
        let catalog = InMemoryCatalog::new();
        catalog.insert(ProductInfo {
            product_id: 1,
            name: "Lomo".to_string(),
            category_id: 10,
            unit_price_cents: 1500,
            weight_based: true,
            in_stock: true,
        });
        Arc::new(LifecycleManager::new(
            LifecycleStorage::open_in_memory().unwrap(),
            Arc::new(catalog),
            Arc::new(LogNotifier),
            LifecycleSettings::default(),
        ))
    }

    fn submit(manager: &LifecycleManager, shop_id: &str) -> String {
        let cmd = OrderCommand::new(
            ActorRole::Customer,
            "cust-9",
            OrderCommandPayload::Submit {
                shop_id: shop_id.to_string(),
                items: vec![SubmittedItem {
                    product_id: 1,
                    quantity: Quantity::Weight { grams: 400 },
                }],
                requested_time: PickupTime::Asap,
                payment_method: "CASH".to_string(),
                customer_note: None,
                quoted_prep_minutes: 20,
            },
        );
        manager.execute_command(cmd).order_id.unwrap()
    }

    #[test]
    fn test_sync_empty() {
        let manager = create_test_manager();
        let service = SyncService::new(manager);

        let response = service
            .sync(&SyncRequest {
                shop_id: "s1".to_string(),
                since_sequence: 0,
            })
            .unwrap();

        assert!(!response.requires_full_sync);
        assert!(response.events.is_empty());
        assert_eq!(response.server_sequence, 0);
    }

    #[test]
    fn test_sync_incremental() {
        let manager = create_test_manager();
        let service = SyncService::new(manager.clone());

        submit(&manager, "s1");
        submit(&manager, "s1");

        let response = service
            .sync(&SyncRequest {
                shop_id: "s1".to_string(),
                since_sequence: 0,
            })
            .unwrap();
        assert!(!response.requires_full_sync);
        assert_eq!(response.events.len(), 2);
        assert_eq!(response.server_sequence, 2);

        // From the middle
        let response = service
            .sync(&SyncRequest {
                shop_id: "s1".to_string(),
                since_sequence: 1,
            })
            .unwrap();
        assert_eq!(response.events.len(), 1);
    }

    #[test]
    fn test_sync_filters_by_shop() {
        let manager = create_test_manager();
        let service = SyncService::new(manager.clone());

        submit(&manager, "s1");
        submit(&manager, "s2");

        let response = service
            .sync(&SyncRequest {
                shop_id: "s2".to_string(),
                since_sequence: 0,
            })
            .unwrap();
        assert_eq!(response.events.len(), 1);
        assert_eq!(response.events[0].shop_id, "s2");
        // The sequence still reflects the whole log
        assert_eq!(response.server_sequence, 2);
    }

    #[test]
    fn test_sync_up_to_date() {
        let manager = create_test_manager();
        let service = SyncService::new(manager.clone());
        submit(&manager, "s1");

        let response = service
            .sync(&SyncRequest {
                shop_id: "s1".to_string(),
                since_sequence: 1,
            })
            .unwrap();
        assert!(!response.requires_full_sync);
        assert!(response.events.is_empty());
    }

    #[test]
    fn test_within_order_commit_order_is_preserved() {
        let manager = create_test_manager();
        let service = SyncService::new(manager.clone());

        let order_id = submit(&manager, "s1");
        manager.execute_command(OrderCommand::new(
            ActorRole::Shop,
            "Maria",
            OrderCommandPayload::Accept {
                order_id: order_id.clone(),
                eta_minutes: 15,
                shop_note: None,
            },
        ));

        let response = service
            .sync(&SyncRequest {
                shop_id: "s1".to_string(),
                since_sequence: 0,
            })
            .unwrap();
        let sequences: Vec<u64> = response
            .events
            .iter()
            .filter(|e| e.order_id == order_id)
            .map(|e| e.sequence)
            .collect();
        let mut sorted = sequences.clone();
        sorted.sort();
        assert_eq!(sequences, sorted);
    }

    #[test]
    fn test_recent_history_is_bounded() {
        let manager = create_test_manager();
        let service = SyncService::new(manager.clone());

        let order_id = submit(&manager, "s1");
        manager.execute_command(OrderCommand::new(
            ActorRole::Customer,
            "cust-9",
            OrderCommandPayload::Cancel {
                order_id: order_id.clone(),
            },
        ));

        let now = shared::util::now_millis();
        let history = service.recent_history("s1", now).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].order_id, order_id);

        // Outside the 3-day window nothing comes back
        let history = service
            .recent_history("s1", now + 4 * 24 * 60 * 60 * 1000)
            .unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn test_epoch_rides_on_every_response() {
        let manager = create_test_manager();
        let epoch = manager.epoch().to_string();
        let service = SyncService::new(manager);

        let response = service
            .sync(&SyncRequest {
                shop_id: "s1".to_string(),
                since_sequence: 0,
            })
            .unwrap();
        assert_eq!(response.server_epoch, epoch);
    }
}
