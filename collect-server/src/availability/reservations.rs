//! Offer reservation ledger (`reservedInCart`)
//!
//! Customers placing an offer item in their cart hold a reservation until
//! checkout completes or the hold window elapses. Every mutation runs under
//! the offer's lock - increment/decrement semantics, never read-then-write.
//!
//! Each reservation carries its own absolute expiry; the sweep releases only
//! the expired ones. (The coarser clear-all-per-offer behavior was rejected -
//! see DESIGN.md.)

use dashmap::DashMap;
use parking_lot::Mutex;

/// One cart hold against an offer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reservation {
    pub reservation_id: String,
    pub expires_at: i64,
}

/// Per-offer reservation ledger
#[derive(Debug, Default)]
pub struct ReservationLedger {
    holds: DashMap<i64, Mutex<Vec<Reservation>>>,
}

impl ReservationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take a hold on an offer; returns the reservation id
    pub fn reserve(&self, offer_id: i64, now: i64, hold_ms: i64) -> String {
        let reservation_id = uuid::Uuid::new_v4().to_string();
        let entry = self
            .holds
            .entry(offer_id)
            .or_insert_with(|| Mutex::new(Vec::new()));
        entry.lock().push(Reservation {
            reservation_id: reservation_id.clone(),
            expires_at: now + hold_ms,
        });
        reservation_id
    }

    /// Release a hold (checkout completed or cart abandoned explicitly)
    ///
    /// Returns false when the reservation no longer exists (already released
    /// or swept) - callers treat that as success.
    pub fn release(&self, offer_id: i64, reservation_id: &str) -> bool {
        let Some(entry) = self.holds.get(&offer_id) else {
            return false;
        };
        let mut holds = entry.lock();
        let before = holds.len();
        holds.retain(|r| r.reservation_id != reservation_id);
        holds.len() < before
    }

    /// Active holds against an offer
    pub fn reserved_count(&self, offer_id: i64) -> usize {
        self.holds.get(&offer_id).map(|e| e.lock().len()).unwrap_or(0)
    }

    /// Release every hold whose expiry has passed; returns the release count
    pub fn sweep_expired(&self, now: i64) -> usize {
        let mut released = 0;
        for entry in self.holds.iter() {
            let mut holds = entry.lock();
            let before = holds.len();
            holds.retain(|r| r.expires_at > now);
            released += before - holds.len();
        }
        released
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: i64 = 60_000;

    #[test]
    fn test_reserve_and_release() {
        let ledger = ReservationLedger::new();
        let id = ledger.reserve(7, 0, 30 * MIN);
        assert_eq!(ledger.reserved_count(7), 1);
        assert!(ledger.release(7, &id));
        assert_eq!(ledger.reserved_count(7), 0);
        // Double release is a no-op
        assert!(!ledger.release(7, &id));
    }

    #[test]
    fn test_sweep_releases_only_expired_holds() {
        let ledger = ReservationLedger::new();
        let _stale = ledger.reserve(7, 0, 30 * MIN);
        let fresh = ledger.reserve(7, 20 * MIN, 30 * MIN);

        // At t=35min the first hold (expires 30min) is gone, the second
        // (expires 50min) survives
        let released = ledger.sweep_expired(35 * MIN);
        assert_eq!(released, 1);
        assert_eq!(ledger.reserved_count(7), 1);
        assert!(ledger.release(7, &fresh));
    }

    #[test]
    fn test_sweep_is_idempotent() {
        let ledger = ReservationLedger::new();
        ledger.reserve(7, 0, MIN);
        assert_eq!(ledger.sweep_expired(2 * MIN), 1);
        assert_eq!(ledger.sweep_expired(2 * MIN), 0);
    }

    #[test]
    fn test_offers_are_independent() {
        let ledger = ReservationLedger::new();
        ledger.reserve(1, 0, MIN);
        ledger.reserve(2, 0, 10 * MIN);
        assert_eq!(ledger.sweep_expired(5 * MIN), 1);
        assert_eq!(ledger.reserved_count(1), 0);
        assert_eq!(ledger.reserved_count(2), 1);
    }
}
