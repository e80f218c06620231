//! Per-shop trailing-hour admission capacity
//!
//! Admissions are recorded as timestamps and pruned on every check. The
//! check-and-record step runs under the shop's lock, so two racing
//! submissions cannot both squeeze through the last capacity slot.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;

/// Trailing window length: 60 minutes
const WINDOW_MS: i64 = 60 * 60 * 1000;

/// Per-shop admission log
#[derive(Debug, Default)]
pub struct CapacityWindow {
    admissions: DashMap<String, Mutex<VecDeque<i64>>>,
}

impl CapacityWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically check capacity and record the admission on success
    ///
    /// Returns false when the shop already admitted `max` orders in the
    /// trailing 60 minutes.
    pub fn try_admit(&self, shop_id: &str, now: i64, max: u32) -> bool {
        let entry = self
            .admissions
            .entry(shop_id.to_string())
            .or_insert_with(|| Mutex::new(VecDeque::new()));
        let mut log = entry.lock();

        Self::prune(&mut log, now);
        if log.len() as u32 >= max {
            return false;
        }
        log.push_back(now);
        true
    }

    /// Admissions currently inside the trailing window
    pub fn count(&self, shop_id: &str, now: i64) -> u32 {
        match self.admissions.get(shop_id) {
            Some(entry) => {
                let mut log = entry.lock();
                Self::prune(&mut log, now);
                log.len() as u32
            }
            None => 0,
        }
    }

    fn prune(log: &mut VecDeque<i64>, now: i64) {
        let cutoff = now - WINDOW_MS;
        while let Some(&oldest) = log.front() {
            if oldest <= cutoff {
                log.pop_front();
            } else {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIN: i64 = 60_000;

    #[test]
    fn test_admits_until_capacity() {
        let window = CapacityWindow::new();
        assert!(window.try_admit("s1", 0, 2));
        assert!(window.try_admit("s1", MIN, 2));
        assert!(!window.try_admit("s1", 2 * MIN, 2));
        assert_eq!(window.count("s1", 2 * MIN), 2);
    }

    #[test]
    fn test_window_slides() {
        let window = CapacityWindow::new();
        assert!(window.try_admit("s1", 0, 1));
        assert!(!window.try_admit("s1", 59 * MIN, 1));
        // The first admission leaves the trailing hour
        assert!(window.try_admit("s1", 61 * MIN, 1));
    }

    #[test]
    fn test_shops_are_independent() {
        let window = CapacityWindow::new();
        assert!(window.try_admit("s1", 0, 1));
        assert!(window.try_admit("s2", 0, 1));
        assert_eq!(window.count("s1", 0), 1);
        assert_eq!(window.count("s2", 0), 1);
    }

    #[test]
    fn test_concurrent_admissions_respect_capacity() {
        use std::sync::Arc;

        let window = Arc::new(CapacityWindow::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let w = window.clone();
                std::thread::spawn(move || w.try_admit("s1", 0, 5))
            })
            .collect();

        let admitted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|&ok| ok)
            .count();
        assert_eq!(admitted, 5);
        assert_eq!(window.count("s1", 0), 5);
    }
}
