//! Shop-level admission gate
//!
//! Holds the per-shop availability records, the trailing-hour capacity
//! window, and the offer reservation ledger. Timed sub-states resolve lazily
//! on every read; the sweep additionally resolves them eagerly so a shop
//! nobody queries still reopens on time.

use super::capacity::CapacityWindow;
use super::reservations::ReservationLedger;
use dashmap::DashMap;
use parking_lot::RwLock;
use shared::error::{AppError, ErrorCode};
use shared::shop::{AvailabilitySnapshot, ShopAvailability, ShopState};
use shared::util::now_millis;

/// Successful admission: the gate is open and a slot was taken
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Admission {
    /// Prep minutes quoted to the customer (base + busy extra)
    pub quoted_prep_minutes: u32,
}

/// Per-shop availability controller
#[derive(Debug, Default)]
pub struct AvailabilityController {
    shops: DashMap<String, RwLock<ShopAvailability>>,
    capacity: CapacityWindow,
    reservations: ReservationLedger,
}

impl AvailabilityController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a shop with explicit settings (capacity, base prep time)
    pub fn register_shop(&self, shop_id: &str, availability: ShopAvailability) {
        self.shops
            .insert(shop_id.to_string(), RwLock::new(availability));
    }

    /// Run a closure against the shop's record, creating defaults on first use
    fn with_shop<R>(&self, shop_id: &str, f: impl FnOnce(&mut ShopAvailability) -> R) -> R {
        let entry = self
            .shops
            .entry(shop_id.to_string())
            .or_insert_with(|| RwLock::new(ShopAvailability::default()));
        let mut shop = entry.write();
        f(&mut shop)
    }

    // ========== Admission ==========

    /// The admission gate (§ shop availability + capacity)
    ///
    /// `PAUSED`/`AUTO_PAUSED` always reject, even when the pause expiry is
    /// close. `BUSY` admits but adds its extra minutes to the quote. On
    /// success the admission is recorded against the capacity window in the
    /// same step.
    pub fn can_admit(&self, shop_id: &str, now: i64) -> Result<Admission, AppError> {
        self.with_shop(shop_id, |shop| {
            shop.resolve(now);

            match shop.effective_state(now) {
                ShopState::Closed => Err(AppError::new(ErrorCode::ShopClosed)),
                ShopState::Vacation => {
                    let mut err = AppError::new(ErrorCode::ShopOnVacation);
                    if let Some(msg) = &shop.vacation_message {
                        err = err.with_detail("message", msg.clone());
                    }
                    if let Some(until) = shop.vacation_until {
                        err = err.with_detail("until", until);
                    }
                    Err(err)
                }
                ShopState::Paused | ShopState::AutoPaused => {
                    let mut err = AppError::new(ErrorCode::ShopPaused);
                    if let Some(reason) = &shop.pause_reason {
                        err = err.with_detail("reason", reason.clone());
                    }
                    Err(err)
                }
                state @ (ShopState::Open | ShopState::Busy) => {
                    if !self.capacity.try_admit(shop_id, now, shop.max_orders_per_hour) {
                        return Err(AppError::new(ErrorCode::CapacityExceeded)
                            .with_detail("max_orders_per_hour", shop.max_orders_per_hour));
                    }
                    let extra = if state == ShopState::Busy {
                        shop.busy_extra_minutes
                    } else {
                        0
                    };
                    Ok(Admission {
                        quoted_prep_minutes: shop.base_prep_minutes + extra,
                    })
                }
            }
        })
    }

    /// Resolved snapshot with countdowns for the status API
    pub fn snapshot(&self, shop_id: &str, now: i64) -> AvailabilitySnapshot {
        self.with_shop(shop_id, |shop| {
            shop.resolve(now);
            let state = shop.effective_state(now);
            AvailabilitySnapshot {
                shop_id: shop_id.to_string(),
                state,
                busy_extra_minutes: shop.busy_extra_minutes,
                busy_remaining_seconds: shop
                    .busy_until
                    .map(|until| ((until - now) / 1000).max(0)),
                pause_reason: shop.pause_reason.clone(),
                pause_remaining_seconds: shop
                    .pause_until
                    .map(|until| ((until - now) / 1000).max(0)),
                vacation_until: shop.vacation_until,
                vacation_message: shop.vacation_message.clone(),
                max_orders_per_hour: shop.max_orders_per_hour,
                base_prep_minutes: shop.base_prep_minutes,
                orders_last_hour: self.capacity.count(shop_id, now),
                rating_average: None,
                rating_count: 0,
            }
        })
    }

    // ========== State setters (idempotent) ==========

    /// Pause admissions; `duration_minutes = None` pauses until resumed
    pub fn pause(&self, shop_id: &str, reason: &str, duration_minutes: Option<u32>, now: i64) {
        self.with_shop(shop_id, |shop| {
            shop.base_state = ShopState::Paused;
            shop.pause_reason = Some(reason.to_string());
            shop.pause_until = duration_minutes.map(|m| now + m as i64 * 60_000);
            shop.busy_extra_minutes = 0;
            shop.busy_until = None;
        });
        tracing::info!(shop_id, reason, ?duration_minutes, "shop paused");
    }

    /// Resume from pause (manual or automatic)
    pub fn resume(&self, shop_id: &str) {
        self.with_shop(shop_id, |shop| {
            if matches!(shop.base_state, ShopState::Paused | ShopState::AutoPaused) {
                shop.base_state = ShopState::Open;
            }
            shop.pause_reason = None;
            shop.pause_until = None;
        });
        tracing::info!(shop_id, "shop resumed");
    }

    /// Enter busy mode: admissions continue with extra quoted minutes
    pub fn enter_busy(&self, shop_id: &str, extra_minutes: u32, duration_minutes: u32, now: i64) {
        self.with_shop(shop_id, |shop| {
            shop.base_state = ShopState::Busy;
            shop.busy_extra_minutes = extra_minutes;
            shop.busy_until = Some(now + duration_minutes as i64 * 60_000);
        });
        tracing::info!(shop_id, extra_minutes, duration_minutes, "shop busy");
    }

    /// Leave busy mode early
    pub fn exit_busy(&self, shop_id: &str) {
        self.with_shop(shop_id, |shop| {
            if shop.base_state == ShopState::Busy {
                shop.base_state = ShopState::Open;
            }
            shop.busy_extra_minutes = 0;
            shop.busy_until = None;
        });
    }

    /// Enter vacation until the given timestamp
    pub fn enter_vacation(&self, shop_id: &str, until: i64, message: Option<String>) {
        self.with_shop(shop_id, |shop| {
            shop.base_state = ShopState::Vacation;
            shop.vacation_until = Some(until);
            shop.vacation_message = message.clone();
        });
        tracing::info!(shop_id, until, "shop on vacation");
    }

    /// End vacation early
    pub fn exit_vacation(&self, shop_id: &str) {
        self.with_shop(shop_id, |shop| {
            if shop.base_state == ShopState::Vacation {
                shop.base_state = ShopState::Open;
            }
            shop.vacation_until = None;
            shop.vacation_message = None;
        });
    }

    /// Automatic pause, entered when a shop keeps ignoring pending orders
    ///
    /// Not a caller-facing choice: only the lifecycle layer invokes this,
    /// after counting repeated auto-cancels. Requires an explicit resume.
    pub fn enter_auto_pause(&self, shop_id: &str, reason: &str) {
        self.with_shop(shop_id, |shop| {
            shop.base_state = ShopState::AutoPaused;
            shop.pause_reason = Some(reason.to_string());
            shop.pause_until = None;
        });
        tracing::warn!(shop_id, reason, "shop auto-paused");
    }

    // ========== Timers / sweep support ==========

    /// Eagerly resolve expired timers on every registered shop
    ///
    /// Returns the number of shops that changed state.
    pub fn resolve_timers(&self, now: i64) -> usize {
        let mut changed = 0;
        for entry in self.shops.iter() {
            if entry.value().write().resolve(now) {
                changed += 1;
            }
        }
        changed
    }

    /// Offer reservation ledger
    pub fn reservations(&self) -> &ReservationLedger {
        &self.reservations
    }

    /// Current admission count for a shop (monitoring)
    pub fn orders_last_hour(&self, shop_id: &str) -> u32 {
        self.capacity.count(shop_id, now_millis())
    }
}
