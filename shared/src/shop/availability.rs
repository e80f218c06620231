//! Shop availability model - the admission gate state
//!
//! One record per shop. At most one *effective* state is active at a time;
//! timed sub-states (`BUSY`, `PAUSED`) carry an absolute expiry after which a
//! read resolves the state back to `OPEN` without external intervention.

use serde::{Deserialize, Serialize};

/// Shop base state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShopState {
    /// Accepting orders normally
    #[default]
    Open,
    /// Accepting orders with extra prep time quoted
    Busy,
    /// Manually paused - blocks admission
    Paused,
    /// Automatically paused after ignored orders - blocks admission
    AutoPaused,
    /// Closed - blocks admission
    Closed,
    /// On vacation - blocks admission
    Vacation,
}

impl ShopState {
    /// Whether this state blocks new order admission
    pub fn blocks_admission(&self) -> bool {
        matches!(
            self,
            ShopState::Paused | ShopState::AutoPaused | ShopState::Closed | ShopState::Vacation
        )
    }
}

/// Per-shop availability record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShopAvailability {
    /// Base state as last set
    pub base_state: ShopState,
    /// Extra prep minutes quoted while busy
    #[serde(default)]
    pub busy_extra_minutes: u32,
    /// Busy mode expiry (Unix millis); None = until ended explicitly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busy_until: Option<i64>,
    /// Pause reason (manual pause) or trigger description (auto pause)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_reason: Option<String>,
    /// Pause auto-resume time (Unix millis); None = until resumed explicitly
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_until: Option<i64>,
    /// Vacation end (Unix millis)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vacation_until: Option<i64>,
    /// Message shown to customers during vacation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vacation_message: Option<String>,
    /// Admission capacity: orders per trailing 60 minutes
    pub max_orders_per_hour: u32,
    /// Base prep time quoted to customers, minutes
    pub base_prep_minutes: u32,
}

impl Default for ShopAvailability {
    fn default() -> Self {
        Self {
            base_state: ShopState::Open,
            busy_extra_minutes: 0,
            busy_until: None,
            pause_reason: None,
            pause_until: None,
            vacation_until: None,
            vacation_message: None,
            max_orders_per_hour: 30,
            base_prep_minutes: 20,
        }
    }
}

impl ShopAvailability {
    /// Resolve the effective state at `now` without mutating the record
    ///
    /// Expired timed sub-states read as `OPEN`. A pause with no expiry (or an
    /// expiry still in the future) always reads as paused - pause blocks
    /// admission regardless of how close the expiry is.
    pub fn effective_state(&self, now: i64) -> ShopState {
        match self.base_state {
            ShopState::Busy => match self.busy_until {
                Some(until) if now >= until => ShopState::Open,
                _ => ShopState::Busy,
            },
            ShopState::Paused => match self.pause_until {
                Some(until) if now >= until => ShopState::Open,
                _ => ShopState::Paused,
            },
            ShopState::AutoPaused => match self.pause_until {
                Some(until) if now >= until => ShopState::Open,
                _ => ShopState::AutoPaused,
            },
            ShopState::Vacation => match self.vacation_until {
                Some(until) if now >= until => ShopState::Open,
                _ => ShopState::Vacation,
            },
            other => other,
        }
    }

    /// Apply lazy expiry: collapse expired timed sub-states to `OPEN`
    ///
    /// Returns true when the record changed. Called on every read path and
    /// eagerly by the sweep.
    pub fn resolve(&mut self, now: i64) -> bool {
        let effective = self.effective_state(now);
        if effective == self.base_state {
            return false;
        }
        // A timed sub-state expired: revert to OPEN and clear its fields
        self.base_state = ShopState::Open;
        self.busy_extra_minutes = 0;
        self.busy_until = None;
        self.pause_reason = None;
        self.pause_until = None;
        self.vacation_until = None;
        self.vacation_message = None;
        true
    }
}

/// Resolved availability snapshot returned by the status API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilitySnapshot {
    pub shop_id: String,
    /// Effective state after lazy expiry resolution
    pub state: ShopState,
    pub busy_extra_minutes: u32,
    /// Seconds until busy mode expires, if timed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub busy_remaining_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_reason: Option<String>,
    /// Seconds until the pause auto-resumes, if timed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_remaining_seconds: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vacation_until: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vacation_message: Option<String>,
    pub max_orders_per_hour: u32,
    pub base_prep_minutes: u32,
    /// Admissions recorded in the trailing 60 minutes
    pub orders_last_hour: u32,
    /// Rolling rating average (1.0 - 5.0), if any ratings exist
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_average: Option<f64>,
    pub rating_count: u64,
}
