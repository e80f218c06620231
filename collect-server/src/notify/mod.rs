//! Notification collaborator
//!
//! Delivery mechanics (SMS/WhatsApp/email) are out of scope; the engine only
//! fires `notify(order_id, kind, params)` after a transition is durably
//! committed. Failures are logged and never roll back the transition.
//!
//! The implementation is selected at process start by configuration and
//! injected into the lifecycle manager - no global lookup.

mod log;
mod webhook;

pub use log::LogNotifier;
pub use webhook::WebhookNotifier;

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Notification kinds the lifecycle emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    OrderAccepted,
    OrderReady,
    WeightReview,
    StockIssue,
    OrderCancelled,
}

impl NotifyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotifyKind::OrderAccepted => "order_accepted",
            NotifyKind::OrderReady => "order_ready",
            NotifyKind::WeightReview => "weight_review",
            NotifyKind::StockIssue => "stock_issue",
            NotifyKind::OrderCancelled => "order_cancelled",
        }
    }
}

/// Notification delivery errors (non-fatal by contract)
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("delivery failed: {0}")]
    Delivery(String),
}

/// Notification collaborator seam
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, order_id: &str, kind: NotifyKind, params: Value)
        -> Result<(), NotifyError>;
}

/// Select a notifier implementation from configuration
///
/// `notifier = "webhook"` requires `webhook_url`; anything else falls back to
/// the log notifier.
pub fn from_config(notifier: &str, webhook_url: Option<&str>) -> Arc<dyn Notifier> {
    match (notifier, webhook_url) {
        ("webhook", Some(url)) => Arc::new(WebhookNotifier::new(url.to_string())),
        ("webhook", None) => {
            tracing::warn!("notifier=webhook but WEBHOOK_URL is unset, falling back to log");
            Arc::new(LogNotifier)
        }
        _ => Arc::new(LogNotifier),
    }
}
