//! Payment gateway collaborator
//!
//! Capture/refund execution is out of scope; the engine only signals the
//! gateway around acceptance and cancellation. A failed capture must be
//! resolved by the gateway before the order progresses past acceptance -
//! that resolution lives on the gateway side, not here.

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("gateway error: {0}")]
    Gateway(String),
}

/// Payment collaborator seam
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Signal that an order was accepted at the given total
    async fn authorize(&self, order_id: &str, amount_cents: i64) -> Result<(), PaymentError>;

    /// Signal that an order terminated without pickup (cancel/deny)
    async fn release(&self, order_id: &str) -> Result<(), PaymentError>;
}

/// Gateway that accepts everything (pay-at-counter shops)
pub struct NoopGateway;

#[async_trait]
impl PaymentGateway for NoopGateway {
    async fn authorize(&self, order_id: &str, amount_cents: i64) -> Result<(), PaymentError> {
        tracing::debug!(order_id, amount_cents, "noop payment authorize");
        Ok(())
    }

    async fn release(&self, order_id: &str) -> Result<(), PaymentError> {
        tracing::debug!(order_id, "noop payment release");
        Ok(())
    }
}
