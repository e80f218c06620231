//! Log-only notifier (default)

use super::{Notifier, NotifyError, NotifyKind};
use async_trait::async_trait;
use serde_json::Value;

/// Writes every notification to the structured log instead of delivering it
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(
        &self,
        order_id: &str,
        kind: NotifyKind,
        params: Value,
    ) -> Result<(), NotifyError> {
        tracing::info!(
            order_id = %order_id,
            kind = kind.as_str(),
            params = %params,
            "notification"
        );
        Ok(())
    }
}
