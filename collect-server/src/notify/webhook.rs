//! Webhook notifier
//!
//! POSTs every notification to a configured URL. The receiving side owns the
//! actual SMS/WhatsApp/email fan-out.

use super::{Notifier, NotifyError, NotifyKind};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::time::Duration;

/// HTTP delivery timeout
const DELIVERY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self { client, url }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn notify(
        &self,
        order_id: &str,
        kind: NotifyKind,
        params: Value,
    ) -> Result<(), NotifyError> {
        let body = json!({
            "order_id": order_id,
            "event": kind.as_str(),
            "params": params,
        });

        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        if !response.status().is_success() {
            return Err(NotifyError::Delivery(format!(
                "webhook returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}
