//! Alert sinks.
//!
//! [`LogAlertSink`] only records the alert in the log. [`WebhookAlertSink`]
//! POSTs `{"chat_id": .., "text": ..}` to a configured URL on a detached task;
//! delivery failures are logged and dropped.

use chatpulse_core::sinks::AlertSink;
use serde_json::json;
use std::time::Duration;

#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlertSink;

impl AlertSink for LogAlertSink {
    fn send_alert(&self, chat_id: i64, text: &str) {
        tracing::warn!(chat_id, alert = text, "alert");
    }
}

pub struct WebhookAlertSink {
    client: reqwest::Client,
    url: String,
}

impl WebhookAlertSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(timeout).build()?,
            url: url.into(),
        })
    }
}

impl AlertSink for WebhookAlertSink {
    fn send_alert(&self, chat_id: i64, text: &str) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(chat_id, "no runtime to deliver alert, dropping");
            return;
        };
        let request = self
            .client
            .post(&self.url)
            .json(&json!({ "chat_id": chat_id, "text": text }));
        runtime.spawn(async move {
            match request.send().await {
                Ok(response) if response.status().is_success() => {
                    tracing::debug!(chat_id, "alert delivered");
                }
                Ok(response) => {
                    tracing::warn!(chat_id, status = response.status().as_u16(), "alert rejected");
                }
                Err(e) => {
                    tracing::warn!(chat_id, error = %e, "alert delivery failed");
                }
            }
        });
    }
}
