//! Remote text analysis over HTTP.
//!
//! Sends `{"input": text, "model": model}` with an optional bearer token and
//! reads `keywords` / `sentiment` from the JSON response. Missing fields fall
//! back to `[]` / `"neutral"`; a non-2xx status, a transport error or a body
//! that is not a JSON object is an [`EnrichError`], which the coordinator
//! turns into [`Enrichment::neutral`].

use async_trait::async_trait;
use chatpulse_core::config::EnrichmentConfig;
use chatpulse_core::sinks::Enricher;
use chatpulse_core::{EnrichError, Enrichment};
use serde_json::{json, Value};
use std::time::Duration;

pub struct HttpEnricher {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl HttpEnricher {
    /// `timeout` is applied per request by the HTTP client, in addition to
    /// the coordinator's own bound.
    pub fn new(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, EnrichError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| EnrichError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            model: model.into(),
            api_key,
        })
    }

    pub fn from_config(config: &EnrichmentConfig) -> Result<Self, EnrichError> {
        Self::new(
            config.endpoint.clone(),
            config.model.clone(),
            config.api_key(),
            config.timeout(),
        )
    }
}

#[async_trait]
impl Enricher for HttpEnricher {
    async fn analyze(&self, text: &str) -> Result<Enrichment, EnrichError> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&json!({ "input": text, "model": self.model }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| EnrichError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(EnrichError::Status(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| EnrichError::Malformed(e.to_string()))?;
        parse_response(&body)
    }
}

/// Pull `keywords` and `sentiment` out of a response body.
pub fn parse_response(body: &Value) -> Result<Enrichment, EnrichError> {
    let object = body
        .as_object()
        .ok_or_else(|| EnrichError::Malformed("response is not a JSON object".to_string()))?;

    let keywords = match object.get("keywords") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|v| v.as_str().map(str::to_string))
            .collect(),
        Some(other) => {
            return Err(EnrichError::Malformed(format!(
                "keywords is not an array: {other}"
            )))
        }
    };

    let sentiment = match object.get("sentiment") {
        None | Some(Value::Null) => "neutral".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => {
            return Err(EnrichError::Malformed(format!(
                "sentiment is not a string: {other}"
            )))
        }
    };

    Ok(Enrichment { keywords, sentiment })
}
