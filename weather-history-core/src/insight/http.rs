use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::{
    Error, Result,
    model::{InsightDraft, InsightRequest},
};

use super::InsightGenerator;

/// Delegates narrative generation to a remote service.
///
/// The service receives the [`InsightRequest`] as JSON and must answer with an
/// [`InsightDraft`] body (`summary`, `alerts`, `recommendations`, `trends`).
#[derive(Debug, Clone)]
pub struct HttpInsightGenerator {
    endpoint: String,
    api_key: Option<String>,
    http: Client,
}

impl HttpInsightGenerator {
    pub fn new(endpoint: String, api_key: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("weather-history/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client for insight generator")?;

        Ok(Self {
            endpoint,
            api_key,
            http,
        })
    }
}

#[async_trait]
impl InsightGenerator for HttpInsightGenerator {
    async fn generate(&self, request: &InsightRequest) -> Result<InsightDraft> {
        let mut req = self.http.post(&self.endpoint).json(request);
        if let Some(key) = &self.api_key {
            req = req.bearer_auth(key);
        }

        let res = req
            .send()
            .await
            .map_err(|e| Error::generation_with("Failed to send request to insight service", e))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| Error::generation_with("Failed to read insight service response body", e))?;

        if !status.is_success() {
            return Err(Error::generation(format!(
                "Insight service request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        debug!(bytes = body.len(), "Received insight service response");

        serde_json::from_str(&body)
            .map_err(|e| Error::generation_with("Failed to parse insight service JSON", e))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
