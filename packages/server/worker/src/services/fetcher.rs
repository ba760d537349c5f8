use anyhow::{Context, Result};
use serde_json::Value;
use shared::registry::Metric;
use std::time::Duration;

// Bounded so one slow remote call cannot block the next tick indefinitely.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[async_trait::async_trait]
pub trait HealthApi: Send + Sync {
    async fn fetch(&self, metric: Metric) -> Result<Value>;
}

/// Fetches one metric per request from the cloud health API, authenticated
/// with a bearer token.
pub struct RestHealthApi {
    client: reqwest::Client,
    base: String,
    token: String,
}

impl RestHealthApi {
    pub fn new(base: impl Into<String>, token: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base: base.into(),
            token: token.into(),
        })
    }
}

#[async_trait::async_trait]
impl HealthApi for RestHealthApi {
    async fn fetch(&self, metric: Metric) -> Result<Value> {
        let url = format!("{}/{}", self.base.trim_end_matches('/'), metric.key());

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .with_context(|| format!("Request to {} failed", url))?
            .error_for_status()
            .with_context(|| format!("Remote rejected request to {}", url))?;

        response
            .json()
            .await
            .context("Failed to decode health API response as JSON")
    }
}
