//! Secondary ingestion path: polls the cloud health API on a fixed interval
//! and writes results through the same registry boundary as the webhook.

use shared::config::SyncConfig;
use shared::sink::StateSink;
use std::sync::Arc;

pub mod services;

use services::fetcher::HealthApi;

pub struct Poller {
    config: Arc<SyncConfig>,
    api: Arc<dyn HealthApi>,
    sink: Arc<dyn StateSink>,
}

impl Poller {
    pub fn new(config: Arc<SyncConfig>, api: Arc<dyn HealthApi>, sink: Arc<dyn StateSink>) -> Self {
        Self { config, api, sink }
    }

    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            interval_secs = self.config.poll_interval.as_secs(),
            "Poller starting..."
        );

        let mut ticks = tokio::time::interval(self.config.poll_interval);
        ticks.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticks.tick().await;
            self.poll_once().await;
        }
    }

    /// One tick: fetch every enabled metric. A failure for one metric drops
    /// that metric's update until the next tick and moves on; there is no
    /// retry or backoff.
    pub async fn poll_once(&self) {
        for metric in self.config.flags.enabled() {
            let record = match self.api.fetch(metric).await {
                Ok(record) => record,
                Err(e) => {
                    tracing::warn!(
                        metric = metric.key(),
                        error = %e,
                        "health API request failed, dropping this tick"
                    );
                    continue;
                }
            };

            if let Err(e) = shared::dispatch::apply(metric, &record, self.sink.as_ref()).await {
                tracing::warn!(
                    metric = metric.key(),
                    error = %e,
                    "dropping malformed health API response"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Result};
    use serde_json::{json, Value};
    use shared::config::EnableFlags;
    use shared::records::VarValue;
    use shared::registry::Metric;
    use std::collections::HashMap;
    use std::time::Duration;
    use vartree::MemoryTree;

    /// Serves canned responses; metrics without a script fail as transport
    /// errors.
    struct ScriptedApi(HashMap<&'static str, Value>);

    #[async_trait::async_trait]
    impl HealthApi for ScriptedApi {
        async fn fetch(&self, metric: Metric) -> Result<Value> {
            self.0
                .get(metric.key())
                .cloned()
                .ok_or_else(|| anyhow!("connection refused"))
        }
    }

    fn config(flags: EnableFlags) -> Arc<SyncConfig> {
        Arc::new(SyncConfig {
            flags,
            token: "test-token".to_string(),
            poll_interval: Duration::from_secs(60),
            api_base: String::new(),
        })
    }

    #[tokio::test]
    async fn poll_writes_through_the_registry_boundary() {
        let flags = EnableFlags::none().with(Metric::Steps).with(Metric::Distance);
        let tree = Arc::new(MemoryTree::new());
        vartree::reconcile(tree.as_ref(), &flags).await.unwrap();

        let api = Arc::new(ScriptedApi(HashMap::from([
            ("steps", json!({"value": 9001})),
            ("distance", json!({"value": 2500})),
        ])));

        let poller = Poller::new(config(flags), api, tree.clone());
        poller.poll_once().await;

        assert_eq!(tree.value("Steps"), Some(VarValue::Int(9001)));
        assert_eq!(tree.value("Distance"), Some(VarValue::Float(2.5)));
    }

    #[tokio::test]
    async fn transport_failure_for_one_metric_does_not_stop_the_others() {
        let flags = EnableFlags::none().with(Metric::Steps).with(Metric::Weight);
        let tree = Arc::new(MemoryTree::new());
        vartree::reconcile(tree.as_ref(), &flags).await.unwrap();

        // Only weight is scripted; steps fails.
        let api = Arc::new(ScriptedApi(HashMap::from([(
            "weight",
            json!({"value": 80.5}),
        )])));

        let poller = Poller::new(config(flags), api, tree.clone());
        poller.poll_once().await;

        assert_eq!(tree.value("Steps"), None);
        assert_eq!(tree.value("Weight"), Some(VarValue::Float(80.5)));
    }

    #[tokio::test]
    async fn malformed_response_is_dropped_for_this_tick() {
        let flags = EnableFlags::none().with(Metric::HeartRate);
        let tree = Arc::new(MemoryTree::new());
        vartree::reconcile(tree.as_ref(), &flags).await.unwrap();

        let api = Arc::new(ScriptedApi(HashMap::from([(
            "heart_rate",
            json!({"bpm": 64}),
        )])));

        let poller = Poller::new(config(flags), api, tree.clone());
        poller.poll_once().await;

        assert_eq!(tree.value("HeartRate"), None);
    }
}
