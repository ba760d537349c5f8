use bridge_worker::services::fetcher::RestHealthApi;
use bridge_worker::Poller;
use dotenv::dotenv;
use shared::config::SyncConfig;
use std::sync::Arc;
use vartree::MemoryTree;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    tracing::info!("HealthBridge worker starting...");

    let config = Arc::new(SyncConfig::from_env()?);
    if config.token.is_empty() {
        anyhow::bail!("HEALTH_TOKEN must be set for the polling worker");
    }

    let api = Arc::new(RestHealthApi::new(
        config.api_base.clone(),
        config.token.clone(),
    )?);

    let sink = Arc::new(MemoryTree::new());
    vartree::reconcile(sink.as_ref(), &config.flags).await?;

    Poller::new(config, api, sink).run().await
}
