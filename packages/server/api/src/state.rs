use shared::config::SyncConfig;
use shared::sink::StateSink;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SyncConfig>,
    pub sink: Arc<dyn StateSink>,
}
