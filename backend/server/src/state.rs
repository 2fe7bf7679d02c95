use std::{sync::Arc, time::Instant};

use super::{
    config::Config,
    database::{FeedbackStore, MongoStore},
    error::StartupError,
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn FeedbackStore>,
    pub started_at: Instant,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Arc<Self>, StartupError> {
        let store = MongoStore::connect(&config).await?;

        Ok(Self::with_store(config, Arc::new(store)))
    }

    pub fn with_store(config: Config, store: Arc<dyn FeedbackStore>) -> Arc<Self> {
        Arc::new(Self {
            config,
            store,
            started_at: Instant::now(),
        })
    }
}
