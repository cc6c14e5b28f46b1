use std::sync::Arc;

use tracing::warn;

use super::{
    config::{Config, StoreKind},
    database::{DocumentStore, RedisStore, StoreError},
    memory::MemoryStore,
};

pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    pub async fn new(config: Config) -> Result<Arc<Self>, StoreError> {
        let store: Arc<dyn DocumentStore> = match config.store {
            StoreKind::Redis => Arc::new(RedisStore::connect(&config.redis_url).await?),
            StoreKind::Memory => {
                warn!("Using the in-memory store, nothing will survive a restart");
                Arc::new(MemoryStore::default())
            }
        };

        Ok(Self::with_store(config, store))
    }

    pub fn with_store(config: Config, store: Arc<dyn DocumentStore>) -> Arc<Self> {
        Arc::new(Self { config, store })
    }
}
