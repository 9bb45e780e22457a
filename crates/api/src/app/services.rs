use std::sync::Arc;

use ecovision_infra::{
    AppConfig, ClimateStore, InMemoryClimateStore, MySqlClimateStore, StoreError, StoreKind,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppServices {
    store: Arc<dyn ClimateStore>,
}

impl AppServices {
    pub fn new(store: Arc<dyn ClimateStore>) -> Self {
        Self { store }
    }

    /// Services over the bundled sample dataset (dev/test).
    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(Self::new(Arc::new(InMemoryClimateStore::with_sample_data()?)))
    }

    pub fn store(&self) -> &dyn ClimateStore {
        self.store.as_ref()
    }
}

pub async fn build_services(config: &AppConfig) -> Result<AppServices, StoreError> {
    match config.store {
        StoreKind::InMemory => {
            tracing::info!("using in-memory store with bundled sample data");
            AppServices::in_memory()
        }
        StoreKind::MySql => {
            tracing::info!(
                host = %config.database.host,
                port = config.database.port,
                database = %config.database.database,
                "connecting to MySQL"
            );
            let store = MySqlClimateStore::connect(&config.database).await?;
            Ok(AppServices::new(Arc::new(store)))
        }
    }
}
