use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::{
    config::app_config::AppConfig,
    db::game::{GameStore, PgGameStore},
    models::error::ServerError,
};

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn GameStore>,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn GameStore>, config: Arc<AppConfig>) -> Arc<Self> {
        Arc::new(Self { store, config })
    }

    /// Opens the pool once, runs pending migrations and wraps both in shared state.
    pub async fn connect(config: Arc<AppConfig>) -> Result<Arc<Self>, ServerError> {
        let db = &config.database;
        let pool = PgPoolOptions::new()
            .max_connections(db.max_connections)
            .connect_with(db.connect_options()?)
            .await?;
        info!("Connected to database {}", db.target());

        let store = PgGameStore::new(pool, config.wanted_state.clone());
        sqlx::migrate!().run(store.get_pool()).await?;

        Ok(Self::new(Arc::new(store), config))
    }

    pub fn get_store(&self) -> &dyn GameStore {
        self.store.as_ref()
    }

    pub fn get_config(&self) -> &AppConfig {
        &self.config
    }
}
