use std::sync::Arc;

use anyhow::Context;

use crate::{
    config::{Config, StorageBackend},
    session::{MemorySessionStore, SessionStore},
    store::{AppStore, JsonFileStore, SqliteStore},
};

/// Shared per-process state: the configuration, the record store selected by
/// it, and the session store.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn AppStore>,
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    pub fn new(config: Config) -> anyhow::Result<Arc<Self>> {
        let store: Arc<dyn AppStore> = match config.backend {
            StorageBackend::Sqlite => Arc::new(
                SqliteStore::open(&config.storage_path).with_context(|| {
                    format!(
                        "failed to open SQLite store at {}",
                        config.storage_path.display()
                    )
                })?,
            ),
            StorageBackend::Json => Arc::new(
                JsonFileStore::open(&config.storage_path).with_context(|| {
                    format!(
                        "failed to open JSON store at {}",
                        config.storage_path.display()
                    )
                })?,
            ),
        };

        Ok(Arc::new(Self {
            config,
            store,
            sessions: Arc::new(MemorySessionStore::new()),
        }))
    }
}
