use std::path::PathBuf;
use std::sync::Arc;

use crate::app::error::{BroadsheetError, Result};
use crate::config::{CacheConfig, Config};
use crate::fetcher::http_fetcher::HttpFetcher;
use crate::fetcher::parallel::ParallelFetcher;
use crate::fetcher::Fetcher;
use crate::store::sqlite::SqliteStore;

/// Shared services handed to every command.
pub struct AppContext {
    pub store: Arc<SqliteStore>,
    pub parallel_fetcher: ParallelFetcher,
    pub cache: CacheConfig,
}

impl AppContext {
    /// Build from configuration; `workers` overrides `[fetch] workers`.
    pub fn from_config(config: &Config, workers: Option<usize>) -> Result<Self> {
        let db_path = match &config.cache.path {
            Some(p) => p.clone(),
            None => Self::default_db_path()?,
        };

        let store = SqliteStore::new(&db_path)?;
        tracing::debug!("Opened cache at {}", db_path.display());

        let fetcher: Arc<dyn Fetcher> = Arc::new(HttpFetcher::with_timeout(config.fetch.timeout())?);
        let workers = workers.unwrap_or(config.fetch.workers);

        Ok(Self::with_parts(store, fetcher, workers, config.cache.clone()))
    }

    /// Context backed by an in-memory cache.
    pub fn in_memory(fetcher: Arc<dyn Fetcher>, workers: usize) -> Result<Self> {
        let store = SqliteStore::in_memory()?;
        Ok(Self::with_parts(store, fetcher, workers, CacheConfig::default()))
    }

    pub fn with_parts(
        store: SqliteStore,
        fetcher: Arc<dyn Fetcher>,
        workers: usize,
        cache: CacheConfig,
    ) -> Self {
        Self {
            store: Arc::new(store),
            parallel_fetcher: ParallelFetcher::with_workers(fetcher, workers),
            cache,
        }
    }

    fn default_db_path() -> Result<PathBuf> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| BroadsheetError::Config("Could not find data directory".into()))?;
        let app_dir = data_dir.join("broadsheet");
        std::fs::create_dir_all(&app_dir)?;
        Ok(app_dir.join("cache.db"))
    }
}
