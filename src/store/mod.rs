pub mod sqlite;

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::app::Result;
use crate::domain::{Item, SourceState};

pub use sqlite::SqliteStore;

pub trait Store {
    // Item operations
    /// Insert or refresh items; returns how many were new.
    fn store_items(&self, items: &[Item]) -> Result<usize>;
    /// Newest first; a `limit` of 0 returns everything.
    fn get_items(&self, limit: usize) -> Result<Vec<Item>>;
    fn get_items_by_source(&self, source: &str) -> Result<Vec<Item>>;
    fn search_items(&self, query: &str, limit: usize) -> Result<Vec<Item>>;
    fn item_count(&self) -> Result<usize>;
    fn source_counts(&self) -> Result<Vec<(String, usize)>>;
    fn clear(&self) -> Result<()>;

    // Freshness
    fn last_update(&self) -> Result<Option<DateTime<Utc>>>;
    fn mark_updated(&self, at: DateTime<Utc>) -> Result<()>;

    /// True when nothing was ever fetched or the last fetch is older than
    /// `max_age`.
    fn is_stale(&self, max_age: Duration, now: DateTime<Utc>) -> Result<bool> {
        Ok(match self.last_update()? {
            Some(at) => now - at > max_age,
            None => true,
        })
    }

    // Conditional request state
    fn get_source_state(&self, url: &str) -> Result<Option<SourceState>>;
    fn update_source_state(&self, url: &str, state: &SourceState) -> Result<()>;
}

/// Summary shown by `broadsheet cache stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    pub total_items: usize,
    pub sources: Vec<(String, usize)>,
    pub last_update: Option<DateTime<Utc>>,
    pub stale: bool,
    pub path: Option<PathBuf>,
}

impl CacheStats {
    pub fn collect(
        store: &dyn Store,
        max_age: Duration,
        now: DateTime<Utc>,
        path: Option<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            total_items: store.item_count()?,
            sources: store.source_counts()?,
            last_update: store.last_update()?,
            stale: store.is_stale(max_age, now)?,
            path,
        })
    }
}
