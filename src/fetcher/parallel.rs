use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::Semaphore;

use crate::app::{BroadsheetError, Result};
use crate::domain::{Item, Source, SourceState};
use crate::fetcher::{FetchResult, Fetcher};
use crate::normalizer::Normalizer;
use crate::store::Store;

pub const DEFAULT_WORKERS: usize = 10;

/// Outcome for one source: its current items, or why it failed.
pub type SourceResult = (Source, Result<Vec<Item>>);

pub struct ParallelFetcher {
    fetcher: Arc<dyn Fetcher>,
    semaphore: Arc<Semaphore>,
}

impl ParallelFetcher {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self::with_workers(fetcher, DEFAULT_WORKERS)
    }

    pub fn with_workers(fetcher: Arc<dyn Fetcher>, workers: usize) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    /// Fetch every source concurrently, writing new items through to
    /// `store`. Failures are reported per source and never abort the batch.
    pub async fn fetch_all<S: Store + Send + Sync + 'static>(
        &self,
        sources: &[Source],
        store: Arc<S>,
        normalizer: &Normalizer,
    ) -> Vec<SourceResult> {
        let mut handles = Vec::with_capacity(sources.len());

        for &source in sources {
            let fetcher = self.fetcher.clone();
            let semaphore = self.semaphore.clone();
            let store = store.clone();
            let normalizer = normalizer.clone();

            let handle = tokio::spawn(async move {
                let Ok(_permit) = semaphore.acquire_owned().await else {
                    return (source, Err(BroadsheetError::Other("fetch pool closed".into())));
                };

                let result = fetch_single_source(&*fetcher, &source, &*store, &normalizer).await;
                (source, result)
            });

            handles.push(handle);
        }

        join_all(handles)
            .await
            .into_iter()
            .filter_map(|joined| match joined {
                Ok(result) => Some(result),
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                    None
                }
            })
            .collect()
    }
}

async fn fetch_single_source<S: Store>(
    fetcher: &dyn Fetcher,
    source: &Source,
    store: &S,
    normalizer: &Normalizer,
) -> Result<Vec<Item>> {
    let state = store.get_source_state(source.url)?.unwrap_or_default();
    let result = fetcher
        .fetch(
            source.url,
            state.etag.as_deref(),
            state.last_modified.as_deref(),
        )
        .await?;

    match result {
        FetchResult::NotModified => {
            tracing::debug!("{} not modified, using cached items", source.name);
            store.get_items_by_source(source.name)
        }
        FetchResult::Content {
            body,
            etag,
            last_modified,
        } => {
            let items = normalizer.normalize(source, &body)?;
            let new_count = store.store_items(&items)?;
            store.update_source_state(source.url, &SourceState::new(etag, last_modified))?;
            tracing::info!(
                "Fetched {} items ({} new) from {}",
                items.len(),
                new_count,
                source.name
            );

            Ok(items)
        }
    }
}
