use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Local, Utc};

use crate::app::context::AppContext;
use crate::app::error::{BroadsheetError, Result};
use crate::domain::{Country, Item, Source};
use crate::normalizer::Normalizer;
use crate::store::Store;

/// Most items the digest takes from one source within a category.
const DIGEST_PER_SOURCE: usize = 2;

/// Narrowing applied by [`NewsService::filter`]. Empty fields match all.
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    pub source: Option<String>,
    pub category: Option<String>,
    pub since: Option<DateTime<Utc>>,
    /// 0 keeps every match.
    pub limit: usize,
}

impl FilterOptions {
    fn accepts(&self, item: &Item) -> bool {
        if let Some(source) = &self.source {
            if !item.source.eq_ignore_ascii_case(source) {
                return false;
            }
        }
        if let Some(since) = self.since {
            if item.published < since {
                return false;
            }
        }
        match &self.category {
            Some(category) => item.has_category(category),
            None => true,
        }
    }

    pub fn apply(&self, items: Vec<Item>) -> Vec<Item> {
        let mut matched: Vec<Item> = items.into_iter().filter(|i| self.accepts(i)).collect();
        truncate(&mut matched, self.limit);
        matched
    }
}

/// News operations for one country's sources.
pub struct NewsService<'a> {
    ctx: &'a AppContext,
    country: Country,
    normalizer: Normalizer,
}

impl<'a> NewsService<'a> {
    pub fn new(ctx: &'a AppContext, country: Country, full_content: bool) -> Self {
        Self {
            ctx,
            country,
            normalizer: Normalizer::with_full_content(full_content),
        }
    }

    pub fn country(&self) -> Country {
        self.country
    }

    pub fn sources(&self) -> &'static [Source] {
        self.country.sources()
    }

    /// Fetch every source, newest first. A `limit` of 0 keeps everything.
    ///
    /// Sources that fail are logged and skipped. If none succeed the cached
    /// items of this country are returned instead.
    pub async fn latest(&self, limit: usize) -> Result<Vec<Item>> {
        let results = self
            .ctx
            .parallel_fetcher
            .fetch_all(self.sources(), self.ctx.store.clone(), &self.normalizer)
            .await;

        let mut items = Vec::new();
        let mut succeeded = 0;
        for (source, result) in results {
            match result {
                Ok(mut fetched) => {
                    succeeded += 1;
                    items.append(&mut fetched);
                }
                Err(e) => tracing::warn!("Failed to fetch from {}: {}", source.name, e),
            }
        }

        if succeeded == 0 {
            items = self.cached()?;
            if items.is_empty() {
                return Err(BroadsheetError::NothingFetched);
            }
            tracing::warn!("All sources failed, showing {} cached articles", items.len());
        } else {
            self.ctx.store.mark_updated(Utc::now())?;
        }

        Ok(merge(items, limit))
    }

    /// Keyword search. A fresh cache is searched first; otherwise the
    /// sources are fetched and searched.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<Item>> {
        if !self.ctx.store.is_stale(self.ctx.cache.max_age(), Utc::now())? {
            let mut cached: Vec<Item> = self
                .ctx
                .store
                .search_items(query, 0)?
                .into_iter()
                .filter(|i| self.owns(i))
                .collect();
            if !cached.is_empty() {
                tracing::debug!("{} cached matches for '{}'", cached.len(), query);
                truncate(&mut cached, limit);
                return Ok(cached);
            }
        }

        let mut matches: Vec<Item> = self
            .latest(0)
            .await?
            .into_iter()
            .filter(|i| i.matches(query))
            .collect();
        truncate(&mut matches, limit);
        Ok(matches)
    }

    pub async fn filter(&self, options: &FilterOptions) -> Result<Vec<Item>> {
        Ok(options.apply(self.latest(0).await?))
    }

    /// A balanced selection of today's articles, restricted to
    /// `categories` when any are given. Falls back to the latest articles
    /// when nothing was published today.
    pub async fn digest(&self, categories: &[String], limit: usize) -> Result<Vec<Item>> {
        let all = self.latest(0).await?;
        let since = start_of_today();

        let todays = if categories.is_empty() {
            FilterOptions {
                since: Some(since),
                ..Default::default()
            }
            .apply(all.clone())
        } else {
            let mut seen = HashSet::new();
            categories
                .iter()
                .flat_map(|category| {
                    FilterOptions {
                        category: Some(category.clone()),
                        since: Some(since),
                        ..Default::default()
                    }
                    .apply(all.clone())
                })
                .filter(|i| seen.insert(i.link.clone()))
                .collect()
        };

        let pool = if todays.is_empty() {
            tracing::info!("No articles from today, using the latest instead");
            let mut latest = all;
            truncate(&mut latest, limit.saturating_mul(2));
            latest
        } else {
            todays
        };

        Ok(organize_digest(pool, limit))
    }

    fn owns(&self, item: &Item) -> bool {
        self.sources().iter().any(|s| s.name == item.source)
    }

    fn cached(&self) -> Result<Vec<Item>> {
        Ok(self
            .ctx
            .store
            .get_items(0)?
            .into_iter()
            .filter(|i| self.owns(i))
            .collect())
    }
}

fn start_of_today() -> DateTime<Utc> {
    Local::now()
        .date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(Utc::now)
}

fn truncate(items: &mut Vec<Item>, limit: usize) {
    if limit > 0 {
        items.truncate(limit);
    }
}

/// Drop repeated links, sort newest first and apply `limit`.
fn merge(items: Vec<Item>, limit: usize) -> Vec<Item> {
    let mut seen = HashSet::new();
    let mut merged: Vec<Item> = items
        .into_iter()
        .filter(|i| seen.insert(i.link.clone()))
        .collect();
    merged.sort_by(|a, b| b.published.cmp(&a.published));
    truncate(&mut merged, limit);
    merged
}

/// Pick up to `limit` items spread over categories and sources.
///
/// Each category (first tag, "general" if untagged) gets an equal share, with
/// at most two items per source inside it; leftover slots are filled in
/// input order. The selection is returned newest first. Lists no longer
/// than `limit` are only sorted.
pub fn organize_digest(mut items: Vec<Item>, limit: usize) -> Vec<Item> {
    if limit == 0 || items.len() <= limit {
        items.sort_by(|a, b| b.published.cmp(&a.published));
        return items;
    }

    let mut groups: Vec<(&str, Vec<usize>)> = Vec::new();
    for (index, item) in items.iter().enumerate() {
        let category = item.primary_category();
        match groups.iter_mut().find(|(c, _)| *c == category) {
            Some((_, members)) => members.push(index),
            None => groups.push((category, vec![index])),
        }
    }

    let per_category = (limit / groups.len()).max(1);
    let mut picked: Vec<usize> = Vec::with_capacity(limit);

    for (_, members) in &groups {
        let mut per_source: HashMap<&str, usize> = HashMap::new();
        let mut taken = 0;
        for &index in members {
            if taken >= per_category {
                break;
            }
            let count = per_source.entry(items[index].source.as_str()).or_default();
            if *count < DIGEST_PER_SOURCE {
                *count += 1;
                taken += 1;
                picked.push(index);
            }
        }
        if picked.len() >= limit {
            break;
        }
    }

    let mut chosen: HashSet<usize> = picked.iter().copied().collect();
    for index in 0..items.len() {
        if picked.len() >= limit {
            break;
        }
        if chosen.insert(index) {
            picked.push(index);
        }
    }
    picked.truncate(limit);
    let keep: HashSet<usize> = picked.into_iter().collect();

    let mut selected: Vec<Item> = items
        .into_iter()
        .enumerate()
        .filter(|(index, _)| keep.contains(index))
        .map(|(_, item)| item)
        .collect();
    selected.sort_by(|a, b| b.published.cmp(&a.published));
    selected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{FetchResult, Fetcher};
    use async_trait::async_trait;
    use chrono::{Duration, TimeZone};
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    /// One article per source; sports feeds are tagged "Sport". Every call
    /// publishes an hour later than the previous one.
    #[derive(Default)]
    struct StubFetcher {
        failing: AtomicBool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        async fn fetch(
            &self,
            url: &str,
            _etag: Option<&str>,
            _last_modified: Option<&str>,
        ) -> Result<FetchResult> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(BroadsheetError::Other("offline".into()));
            }
            let n = self.calls.fetch_add(1, Ordering::SeqCst) as i64;
            let published = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::hours(n);
            let category = if url.contains("sport") { "Sport" } else { "Algemeen" };
            let feed = format!(
                r#"<rss version="2.0"><channel><title>t</title><item>
                <title>Nieuws van {url}</title>
                <link>{url}/artikel</link>
                <pubDate>{}</pubDate>
                <category>{category}</category>
                <description>Verkiezingen en meer</description>
                </item></channel></rss>"#,
                published.to_rfc2822()
            );
            Ok(FetchResult::Content {
                body: feed.into_bytes(),
                etag: None,
                last_modified: None,
            })
        }
    }

    fn context() -> (AppContext, Arc<StubFetcher>) {
        let stub = Arc::new(StubFetcher::default());
        let ctx = AppContext::in_memory(stub.clone(), 4).unwrap();
        (ctx, stub)
    }

    fn item(source: &str, n: i64, category: &str) -> Item {
        let mut item = Item::new(source, &format!("https://{}/{}", source, n));
        item.published = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap() + Duration::minutes(n);
        item.categories.insert(category.to_string());
        item
    }

    fn is_newest_first(items: &[Item]) -> bool {
        items.windows(2).all(|w| w[0].published >= w[1].published)
    }

    #[test]
    fn test_latest_merges_all_sources() {
        let (ctx, _) = context();
        let service = NewsService::new(&ctx, Country::Nl, false);

        let items = tokio_test::block_on(service.latest(0)).unwrap();
        assert_eq!(items.len(), Country::Nl.sources().len());
        assert!(is_newest_first(&items));

        let limited = tokio_test::block_on(service.latest(3)).unwrap();
        assert_eq!(limited.len(), 3);
        assert!(ctx.store.last_update().unwrap().is_some());
    }

    #[test]
    fn test_latest_without_any_source_or_cache_fails() {
        let (ctx, stub) = context();
        stub.failing.store(true, Ordering::SeqCst);
        let service = NewsService::new(&ctx, Country::Nl, false);

        let err = tokio_test::block_on(service.latest(10)).unwrap_err();
        assert!(matches!(err, BroadsheetError::NothingFetched));
    }

    #[test]
    fn test_latest_falls_back_to_cache() {
        let (ctx, stub) = context();
        let service = NewsService::new(&ctx, Country::Nl, false);
        tokio_test::block_on(service.latest(0)).unwrap();

        stub.failing.store(true, Ordering::SeqCst);
        let items = tokio_test::block_on(service.latest(0)).unwrap();
        assert_eq!(items.len(), Country::Nl.sources().len());

        let other = NewsService::new(&ctx, Country::Fr, false);
        assert!(tokio_test::block_on(other.latest(0)).is_err());
    }

    #[test]
    fn test_search_uses_fresh_cache() {
        let (ctx, stub) = context();
        let service = NewsService::new(&ctx, Country::Nl, false);

        let fresh = tokio_test::block_on(service.search("VERKIEZINGEN", 2)).unwrap();
        assert_eq!(fresh.len(), 2);

        stub.failing.store(true, Ordering::SeqCst);
        let cached = tokio_test::block_on(service.search("nu.nl", 0)).unwrap();
        assert_eq!(cached.len(), 2);
        assert!(cached.iter().all(|i| i.matches("nu.nl")));
    }

    #[test]
    fn test_search_without_matches_is_empty() {
        let (ctx, _) = context();
        let service = NewsService::new(&ctx, Country::Nl, false);
        assert!(tokio_test::block_on(service.search("voetbal", 5)).unwrap().is_empty());
    }

    #[test]
    fn test_filter_by_source_and_category() {
        let (ctx, _) = context();
        let service = NewsService::new(&ctx, Country::Nl, false);

        let by_source = FilterOptions {
            source: Some("nos".into()),
            ..Default::default()
        };
        let items = tokio_test::block_on(service.filter(&by_source)).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, "NOS");

        let by_category = FilterOptions {
            category: Some("sport".into()),
            ..Default::default()
        };
        let items = tokio_test::block_on(service.filter(&by_category)).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].source, "NOS Sport");
    }

    #[test]
    fn test_filter_since_and_limit() {
        let items = vec![item("NOS", 1, "a"), item("NOS", 5, "a"), item("NOS", 9, "a")];
        let options = FilterOptions {
            since: Some(items[1].published),
            limit: 1,
            ..Default::default()
        };
        let filtered = options.apply(items);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].link, "https://NOS/5");
    }

    #[test]
    fn test_digest_falls_back_to_latest() {
        let (ctx, _) = context();
        let service = NewsService::new(&ctx, Country::Nl, false);

        // The stub publishes in 2024, so nothing is from today.
        let items = tokio_test::block_on(service.digest(&[], 4)).unwrap();
        assert_eq!(items.len(), 4);
        assert!(is_newest_first(&items));
    }

    #[test]
    fn test_organize_digest_keeps_short_lists() {
        let items = vec![item("NOS", 1, "a"), item("NOS", 2, "a")];
        let digest = organize_digest(items, 5);
        assert_eq!(digest.len(), 2);
        assert!(is_newest_first(&digest));
    }

    #[test]
    fn test_organize_digest_spreads_sources() {
        let mut items: Vec<Item> = (0..6).map(|n| item("NOS", n, "politiek")).collect();
        items.extend((10..12).map(|n| item("NU.nl", n, "politiek")));
        items.extend((20..24).map(|n| item("AD.nl", n, "sport")));

        let digest = organize_digest(items, 6);
        assert_eq!(digest.len(), 6);
        assert!(is_newest_first(&digest));

        let nos = digest.iter().filter(|i| i.source == "NOS").count();
        let nu = digest.iter().filter(|i| i.source == "NU.nl").count();
        let ad = digest.iter().filter(|i| i.source == "AD.nl").count();
        assert_eq!((nos, nu, ad), (3, 1, 2));
    }

    #[test]
    fn test_organize_digest_fills_remaining_slots() {
        let items: Vec<Item> = (0..8).map(|n| item("NOS", n, "politiek")).collect();
        let digest = organize_digest(items, 5);
        assert_eq!(digest.len(), 5);
        let links: HashSet<_> = digest.iter().map(|i| i.link.clone()).collect();
        assert_eq!(links.len(), 5);
    }
}
