use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use rusqlite_migration::{Migrations, M};

use crate::app::{BroadsheetError, Result};
use crate::domain::{Item, SourceState};
use crate::store::Store;

const LAST_UPDATE_KEY: &str = "last_update";

const ITEM_COLUMNS: &str =
    "id, title, summary, body, link, source, published_at, image, categories";

pub struct SqliteStore {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        let store = Self {
            conn: Mutex::new(conn),
            path: Some(path.as_ref().to_path_buf()),
        };
        store.run_migrations()?;
        Ok(store)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self {
            conn: Mutex::new(conn),
            path: None,
        };
        store.run_migrations()?;
        Ok(store)
    }

    /// Database file, `None` for an in-memory store.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|e| {
            BroadsheetError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(1),
                Some(e.to_string()),
            ))
        })
    }

    fn run_migrations(&self) -> Result<()> {
        let migrations = Migrations::new(vec![M::up(include_str!(
            "../../migrations/001-initial/up.sql"
        ))]);

        let mut conn = self.conn()?;
        migrations
            .to_latest(&mut conn)
            .map_err(|_| BroadsheetError::Database(rusqlite::Error::InvalidQuery))?;

        Ok(())
    }

    fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| s.parse::<DateTime<Utc>>().ok())
    }

    fn item_from_row(row: &Row<'_>) -> rusqlite::Result<Item> {
        let categories: String = row.get(8)?;
        Ok(Item {
            id: row.get(0)?,
            title: row.get(1)?,
            summary: row.get(2)?,
            body: row.get(3)?,
            link: row.get(4)?,
            source: row.get(5)?,
            published: row
                .get::<_, String>(6)
                .ok()
                .and_then(|s| Self::parse_datetime(&s))
                .unwrap_or_else(Utc::now),
            image: row.get(7)?,
            categories: serde_json::from_str::<BTreeSet<String>>(&categories).unwrap_or_default(),
        })
    }
}

/// `%query%` with LIKE wildcards in the query taken literally.
fn like_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// SQLite treats a negative LIMIT as unbounded.
fn sql_limit(limit: usize) -> i64 {
    if limit == 0 {
        -1
    } else {
        i64::try_from(limit).unwrap_or(i64::MAX)
    }
}

impl Store for SqliteStore {
    fn store_items(&self, items: &[Item]) -> Result<usize> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;
        let fetched_at = Utc::now().to_rfc3339();
        let mut count = 0;

        for item in items {
            let categories = serde_json::to_string(&item.categories)?;
            let inserted = tx.execute(
                "INSERT OR IGNORE INTO items
                 (id, title, summary, body, link, source, published_at, image, categories, fetched_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                params![
                    item.id,
                    item.title,
                    item.summary,
                    item.body,
                    item.link,
                    item.source,
                    item.published.to_rfc3339(),
                    item.image,
                    categories,
                    fetched_at
                ],
            )?;

            if inserted == 0 {
                // A summary-only refresh must not wipe a previously fetched body.
                tx.execute(
                    "UPDATE items SET title = ?2, summary = ?3,
                     body = CASE WHEN ?4 = '' THEN body ELSE ?4 END,
                     published_at = ?5, image = COALESCE(?6, image), categories = ?7,
                     fetched_at = ?8
                     WHERE id = ?1",
                    params![
                        item.id,
                        item.title,
                        item.summary,
                        item.body,
                        item.published.to_rfc3339(),
                        item.image,
                        categories,
                        fetched_at
                    ],
                )?;
            }
            count += inserted;
        }

        tx.commit()?;
        Ok(count)
    }

    fn get_items(&self, limit: usize) -> Result<Vec<Item>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM items ORDER BY published_at DESC, fetched_at DESC LIMIT ?1",
            ITEM_COLUMNS
        ))?;

        let items = stmt
            .query_map(params![sql_limit(limit)], Self::item_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn get_items_by_source(&self, source: &str) -> Result<Vec<Item>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM items WHERE source = ?1 ORDER BY published_at DESC",
            ITEM_COLUMNS
        ))?;

        let items = stmt
            .query_map(params![source], Self::item_from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn search_items(&self, query: &str, limit: usize) -> Result<Vec<Item>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM items
             WHERE title LIKE ?1 ESCAPE '\\' OR summary LIKE ?1 ESCAPE '\\' OR body LIKE ?1 ESCAPE '\\'
             ORDER BY published_at DESC LIMIT ?2",
            ITEM_COLUMNS
        ))?;

        let items = stmt
            .query_map(
                params![like_pattern(query.trim()), sql_limit(limit)],
                Self::item_from_row,
            )?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(items)
    }

    fn item_count(&self) -> Result<usize> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM items", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn source_counts(&self) -> Result<Vec<(String, usize)>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT source, COUNT(*) FROM items GROUP BY source ORDER BY COUNT(*) DESC, source",
        )?;

        let counts = stmt
            .query_map([], |row| {
                let count: i64 = row.get(1)?;
                Ok((row.get(0)?, usize::try_from(count).unwrap_or(0)))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(counts)
    }

    fn clear(&self) -> Result<()> {
        let conn = self.conn()?;
        conn.execute_batch("DELETE FROM items; DELETE FROM source_state; DELETE FROM meta;")?;
        Ok(())
    }

    fn last_update(&self) -> Result<Option<DateTime<Utc>>> {
        let conn = self.conn()?;
        let value: Option<String> = conn
            .query_row(
                "SELECT value FROM meta WHERE key = ?1",
                params![LAST_UPDATE_KEY],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value.and_then(|s| Self::parse_datetime(&s)))
    }

    fn mark_updated(&self, at: DateTime<Utc>) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO meta (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            params![LAST_UPDATE_KEY, at.to_rfc3339()],
        )?;
        Ok(())
    }

    fn get_source_state(&self, url: &str) -> Result<Option<SourceState>> {
        let conn = self.conn()?;
        let state = conn
            .query_row(
                "SELECT etag, last_modified, fetched_at FROM source_state WHERE url = ?1",
                params![url],
                |row| {
                    Ok(SourceState {
                        etag: row.get(0)?,
                        last_modified: row.get(1)?,
                        fetched_at: row
                            .get::<_, Option<String>>(2)?
                            .and_then(|s| Self::parse_datetime(&s)),
                    })
                },
            )
            .optional()?;

        Ok(state)
    }

    fn update_source_state(&self, url: &str, state: &SourceState) -> Result<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO source_state (url, etag, last_modified, fetched_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(url) DO UPDATE SET etag = ?2, last_modified = ?3, fetched_at = ?4",
            params![
                url,
                state.etag,
                state.last_modified,
                state.fetched_at.map(|dt| dt.to_rfc3339())
            ],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn item(source: &str, n: u32, title: &str) -> Item {
        let mut item = Item::new(source, &format!("https://{}.example/{}", source, n));
        item.title = title.into();
        item.summary = format!("Samenvatting van {}", title);
        item.published = Utc.with_ymd_and_hms(2024, 3, 1, n, 0, 0).unwrap();
        item
    }

    #[test]
    fn test_store_and_get_items_newest_first() {
        let store = SqliteStore::in_memory().unwrap();
        let items = vec![item("nos", 1, "Eerste"), item("nos", 3, "Derde"), item("nu", 2, "Tweede")];

        assert_eq!(store.store_items(&items).unwrap(), 3);

        let titles: Vec<String> = store.get_items(0).unwrap().into_iter().map(|i| i.title).collect();
        assert_eq!(titles, vec!["Derde", "Tweede", "Eerste"]);
        assert_eq!(store.get_items(2).unwrap().len(), 2);
    }

    #[test]
    fn test_items_round_trip_fields() {
        let store = SqliteStore::in_memory().unwrap();
        let mut original = item("nos", 1, "Eerste");
        original.image = Some("https://img.example/1.jpg".into());
        original.categories.insert("sport".into());
        store.store_items(std::slice::from_ref(&original)).unwrap();

        let stored = store.get_items(1).unwrap().remove(0);
        assert_eq!(stored, original);
    }

    #[test]
    fn test_duplicates_are_not_counted_and_keep_body() {
        let store = SqliteStore::in_memory().unwrap();
        let mut full = item("nos", 1, "Eerste");
        full.body = "Volledige tekst".into();
        assert_eq!(store.store_items(&[full]).unwrap(), 1);

        let refreshed = item("nos", 1, "Eerste (bijgewerkt)");
        assert_eq!(store.store_items(&[refreshed]).unwrap(), 0);

        let stored = store.get_items(0).unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].title, "Eerste (bijgewerkt)");
        assert_eq!(stored[0].body, "Volledige tekst");
    }

    #[test]
    fn test_search_is_case_insensitive_phrase() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .store_items(&[item("nos", 1, "Kabinet valt"), item("nos", 2, "Storm op komst")])
            .unwrap();

        let found = store.search_items("KABINET", 10).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Kabinet valt");

        assert!(store.search_items("kabinet storm", 10).unwrap().is_empty());
        assert_eq!(store.search_items("samenvatting", 0).unwrap().len(), 2);
    }

    #[test]
    fn test_search_treats_wildcards_literally() {
        let store = SqliteStore::in_memory().unwrap();
        store.store_items(&[item("nos", 1, "Rente stijgt")]).unwrap();
        assert!(store.search_items("100%", 10).unwrap().is_empty());
        assert!(store.search_items("_", 10).unwrap().is_empty());
    }

    #[test]
    fn test_source_counts_and_filter() {
        let store = SqliteStore::in_memory().unwrap();
        store
            .store_items(&[item("nos", 1, "a"), item("nos", 2, "b"), item("nu", 3, "c")])
            .unwrap();

        assert_eq!(store.item_count().unwrap(), 3);
        assert_eq!(
            store.source_counts().unwrap(),
            vec![("nos".to_string(), 2), ("nu".to_string(), 1)]
        );
        assert_eq!(store.get_items_by_source("nu").unwrap().len(), 1);
    }

    #[test]
    fn test_staleness() {
        let store = SqliteStore::in_memory().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let hour = Duration::hours(1);

        assert!(store.is_stale(hour, now).unwrap());

        store.mark_updated(now - Duration::minutes(30)).unwrap();
        assert!(!store.is_stale(hour, now).unwrap());
        assert_eq!(store.last_update().unwrap(), Some(now - Duration::minutes(30)));

        store.mark_updated(now - Duration::minutes(90)).unwrap();
        assert!(store.is_stale(hour, now).unwrap());
    }

    #[test]
    fn test_source_state_round_trip() {
        let store = SqliteStore::in_memory().unwrap();
        let url = "https://feeds.nos.nl/nosnieuwsalgemeen";
        assert_eq!(store.get_source_state(url).unwrap(), None);

        let state = SourceState {
            etag: Some("\"abc\"".into()),
            last_modified: Some("Fri, 01 Mar 2024 12:00:00 GMT".into()),
            fetched_at: Some(Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()),
        };
        store.update_source_state(url, &state).unwrap();
        assert_eq!(store.get_source_state(url).unwrap(), Some(state));
    }

    #[test]
    fn test_clear_removes_everything() {
        let store = SqliteStore::in_memory().unwrap();
        store.store_items(&[item("nos", 1, "a")]).unwrap();
        store.mark_updated(Utc::now()).unwrap();

        store.clear().unwrap();
        assert_eq!(store.item_count().unwrap(), 0);
        assert_eq!(store.last_update().unwrap(), None);
    }

    #[test]
    fn test_file_store_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cache.db");
        let store = SqliteStore::new(&path).unwrap();
        assert_eq!(store.path(), Some(path.as_path()));
        assert_eq!(SqliteStore::in_memory().unwrap().path(), None);
    }
}
