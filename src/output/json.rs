//! Pretty-printed JSON output.

use serde::Serialize;

use crate::app::Result;
use crate::domain::{Country, Item, Source};
use crate::store::CacheStats;

#[derive(Debug, Serialize)]
struct CountryEntry {
    code: &'static str,
    name: &'static str,
    sources: usize,
}

pub fn items(items: &[Item]) -> Result<String> {
    Ok(serde_json::to_string_pretty(items)?)
}

pub fn sources(sources: &[Source]) -> Result<String> {
    Ok(serde_json::to_string_pretty(sources)?)
}

pub fn countries() -> Result<String> {
    let entries: Vec<CountryEntry> = Country::ALL
        .iter()
        .map(|c| CountryEntry {
            code: c.code(),
            name: c.name(),
            sources: c.sources().len(),
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

pub fn cache_stats(stats: &CacheStats) -> Result<String> {
    Ok(serde_json::to_string_pretty(stats)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_items_serialize_as_array() {
        let mut item = Item::new("NOS", "https://nos.nl/1");
        item.title = "Een".into();
        item.categories.insert("Politiek".into());

        let value: Value = serde_json::from_str(&items(&[item]).unwrap()).unwrap();
        assert_eq!(value[0]["title"], "Een");
        assert_eq!(value[0]["source"], "NOS");
        assert_eq!(value[0]["categories"][0], "Politiek");
    }

    #[test]
    fn test_countries() {
        let value: Value = serde_json::from_str(&countries().unwrap()).unwrap();
        let list = value.as_array().unwrap();
        assert_eq!(list.len(), Country::ALL.len());
        assert_eq!(list[0]["code"], "nl");
        assert_eq!(list[0]["sources"], 7);
    }

    #[test]
    fn test_sources() {
        let value: Value = serde_json::from_str(&sources(Country::Uk.sources()).unwrap()).unwrap();
        assert_eq!(value[1]["name"], "The Guardian");
    }
}
