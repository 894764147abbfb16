//! Unstyled text listings, suitable for pipes.

use std::fmt::Write;

use chrono::Local;

use crate::domain::{Country, Item, Source};
use crate::output::markdown::group_by_category;
use crate::store::CacheStats;

const SEPARATOR_WIDTH: usize = 50;

pub fn items(items: &[Item]) -> String {
    let mut out = String::new();
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            let _ = write!(out, "\n{}\n", "-".repeat(SEPARATOR_WIDTH));
        }
        let _ = writeln!(out, "Title: {}", item.display_title());
        let _ = writeln!(out, "Source: {}", item.source);
        let _ = writeln!(
            out,
            "Published: {}",
            item.published.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
        if !item.summary.is_empty() {
            let _ = writeln!(out, "Description: {}", item.summary);
        }
        let _ = writeln!(out, "URL: {}", item.link);
    }
    out
}

fn language_heading(sources: &[Source]) -> &'static str {
    match sources.first().map(|s| s.language) {
        Some("nl") => "Dutch News Sources",
        Some("en") => "English News Sources",
        Some("de") => "German News Sources",
        Some("fr") => "French News Sources",
        _ => "News Sources",
    }
}

pub fn sources(sources: &[Source]) -> String {
    let heading = format!("Available {}:", language_heading(sources));
    let mut out = format!("{}\n{}\n", heading, "=".repeat(heading.chars().count()));

    for (category, members) in group_by_category(sources) {
        let _ = write!(out, "\n{}:\n{}\n", category, "-".repeat(category.len() + 1));
        for source in members {
            let _ = writeln!(out, "• {}", source.name);
            let _ = writeln!(out, "  {}", source.description);
            let _ = writeln!(out, "  URL: {}", source.url);
            let _ = writeln!(out, "  Language: {}\n", source.language);
        }
    }
    out
}

pub fn countries() -> String {
    let mut out = String::from("Supported Countries:\n====================\n");
    for country in Country::ALL {
        let _ = writeln!(out, "  {} - {}", country.code(), country.name());
    }
    out.push_str("\nUsage: pass the code with --country\n");
    out.push_str("Example: broadsheet latest --country us --limit 10\n");
    out
}

pub fn cache_stats(stats: &CacheStats) -> String {
    if stats.total_items == 0 {
        return "Cache is empty\nRun 'broadsheet latest' to populate the cache\n".to_string();
    }

    let mut out = String::from("Cache Statistics\n================\n");
    let _ = writeln!(out, "Total articles: {}", stats.total_items);
    let _ = writeln!(out, "Status: {}", if stats.stale { "Stale" } else { "Fresh" });
    if let Some(at) = stats.last_update {
        let _ = writeln!(
            out,
            "Last update: {}",
            at.with_timezone(&Local).format("%Y-%m-%d %H:%M")
        );
    }
    if let Some(path) = &stats.path {
        let _ = writeln!(out, "Location: {}", path.display());
    }

    out.push_str("\nArticles by source:\n");
    for (source, count) in &stats.sources {
        let _ = writeln!(out, "  {}: {}", source, count);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_items_are_separated() {
        let mut first = Item::new("NOS", "https://nos.nl/1");
        first.title = "Een".into();
        first.summary = "Samenvatting".into();
        let mut second = Item::new("NU.nl", "https://nu.nl/2");
        second.title = "Twee".into();

        let out = items(&[first, second]);
        assert!(out.starts_with("Title: Een\nSource: NOS\nPublished: "));
        assert!(out.contains("Description: Samenvatting\nURL: https://nos.nl/1\n"));
        assert_eq!(out.matches(&"-".repeat(SEPARATOR_WIDTH)).count(), 1);
        assert!(!out.contains("Description: \n"));
        assert!(out.ends_with("URL: https://nu.nl/2\n"));
    }

    #[test]
    fn test_sources_heading_and_groups() {
        let out = sources(Country::De.sources());
        assert!(out.starts_with("Available German News Sources:\n"));
        assert_eq!(out.matches("\ngeneral:\n").count(), 1);
        assert!(out.contains("• Tagesschau\n"));
    }

    #[test]
    fn test_countries() {
        let out = countries();
        assert!(out.contains("  nl - Netherlands (Dutch)\n"));
        assert!(out.contains("  fr - France (French)\n"));
    }

    #[test]
    fn test_empty_cache() {
        let stats = CacheStats {
            total_items: 0,
            sources: Vec::new(),
            last_update: None,
            stale: true,
            path: None,
        };
        assert!(cache_stats(&stats).starts_with("Cache is empty"));
    }
}
