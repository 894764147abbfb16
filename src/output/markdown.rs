//! Markdown documents for the renderer.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::domain::time::{format_long, format_time_ago};
use crate::domain::{Country, Item, Source};
use crate::store::CacheStats;
use crate::text::truncate_chars;

/// Longest body excerpt shown for an item without a summary.
const EXCERPT_CHARS: usize = 500;

pub fn message(title: &str, body: &str) -> String {
    format!("# {}\n\n{}\n", title, body)
}

pub fn items(items: &[Item], title: &str, now: DateTime<Utc>) -> String {
    if items.is_empty() {
        return message(
            "📰 No articles found",
            "Try a different search query or check your sources.",
        );
    }

    let mut md = String::new();
    let _ = write!(md, "# 📰 {}\n\n", title);
    let _ = write!(md, "*Updated: {}*\n\n---\n\n", format_long(now));

    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            md.push_str("\n---\n\n");
        }
        let _ = write!(md, "## {}\n\n", item.display_title());
        let _ = write!(
            md,
            "***{}** • {}*\n\n",
            item.source,
            format_time_ago(item.published, now)
        );

        if let Some(image) = &item.image {
            let _ = write!(md, "![Article Image]({})\n\n", image);
        }

        if !item.summary.is_empty() {
            let _ = write!(md, "{}\n\n", item.summary);
        } else if !item.body.is_empty() {
            let _ = write!(md, "{}\n\n", truncate_chars(&item.body, EXCERPT_CHARS));
        }

        if !item.categories.is_empty() {
            let _ = write!(md, "**Categories:** {}\n\n", code_list(&item.categories));
        }

        if !item.link.is_empty() {
            let _ = write!(md, "🔗 [Read full article]({})\n\n", item.link);
        }
    }

    let _ = write!(md, "---\n\n*Found {} articles*\n", items.len());
    md
}

fn code_list<'a>(values: impl IntoIterator<Item = &'a String>) -> String {
    values
        .into_iter()
        .map(|v| format!("`{}`", v))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Sources grouped by category, in catalog order.
pub fn sources(country: Country, sources: &[Source]) -> String {
    let mut md = String::new();
    let _ = write!(md, "# 📰 Available News Sources {}\n\n", country.flag());
    let _ = write!(md, "*{}*\n\n---\n\n", country.name());

    for (category, members) in group_by_category(sources) {
        let _ = write!(md, "## {}\n\n", capitalize(category));
        for source in members {
            let _ = write!(md, "### {}\n\n", source.name);
            let _ = write!(md, "*{}*\n\n", source.description);
            let _ = write!(md, "**URL:** {}  \n**Language:** {}\n\n", source.url, source.language);
        }
    }

    md.push_str("---\n\n*Use `--source` to focus on one outlet*\n");
    md
}

pub fn countries() -> String {
    let mut md = String::from("# 🌍 Supported Countries\n\n");
    md.push_str("News sources are available for the following countries:\n\n");
    for country in Country::ALL {
        let _ = writeln!(
            md,
            "- **{} {}** - `{}`",
            country.flag(),
            country.name(),
            country.code()
        );
    }
    md.push_str("\n---\n\n");
    md.push_str("**Usage:** pass the code with `--country`  \n");
    md.push_str("**Example:** `broadsheet latest --country us --limit 10`\n");
    md
}

pub fn cache_stats(stats: &CacheStats) -> String {
    if stats.total_items == 0 {
        return message(
            "📭 Cache is empty",
            "Run `broadsheet latest` to populate the cache.",
        );
    }

    let mut md = String::from("# 📊 Cache Statistics\n\n---\n\n");
    let _ = write!(md, "**Total articles:** {}\n\n", stats.total_items);
    let status = if stats.stale { "Stale" } else { "Fresh" };
    let _ = write!(md, "**Status:** {}\n\n", status);
    if let Some(at) = stats.last_update {
        let _ = write!(md, "**Last update:** {}\n\n", format_long(at));
    }
    if let Some(path) = &stats.path {
        let _ = write!(md, "**Location:** `{}`\n\n", path.display());
    }

    md.push_str("## Sources\n\n");
    for (source, count) in &stats.sources {
        let _ = writeln!(md, "- **{}**: {} articles", source, count);
    }
    md
}

pub(crate) fn group_by_category(sources: &[Source]) -> Vec<(&'static str, Vec<&Source>)> {
    let mut groups: Vec<(&'static str, Vec<&Source>)> = Vec::new();
    for source in sources {
        match groups.iter_mut().find(|(c, _)| *c == source.category) {
            Some((_, members)) => members.push(source),
            None => groups.push((source.category, vec![source])),
        }
    }
    groups
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
