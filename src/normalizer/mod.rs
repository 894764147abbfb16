use chrono::Utc;
use feed_rs::model::Entry;
use feed_rs::parser;
use html_escape::decode_html_entities;
use url::Url;

use crate::app::{BroadsheetError, Result};
use crate::domain::{Item, Source};
use crate::text::{clean_html, truncate_chars};

/// Longest summary kept for list views.
pub const SUMMARY_CHARS: usize = 300;

/// Turns RSS/Atom/JSON feed documents into [`Item`]s.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    full_content: bool,
}

impl Normalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the complete entry text as the item body.
    pub fn with_full_content(full_content: bool) -> Self {
        Self { full_content }
    }

    pub fn normalize(&self, source: &Source, body: &[u8]) -> Result<Vec<Item>> {
        let feed = parser::parse(body).map_err(|e| BroadsheetError::FeedParse(e.to_string()))?;
        let base = Url::parse(source.url).ok();

        let items: Vec<Item> = feed
            .entries
            .into_iter()
            .filter_map(|entry| self.item_from_entry(source, base.as_ref(), entry))
            .collect();

        tracing::debug!("Parsed {} entries from {}", items.len(), source.name);
        Ok(items)
    }

    fn item_from_entry(&self, source: &Source, base: Option<&Url>, entry: Entry) -> Option<Item> {
        let href = entry
            .links
            .first()
            .map(|l| l.href.clone())
            .filter(|h| !h.is_empty())
            .or_else(|| Some(entry.id.clone()).filter(|id| !id.is_empty()))?;
        let link = resolve_link(base, &href);

        let mut item = Item::new(source.name, &link);

        item.title = entry
            .title
            .as_ref()
            .map(|t| decode_html_entities(t.content.trim()).to_string())
            .unwrap_or_default();

        let description = entry
            .summary
            .as_ref()
            .map(|s| clean_html(&s.content))
            .unwrap_or_default();
        let content = entry
            .content
            .as_ref()
            .and_then(|c| c.body.as_deref())
            .map(clean_html)
            .unwrap_or_default();

        let summary_text = if description.is_empty() { &content } else { &description };
        item.summary = truncate_chars(summary_text, SUMMARY_CHARS);

        if self.full_content {
            item.body = if content.is_empty() { description.clone() } else { content.clone() };
        }

        item.published = entry
            .published
            .or(entry.updated)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(Utc::now);

        item.image = image_url(&entry);

        item.categories = entry
            .categories
            .iter()
            .map(|c| c.label.clone().unwrap_or_else(|| c.term.clone()))
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .collect();

        Some(item)
    }
}

fn resolve_link(base: Option<&Url>, href: &str) -> String {
    match base.map(|b| b.join(href)) {
        Some(Ok(url)) => url.to_string(),
        _ => href.to_string(),
    }
}

/// First media thumbnail, else the first media content of an image type.
fn image_url(entry: &Entry) -> Option<String> {
    let thumbnail = entry
        .media
        .iter()
        .flat_map(|m| m.thumbnails.iter())
        .map(|t| t.image.uri.clone())
        .find(|uri| !uri.is_empty());

    thumbnail.or_else(|| {
        entry
            .media
            .iter()
            .flat_map(|m| m.content.iter())
            .filter(|c| {
                c.content_type
                    .as_ref()
                    .is_some_and(|t| t.to_string().starts_with("image/"))
            })
            .find_map(|c| c.url.as_ref().map(|u| u.to_string()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: Source = Source {
        name: "NOS",
        url: "https://feeds.nos.nl/nosnieuwsalgemeen",
        description: "",
        language: "nl",
        category: "general",
    };

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>NOS Nieuws</title>
    <item>
      <title>Kabinet &amp; Kamer</title>
      <link>https://nos.nl/artikel/1</link>
      <guid>1</guid>
      <pubDate>Fri, 01 Mar 2024 10:00:00 GMT</pubDate>
      <category>Politiek</category>
      <description>&lt;p&gt;Een &lt;b&gt;korte&lt;/b&gt; samenvatting.&lt;/p&gt;</description>
      <media:thumbnail url="https://cdn.nos.nl/1.jpg"/>
    </item>
    <item>
      <title>Relatieve link</title>
      <link>/artikel/2</link>
      <description>Tweede</description>
    </item>
  </channel>
</rss>"#;

    const ATOM_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom</title>
  <entry>
    <title>Atom bericht</title>
    <link href="https://example.com/atom1"/>
    <id>atom-entry-1</id>
    <updated>2024-01-01T00:00:00Z</updated>
    <summary>Samenvatting</summary>
    <content type="html">&lt;p&gt;Volledige tekst van het bericht.&lt;/p&gt;</content>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss() {
        let items = Normalizer::new().normalize(&SOURCE, RSS_SAMPLE.as_bytes()).unwrap();

        assert_eq!(items.len(), 2);
        let first = &items[0];
        assert_eq!(first.title, "Kabinet & Kamer");
        assert_eq!(first.source, "NOS");
        assert_eq!(first.link, "https://nos.nl/artikel/1");
        assert_eq!(first.summary, "Een korte samenvatting.");
        assert!(first.body.is_empty());
        assert!(first.categories.contains("Politiek"));
        assert_eq!(first.image.as_deref(), Some("https://cdn.nos.nl/1.jpg"));
        assert_eq!(first.published.to_rfc3339(), "2024-03-01T10:00:00+00:00");
    }

    #[test]
    fn test_relative_links_are_resolved() {
        let items = Normalizer::new().normalize(&SOURCE, RSS_SAMPLE.as_bytes()).unwrap();
        assert_eq!(items[1].link, "https://feeds.nos.nl/artikel/2");
    }

    #[test]
    fn test_full_content_fills_body() {
        let items = Normalizer::with_full_content(true)
            .normalize(&SOURCE, ATOM_SAMPLE.as_bytes())
            .unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].summary, "Samenvatting");
        assert_eq!(items[0].body, "Volledige tekst van het bericht.");
        assert_eq!(items[0].published.to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_long_summaries_are_truncated() {
        let long = "woord ".repeat(100);
        let feed = format!(
            r#"<rss version="2.0"><channel><title>t</title><item><title>x</title><link>https://nos.nl/x</link><description>{}</description></item></channel></rss>"#,
            long
        );
        let items = Normalizer::new().normalize(&SOURCE, feed.as_bytes()).unwrap();
        assert_eq!(items[0].summary.chars().count(), SUMMARY_CHARS);
        assert!(items[0].summary.ends_with("..."));
    }

    #[test]
    fn test_item_id_determinism() {
        let normalizer = Normalizer::new();
        let first = normalizer.normalize(&SOURCE, RSS_SAMPLE.as_bytes()).unwrap();
        let second = normalizer.normalize(&SOURCE, RSS_SAMPLE.as_bytes()).unwrap();

        assert_eq!(first[0].id, second[0].id);
        assert_ne!(first[0].id, first[1].id);
    }

    #[test]
    fn test_invalid_document_is_a_parse_error() {
        let err = Normalizer::new().normalize(&SOURCE, b"not a feed").unwrap_err();
        assert!(matches!(err, BroadsheetError::FeedParse(_)));
    }
}
