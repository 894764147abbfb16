use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One article as delivered by a news source.
///
/// Text fields use the empty string for "absent"; the pager and the
/// formatters check `is_empty()` rather than unwrapping options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    pub title: String,
    pub summary: String,
    pub body: String,
    pub link: String,
    pub source: String,
    pub published: DateTime<Utc>,
    pub image: Option<String>,
    pub categories: BTreeSet<String>,
}

impl Item {
    pub fn new(source: &str, link: &str) -> Self {
        Self {
            id: Self::generate_id(source, link),
            title: String::new(),
            summary: String::new(),
            body: String::new(),
            link: link.to_string(),
            source: source.to_string(),
            published: Utc::now(),
            image: None,
            categories: BTreeSet::new(),
        }
    }

    /// Generate a deterministic ID from source name and article link
    pub fn generate_id(source: &str, link: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        hasher.update(link.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "(Untitled)"
        } else {
            &self.title
        }
    }

    /// Get the best available text for display
    pub fn display_content(&self) -> &str {
        if self.body.is_empty() {
            &self.summary
        } else {
            &self.body
        }
    }

    /// First category tag, or "general" for untagged items.
    pub fn primary_category(&self) -> &str {
        self.categories
            .iter()
            .next()
            .map(String::as_str)
            .unwrap_or("general")
    }

    pub fn has_category(&self, category: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category))
    }

    /// Case-insensitive substring match over title, summary and body.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        [&self.title, &self.summary, &self.body]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generation_deterministic() {
        let id1 = Item::generate_id("NOS", "https://nos.nl/artikel/1");
        let id2 = Item::generate_id("NOS", "https://nos.nl/artikel/1");
        assert_eq!(id1, id2);
    }

    #[test]
    fn test_id_generation_different_inputs() {
        let id1 = Item::generate_id("NOS", "https://nos.nl/artikel/1");
        let id2 = Item::generate_id("NOS", "https://nos.nl/artikel/2");
        let id3 = Item::generate_id("NU.nl", "https://nos.nl/artikel/1");
        assert_ne!(id1, id2);
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_id_is_hex_sha256() {
        let id = Item::generate_id("NOS", "https://nos.nl/artikel/1");
        assert_eq!(id.len(), 64);
        assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_display_title_without_title() {
        let item = Item::new("NOS", "https://nos.nl/artikel/1");
        assert_eq!(item.display_title(), "(Untitled)");
    }

    #[test]
    fn test_display_content_prefers_body() {
        let mut item = Item::new("NOS", "https://nos.nl/artikel/1");
        item.body = "Full body".into();
        item.summary = "Short summary".into();
        assert_eq!(item.display_content(), "Full body");

        item.body.clear();
        assert_eq!(item.display_content(), "Short summary");
    }

    #[test]
    fn test_primary_category_defaults_to_general() {
        let mut item = Item::new("NOS", "https://nos.nl/artikel/1");
        assert_eq!(item.primary_category(), "general");

        item.categories.insert("sport".into());
        assert_eq!(item.primary_category(), "sport");
        assert!(item.has_category("SPORT"));
    }

    #[test]
    fn test_matches_is_case_insensitive() {
        let mut item = Item::new("NOS", "https://nos.nl/artikel/1");
        item.title = "Kabinet presenteert begroting".into();
        item.body = "De Tweede Kamer debatteert".into();

        assert!(item.matches("BEGROTING"));
        assert!(item.matches("tweede kamer"));
        assert!(!item.matches("voetbal"));
    }
}
