//! Builds the article document shown in detail view.

use std::env;
use std::fmt::Write as _;

use chrono::{DateTime, Utc};

use crate::domain::time::{format_long, format_time_ago};
use crate::domain::Item;
use crate::render::Renderer;

/// Shown in place of content if the selection no longer points at an item.
pub const INVALID_SELECTION: &str = "Error: invalid article selection";

/// Whether the terminal could display images inline.
///
/// Nothing is decoded either way; this only picks the placeholder wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSupport {
    Inline,
    LinkOnly,
}

impl ImageSupport {
    /// Detect support from the environment of the current process.
    pub fn detect() -> Self {
        let var = |name: &str| env::var(name).ok();
        Self::from_env(
            var("TERM").as_deref(),
            var("TERM_PROGRAM").as_deref(),
            var("KITTY_WINDOW_ID").as_deref(),
            var("TERM_FEATURES").as_deref(),
        )
    }

    /// Kitty, iTerm2 and sixel-capable terminals count as inline-capable.
    pub fn from_env(
        term: Option<&str>,
        term_program: Option<&str>,
        kitty_window_id: Option<&str>,
        term_features: Option<&str>,
    ) -> Self {
        let kitty = term.is_some_and(|t| t.contains("kitty")) || kitty_window_id.is_some();
        let iterm = term_program == Some("iTerm.app");
        let sixel = term_features.is_some_and(|f| f.contains("sixel"));

        if kitty || iterm || sixel {
            ImageSupport::Inline
        } else {
            ImageSupport::LinkOnly
        }
    }

    fn placeholder(self, url: &str) -> String {
        match self {
            ImageSupport::Inline => format!(
                "🖼️  Image: {}\n\n*Inline images are not displayed yet; open the article to view it.*\n\n",
                url
            ),
            ImageSupport::LinkOnly => format!("🔗 Image available: {}\n\n", url),
        }
    }
}

/// Markdown document for one item.
pub fn build_document(item: &Item, images: ImageSupport, now: DateTime<Utc>) -> String {
    let mut md = String::new();

    let _ = writeln!(md, "# {}\n", item.display_title());
    let _ = writeln!(md, "**Source:** {}", item.source);
    let _ = writeln!(
        md,
        "**Published:** {} ({})",
        format_long(item.published),
        format_time_ago(item.published, now)
    );
    let _ = writeln!(md, "**URL:** {}\n", item.link);

    if item.categories.is_empty() {
        md.push('\n');
    } else {
        let tags: Vec<String> = item.categories.iter().map(|c| format!("`{}`", c)).collect();
        let _ = writeln!(md, "**Categories:** {}\n", tags.join(", "));
    }

    md.push_str("---\n\n");

    if let Some(url) = item.image.as_deref().filter(|u| !u.is_empty()) {
        md.push_str(&images.placeholder(url));
    }

    let text = item.display_content();
    if !text.is_empty() {
        let _ = writeln!(md, "{}\n", text);
    }

    md
}

/// Render `item` for the viewport, falling back to the raw document when
/// the renderer fails.
pub fn render_item(
    item: &Item,
    renderer: &dyn Renderer,
    images: ImageSupport,
    now: DateTime<Utc>,
) -> String {
    let document = build_document(item, images, now);
    match renderer.render(&document) {
        Ok(styled) => styled,
        Err(e) => {
            tracing::debug!("Rendering '{}' failed, showing raw markdown: {}", item.title, e);
            document
        }
    }
}
