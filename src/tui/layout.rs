//! Lays out list, detail and empty frames as text.
//!
//! The list layout is also the source of truth for mouse hit-testing:
//! [`list_hit_table`] walks the same rows [`list_frame`] prints.

use chrono::{DateTime, Utc};

use crate::domain::time::{format_long, format_time_ago};
use crate::domain::Item;
use crate::render::{Palette, Role};
use crate::text::{display_width, fit_width, truncate_chars};

/// Title, timestamp line and a blank row.
pub const HEADER_ROWS: usize = 3;
/// Blank row and the footer line.
pub const FOOTER_ROWS: usize = 2;

pub const EMPTY_MESSAGE: &str = "📭 No articles found";
pub const EMPTY_HINT: &str = "Press 'q' to quit";

const LIST_FOOTER: &str = "↑/↓ navigate • Enter read • o browser • h help • q quit";
const LIST_HELP: &str =
    "j/k ↑/↓ move • g/G first/last • PgUp/PgDn page • Enter/click read • o open in browser • h close help • q quit";
const DETAIL_HELP: &str =
    "j/k ↑/↓ scroll • PgUp/PgDn/Space page • g/G top/bottom • o open in browser • Esc back • h close help • q quit";

/// Rows occupied by one item in the list, `top..bottom`.
///
/// The blank separator after each item is not part of its span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowSpan {
    pub index: usize,
    pub top: usize,
    pub bottom: usize,
}

impl RowSpan {
    pub fn contains(&self, row: usize) -> bool {
        (self.top..self.bottom).contains(&row)
    }
}

fn summary_line(item: &Item, summary_width: usize) -> Option<String> {
    let flat = item.summary.split_whitespace().collect::<Vec<_>>().join(" ");
    if flat.is_empty() || summary_width == 0 {
        return None;
    }
    Some(truncate_chars(&flat, summary_width))
}

fn item_rows(item: &Item, summary_width: usize) -> usize {
    2 + usize::from(summary_line(item, summary_width).is_some())
}

/// Row spans of the items that fit in a `height`-row terminal when the
/// list starts at `offset`. Only whole items are listed.
pub fn list_hit_table(
    items: &[Item],
    offset: usize,
    height: u16,
    summary_width: usize,
) -> Vec<RowSpan> {
    let limit = usize::from(height).saturating_sub(FOOTER_ROWS);
    let mut table = Vec::new();
    let mut top = HEADER_ROWS;

    for (index, item) in items.iter().enumerate().skip(offset) {
        let bottom = top + item_rows(item, summary_width);
        if bottom > limit {
            break;
        }
        table.push(RowSpan { index, top, bottom });
        top = bottom + 1;
    }
    table
}

/// Item under terminal row `row`, if any.
pub fn hit_test(table: &[RowSpan], row: usize) -> Option<usize> {
    table.iter().find(|span| span.contains(row)).map(|span| span.index)
}

pub fn list_footer(show_help: bool) -> &'static str {
    if show_help {
        LIST_HELP
    } else {
        LIST_FOOTER
    }
}

pub fn detail_footer(show_help: bool, percent: u16) -> String {
    if show_help {
        DETAIL_HELP.to_string()
    } else {
        format!("📊 {}% • ⬅ Esc back • ↑/↓ scroll • PgUp/PgDn page • h help", percent)
    }
}

pub fn detail_header(position: usize, total: usize, source: &str) -> String {
    format!("📖 Article {} of {} • {}", position, total, source)
}

/// Pad a line to the full terminal width so header backgrounds span it.
fn banner(palette: &Palette, text: &str, width: usize) -> String {
    let text = fit_width(text, width);
    let padding = width.saturating_sub(display_width(text));
    palette.paint(Role::Header, &format!("{}{}", text, " ".repeat(padding)))
}

/// Everything needed to draw the list view. `footer` is already painted.
pub struct ListFrame<'a> {
    pub items: &'a [Item],
    pub title: &'a str,
    pub selected: usize,
    pub offset: usize,
    pub width: u16,
    pub height: u16,
    pub summary_width: usize,
    pub footer: &'a str,
    pub now: DateTime<Utc>,
    pub palette: &'a Palette,
}

pub fn list_frame(frame: &ListFrame<'_>) -> String {
    let palette = frame.palette;
    let width = usize::from(frame.width);
    let mut lines = Vec::new();

    lines.push(banner(palette, &format!("📰 {}", frame.title), width));
    let noun = if frame.items.len() == 1 { "article" } else { "articles" };
    lines.push(palette.paint(
        Role::Subheader,
        &format!(
            "{} • {} {} available",
            format_long(frame.now),
            frame.items.len(),
            noun
        ),
    ));
    lines.push(String::new());

    let table = list_hit_table(frame.items, frame.offset, frame.height, frame.summary_width);
    for span in &table {
        let item = &frame.items[span.index];
        let title = fit_width(item.display_title(), width.saturating_sub(2));
        if span.index == frame.selected {
            lines.push(palette.paint(Role::Selected, &format!("▶ {}", title)));
        } else {
            lines.push(format!("  {}", palette.paint(Role::Title, title)));
        }
        lines.push(palette.paint(
            Role::Meta,
            &format!(
                "  📡 {} • 🕒 {}",
                item.source,
                format_time_ago(item.published, frame.now)
            ),
        ));
        if let Some(summary) = summary_line(item, frame.summary_width) {
            lines.push(palette.paint(Role::Summary, &format!("  💬 {}", summary)));
        }
        lines.push(String::new());
    }

    let body_end = usize::from(frame.height).saturating_sub(FOOTER_ROWS);
    while lines.len() < body_end {
        lines.push(String::new());
    }
    lines.push(String::new());
    lines.push(frame.footer.to_string());

    lines.join("\n")
}

/// Header, blank, `body_rows` rows of content, blank, the painted footer.
pub fn detail_frame(
    header: &str,
    visible: &[&str],
    body_rows: usize,
    footer: &str,
    width: u16,
    palette: &Palette,
) -> String {
    let mut lines = Vec::with_capacity(body_rows + 4);
    lines.push(banner(palette, header, usize::from(width)));
    lines.push(String::new());
    lines.extend(visible.iter().map(|line| line.to_string()));
    while lines.len() < body_rows + 2 {
        lines.push(String::new());
    }
    lines.push(String::new());
    lines.push(footer.to_string());
    lines.join("\n")
}

/// Same frame in either view when there is nothing to read.
pub fn empty_frame(palette: &Palette) -> String {
    format!(
        "{}\n\n{}",
        palette.paint(Role::Empty, EMPTY_MESSAGE),
        palette.paint(Role::Footer, EMPTY_HINT)
    )
}

/// The footer line, or the status message in its place.
pub fn footer_or_status(palette: &Palette, footer: &str, status: Option<&str>) -> String {
    match status {
        Some(message) => palette.paint(Role::Status, message),
        None => palette.paint(Role::Footer, footer),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    fn items(summaries: &[&str]) -> Vec<Item> {
        summaries
            .iter()
            .enumerate()
            .map(|(i, summary)| {
                let mut item = Item::new("NOS", &format!("https://nos.nl/{}", i));
                item.title = format!("Artikel {}", i);
                item.summary = summary.to_string();
                item.published = now();
                item
            })
            .collect()
    }

    fn frame<'a>(items: &'a [Item], palette: &'a Palette, height: u16) -> ListFrame<'a> {
        ListFrame {
            items,
            title: "Nieuws",
            selected: 0,
            offset: 0,
            width: 80,
            height,
            summary_width: 120,
            footer: list_footer(false),
            now: now(),
            palette,
        }
    }

    #[test]
    fn test_hit_table_follows_summary_rows() {
        let items = items(&["een", "", "drie"]);
        let table = list_hit_table(&items, 0, 40, 120);
        assert_eq!(
            table,
            vec![
                RowSpan { index: 0, top: 3, bottom: 6 },
                RowSpan { index: 1, top: 7, bottom: 9 },
                RowSpan { index: 2, top: 10, bottom: 13 },
            ]
        );
    }

    #[test]
    fn test_hit_test_ignores_separators_and_chrome() {
        let items = items(&["een", "twee"]);
        let table = list_hit_table(&items, 0, 40, 120);
        assert_eq!(hit_test(&table, 0), None);
        assert_eq!(hit_test(&table, 3), Some(0));
        assert_eq!(hit_test(&table, 5), Some(0));
        assert_eq!(hit_test(&table, 6), None);
        assert_eq!(hit_test(&table, 7), Some(1));
        assert_eq!(hit_test(&table, 10), None);
        assert_eq!(hit_test(&table, 30), None);
    }

    #[test]
    fn test_hit_table_stops_at_footer() {
        let items = items(&["a"; 10]);
        // Rows 3..8 are usable in a 10-row terminal: one item of 3 rows.
        let table = list_hit_table(&items, 0, 10, 120);
        assert_eq!(table.len(), 1);
        let table = list_hit_table(&items, 4, 10, 120);
        assert_eq!(table[0].index, 4);
    }

    #[test]
    fn test_hit_table_matches_printed_rows() {
        let items = items(&["een", "", "drie"]);
        let palette = Palette::plain();
        let text = list_frame(&frame(&items, &palette, 24));
        let rows: Vec<&str> = text.lines().collect();

        for span in list_hit_table(&items, 0, 24, 120) {
            assert!(rows[span.top].ends_with(&format!("Artikel {}", span.index)));
            assert!(rows[span.bottom].is_empty());
        }
    }

    #[test]
    fn test_list_frame_shape() {
        let items = items(&["Een samenvatting"]);
        let palette = Palette::plain();
        let text = list_frame(&frame(&items, &palette, 12));
        let rows: Vec<&str> = text.lines().collect();

        assert_eq!(rows.len(), 12);
        assert!(rows[0].starts_with("📰 Nieuws"));
        assert!(rows[1].ends_with("1 article available"));
        assert_eq!(rows[3], "▶ Artikel 0");
        assert_eq!(rows[4], "  📡 NOS • 🕒 just now");
        assert_eq!(rows[5], "  💬 Een samenvatting");
        assert_eq!(rows[11], LIST_FOOTER);
    }

    #[test]
    fn test_summary_is_truncated() {
        let long = "woord ".repeat(50);
        let items = items(&[long.as_str()]);
        let palette = Palette::plain();
        let mut frame = frame(&items, &palette, 12);
        frame.summary_width = 20;
        let text = list_frame(&frame);
        let summary = text.lines().nth(5).unwrap();
        assert!(summary.ends_with("..."));
        assert_eq!(summary.trim_start_matches("  💬 ").chars().count(), 20);
    }

    #[test]
    fn test_detail_frame_fills_window() {
        let palette = Palette::plain();
        let text = detail_frame("📖 Article 1 of 3 • NOS", &["a", "b"], 18, "footer", 40, &palette);
        let rows: Vec<&str> = text.lines().collect();
        assert_eq!(rows.len(), 22);
        assert_eq!(rows[2], "a");
        assert_eq!(rows[21], "footer");
    }

    #[test]
    fn test_footers() {
        assert_ne!(list_footer(true), list_footer(false));
        assert!(detail_footer(false, 42).starts_with("📊 42%"));
        assert_eq!(detail_footer(true, 42), DETAIL_HELP);
    }

    #[test]
    fn test_empty_frame() {
        let text = empty_frame(&Palette::plain());
        assert_eq!(text, "📭 No articles found\n\nPress 'q' to quit");
    }
}
