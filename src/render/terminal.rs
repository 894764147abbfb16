//! A small CommonMark renderer for terminals, built on pulldown-cmark.

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Parser, Tag, TagEnd};
use ratatui::style::Style;

use crate::render::style::{Palette, Role};
use crate::render::{RenderError, Renderer};
use crate::text::display_width;

pub const MIN_WRAP_WIDTH: usize = 20;
pub const DEFAULT_WRAP_WIDTH: usize = 100;

const MARGIN: &str = "  ";

/// Word-wrapping markdown renderer producing (optionally) ANSI-styled text.
#[derive(Debug, Clone)]
pub struct TermRenderer {
    width: usize,
    palette: Palette,
}

impl TermRenderer {
    pub fn new(width: usize, palette: Palette) -> Result<Self, RenderError> {
        if width < MIN_WRAP_WIDTH {
            return Err(RenderError::TooNarrow {
                width,
                min: MIN_WRAP_WIDTH,
            });
        }
        Ok(Self { width, palette })
    }

    pub fn width(&self) -> usize {
        self.width
    }
}

impl Renderer for TermRenderer {
    fn render(&self, markdown: &str) -> Result<String, RenderError> {
        let mut writer = Writer::new(self.width, &self.palette);
        for event in Parser::new(markdown) {
            writer.event(event);
        }
        Ok(writer.finish())
    }
}

struct ListState {
    next: Option<u64>,
}

/// Containers opened by `Event::Start`, closed in reverse order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Open {
    Paragraph,
    Heading,
    Quote,
    CodeBlock,
    List,
    Item,
    Style,
    Link,
    Image,
    Other,
}

struct Writer<'p> {
    width: usize,
    palette: &'p Palette,
    lines: Vec<String>,
    line: String,
    line_width: usize,
    pending_space: bool,
    roles: Vec<Role>,
    open: Vec<Open>,
    lists: Vec<ListState>,
    quote_depth: usize,
    code_block: bool,
    link: Option<String>,
    image: Option<(String, String)>,
}

impl<'p> Writer<'p> {
    fn new(width: usize, palette: &'p Palette) -> Self {
        Self {
            width,
            palette,
            lines: Vec::new(),
            line: String::new(),
            line_width: 0,
            pending_space: false,
            roles: Vec::new(),
            open: Vec::new(),
            lists: Vec::new(),
            quote_depth: 0,
            code_block: false,
            link: None,
            image: None,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        if let Some((_, alt)) = self.image.as_mut() {
            match event {
                Event::Text(text) | Event::Code(text) => {
                    alt.push_str(&text);
                    return;
                }
                Event::End(TagEnd::Image) => {}
                _ => return,
            }
        }

        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => {
                if self.code_block {
                    self.code_text(&text);
                } else {
                    self.text(&text, None);
                }
            }
            Event::Code(code) => {
                let style = self.palette.style(Role::Code);
                self.word(&code, Some(style));
            }
            Event::SoftBreak | Event::HardBreak => self.flush_line(),
            Event::Rule => {
                self.end_block();
                let rule = "─".repeat(self.width.saturating_sub(MARGIN.len()));
                let painted = self.palette.paint(Role::Rule, &rule);
                self.lines.push(format!("{}{}", MARGIN, painted));
                self.blank();
            }
            Event::FootnoteReference(name) => self.word(&format!("[^{}]", name), None),
            Event::TaskListMarker(done) => self.word(if done { "[x]" } else { "[ ]" }, None),
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let open = match tag {
            Tag::Paragraph => Open::Paragraph,
            Tag::Heading { level, .. } => {
                self.end_block();
                self.roles.push(Role::Heading);
                let marker = "#".repeat(heading_depth(level));
                let style = self.current_style();
                self.word(&marker, style);
                self.pending_space = true;
                Open::Heading
            }
            Tag::BlockQuote(_) => {
                self.end_block();
                self.quote_depth += 1;
                self.roles.push(Role::Quote);
                Open::Quote
            }
            Tag::CodeBlock(kind) => {
                self.end_block();
                self.code_block = true;
                if let CodeBlockKind::Fenced(lang) = kind {
                    if !lang.is_empty() {
                        let label = self.palette.paint(Role::Meta, &lang);
                        self.lines.push(format!("{}{}", self.prefix(), label));
                    }
                }
                Open::CodeBlock
            }
            Tag::List(start) => {
                if self.lists.is_empty() {
                    self.end_block();
                } else {
                    self.flush_line();
                }
                self.lists.push(ListState { next: start });
                Open::List
            }
            Tag::Item => {
                self.flush_line();
                let marker = match self.lists.last_mut() {
                    Some(ListState { next: Some(n) }) => {
                        let marker = format!("{}.", n);
                        *n += 1;
                        marker
                    }
                    _ => "•".to_string(),
                };
                let depth = self.lists.len().saturating_sub(1);
                self.line = format!("{}{}{}", self.quote_prefix(), "  ".repeat(depth), marker);
                self.line_width = self.quote_width() + 2 * depth + display_width(&marker);
                self.pending_space = true;
                Open::Item
            }
            Tag::Emphasis => {
                self.roles.push(Role::Emphasis);
                Open::Style
            }
            Tag::Strong => {
                self.roles.push(Role::Strong);
                Open::Style
            }
            Tag::Link { dest_url, .. } => {
                self.roles.push(Role::Link);
                self.link = Some(dest_url.to_string());
                Open::Link
            }
            Tag::Image { dest_url, .. } => {
                self.image = Some((dest_url.to_string(), String::new()));
                Open::Image
            }
            _ => Open::Other,
        };
        self.open.push(open);
    }

    fn end(&mut self) {
        let Some(open) = self.open.pop() else {
            return;
        };
        match open {
            Open::Paragraph => {
                if self.lists.is_empty() {
                    self.end_block();
                } else {
                    self.flush_line();
                }
            }
            Open::Heading => {
                self.roles.pop();
                self.end_block();
            }
            Open::Quote => {
                self.flush_line();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.roles.pop();
                if self.quote_depth == 0 {
                    self.blank();
                }
            }
            Open::CodeBlock => {
                self.code_block = false;
                self.blank();
            }
            Open::List => {
                self.flush_line();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank();
                }
            }
            Open::Item => self.flush_line(),
            Open::Style => {
                self.roles.pop();
            }
            Open::Link => {
                self.roles.pop();
                if let Some(url) = self.link.take() {
                    if !url.is_empty() {
                        let style = self.palette.style(Role::Meta);
                        self.pending_space = true;
                        self.word(&format!("({})", url), Some(style));
                    }
                }
            }
            Open::Image => {
                if let Some((url, alt)) = self.image.take() {
                    let style = self.palette.style(Role::Link);
                    let label = if alt.trim().is_empty() {
                        "[image]".to_string()
                    } else {
                        format!("[image: {}]", alt.trim())
                    };
                    self.text(&label, Some(style));
                    if !url.is_empty() {
                        self.pending_space = true;
                        self.word(&url, Some(self.palette.style(Role::Meta)));
                    }
                }
            }
            Open::Other => {}
        }
    }

    fn current_style(&self) -> Option<Style> {
        if self.roles.is_empty() {
            return None;
        }
        Some(
            self.roles
                .iter()
                .fold(Style::default(), |acc, role| acc.patch(self.palette.style(*role))),
        )
    }

    fn text(&mut self, text: &str, style: Option<Style>) {
        let style = style.or_else(|| self.current_style());
        if text.starts_with(char::is_whitespace) {
            self.pending_space = true;
        }
        let mut any = false;
        for (i, word) in text.split_whitespace().enumerate() {
            if i > 0 {
                self.pending_space = true;
            }
            self.word(word, style);
            any = true;
        }
        if any && text.ends_with(char::is_whitespace) {
            self.pending_space = true;
        }
    }

    fn word(&mut self, word: &str, style: Option<Style>) {
        let width = display_width(word);
        let prefix_width = self.prefix_width();
        let at_line_start = self.line.is_empty() || self.line_width <= prefix_width;

        let mut space = self.pending_space && !self.line.is_empty();
        if !at_line_start && self.line_width + usize::from(space) + width > self.width {
            self.flush_line();
            space = false;
        }
        if self.line.is_empty() {
            self.line = self.prefix();
            self.line_width = prefix_width;
        }
        if space {
            self.line.push(' ');
            self.line_width += 1;
        }
        match style {
            Some(style) => self.line.push_str(&self.palette.paint_style(style, word)),
            None => self.line.push_str(word),
        }
        self.line_width += width;
        self.pending_space = false;
    }

    fn code_text(&mut self, text: &str) {
        let prefix = format!("{}    ", self.prefix());
        for line in text.lines() {
            let painted = self.palette.paint(Role::Code, line);
            self.lines.push(format!("{}{}", prefix, painted).trim_end().to_string());
        }
    }

    fn quote_prefix(&self) -> String {
        let bar = self.palette.paint(Role::Quote, "│ ");
        format!("{}{}", MARGIN, bar.repeat(self.quote_depth))
    }

    fn quote_width(&self) -> usize {
        MARGIN.len() + 2 * self.quote_depth
    }

    fn prefix_width(&self) -> usize {
        self.quote_width() + 2 * self.lists.len()
    }

    /// Indentation for a fresh line at the current nesting.
    fn prefix(&self) -> String {
        let list_indent = if self.lists.is_empty() {
            String::new()
        } else {
            "  ".repeat(self.lists.len())
        };
        format!("{}{}", self.quote_prefix(), list_indent)
    }

    fn flush_line(&mut self) {
        if !self.line.is_empty() {
            let line = std::mem::take(&mut self.line);
            self.lines.push(line.trim_end().to_string());
        }
        self.line_width = 0;
        self.pending_space = false;
    }

    fn blank(&mut self) {
        if self.lines.last().is_some_and(|l| !l.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn end_block(&mut self) {
        self.flush_line();
        self.blank();
    }

    fn finish(mut self) -> String {
        self.flush_line();
        while self.lines.last().is_some_and(|l| l.is_empty()) {
            self.lines.pop();
        }
        self.lines.join("\n")
    }
}

fn heading_depth(level: HeadingLevel) -> usize {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
