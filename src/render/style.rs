//! Terminal styling driven by the configured colors.

use crossterm::style::ContentStyle;
use ratatui::backend::IntoCrossterm;
use ratatui::style::{Modifier, Style};

use crate::config::ColorConfig;

/// What a piece of text is, independent of how it is painted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Header,
    Subheader,
    Selected,
    Title,
    Meta,
    Summary,
    Footer,
    Status,
    Empty,
    Heading,
    Strong,
    Emphasis,
    Code,
    Link,
    Quote,
    Rule,
}

/// Maps roles to styles and paints text, or passes it through when
/// styling is disabled.
#[derive(Debug, Clone)]
pub struct Palette {
    styled: bool,
    colors: ColorConfig,
}

impl Palette {
    pub fn new(colors: &ColorConfig, styled: bool) -> Self {
        Self {
            styled,
            colors: colors.clone(),
        }
    }

    pub fn plain() -> Self {
        Self::new(&ColorConfig::default(), false)
    }

    pub fn is_styled(&self) -> bool {
        self.styled
    }

    /// Role styles layer with [`Style::patch`]: the outer role's colors
    /// win and modifiers accumulate.
    pub fn style(&self, role: Role) -> Style {
        let c = &self.colors;
        let bold = Modifier::BOLD;
        match role {
            Role::Header => Style::new().fg(c.header_fg).bg(c.header_bg).add_modifier(bold),
            Role::Subheader => Style::new().fg(c.subheader),
            Role::Selected => Style::new().fg(c.selection).add_modifier(bold),
            Role::Title => Style::new().fg(c.title).add_modifier(bold),
            Role::Meta => Style::new().fg(c.metadata),
            Role::Summary => Style::new().fg(c.summary),
            Role::Footer => Style::new().fg(c.footer),
            Role::Status => Style::new().fg(c.status).add_modifier(bold),
            Role::Empty => Style::new().fg(c.footer).add_modifier(Modifier::ITALIC),
            Role::Heading => Style::new().fg(c.heading).add_modifier(bold),
            Role::Strong => Style::new().add_modifier(bold),
            Role::Emphasis => Style::new().add_modifier(Modifier::ITALIC),
            Role::Code => Style::new().fg(c.code),
            Role::Link => Style::new().fg(c.link).add_modifier(Modifier::UNDERLINED),
            Role::Quote => Style::new().fg(c.quote).add_modifier(Modifier::ITALIC),
            Role::Rule => Style::new().fg(c.rule),
        }
    }

    pub fn paint(&self, role: Role, text: &str) -> String {
        self.paint_style(self.style(role), text)
    }

    pub fn paint_style(&self, style: Style, text: &str) -> String {
        if !self.styled || text.is_empty() || style == Style::default() {
            return text.to_string();
        }
        let content: ContentStyle = style.into_crossterm();
        content.apply(text).to_string()
    }
}
