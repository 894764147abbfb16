//! Non-interactive output: JSON, plain text and rendered markdown.

pub mod json;
pub mod markdown;
pub mod plain;

use std::io::{self, IsTerminal};

use clap::ValueEnum;

use crate::app::Result;
use crate::config::Config;
use crate::domain::Item;
use crate::render::{Palette, Renderer, TermRenderer};
use crate::tui;

/// Columns kept free when wrapping to the terminal width.
const TERMINAL_MARGIN: usize = 4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
    Plain,
}

/// Renderer for printing to stdout: styled and fitted to the terminal when
/// stdout is one, plain at the configured width otherwise.
pub fn stdout_renderer(config: &Config) -> Result<TermRenderer> {
    let stdout = io::stdout();
    if stdout.is_terminal() {
        let cols = crossterm::terminal::size().map(|(c, _)| usize::from(c)).unwrap_or(80);
        let width = config.pager.wrap_width.min(cols.saturating_sub(TERMINAL_MARGIN));
        Ok(TermRenderer::new(width, Palette::new(&config.colors, true))?)
    } else {
        Ok(TermRenderer::new(config.pager.wrap_width, Palette::plain())?)
    }
}

/// Render a markdown document and print it.
pub fn print_markdown(renderer: &dyn Renderer, document: &str) -> Result<()> {
    print!("{}", renderer.render(document)?);
    Ok(())
}

/// Show a list of items in the requested format.
///
/// Markdown opens the pager when it is allowed and there is something to
/// page through; if the pager cannot start the rendered document is
/// printed instead.
pub fn emit_items(
    items: &[Item],
    title: &str,
    format: OutputFormat,
    no_pager: bool,
    config: &Config,
) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", json::items(items)?),
        OutputFormat::Plain => print!("{}", plain::items(items)),
        OutputFormat::Markdown => {
            if tui::should_use_pager(no_pager) && !items.is_empty() {
                match tui::start(items, title, config) {
                    Ok(()) => return Ok(()),
                    Err(e) => tracing::warn!("Pager unavailable, printing instead: {}", e),
                }
            }
            let renderer = stdout_renderer(config)?;
            let document = markdown::items(items, title, chrono::Utc::now());
            print_markdown(&renderer, &document)?;
        }
    }
    Ok(())
}
