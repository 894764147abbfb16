//! Interactive pager: a list of articles and a scrollable reader.
//!
//! The pager is an Elm-style [`Model`]. Every frame is a string, possibly
//! carrying SGR escapes, which the driver converts to ratatui text and draws
//! unwrapped so one frame line is one terminal row.

pub mod ansi;
pub mod app;
pub mod content;
pub mod event;
pub mod layout;
pub mod terminal;
pub mod viewport;

use std::env;
use std::io::{self, IsTerminal};
use std::time::Duration;

use ratatui::widgets::Paragraph;

use crate::app::Result;
use crate::config::Config;
use crate::domain::Item;
use crate::render::{Palette, TermRenderer};

use self::app::{InputMode, Pager};
use self::content::ImageSupport;
use self::event::{AppEvent, EventHandler};
use self::terminal::{setup_terminal, TerminalGuard, Tui};

/// Set to any non-empty value to keep output out of the pager.
pub const NO_PAGER_ENV: &str = "BROADSHEET_NO_PAGER";

const TICK_RATE: Duration = Duration::from_millis(250);

/// Columns kept free to the right of wrapped article text.
const WRAP_MARGIN: usize = 4;

/// Requests a model can hand back to the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Quit,
}

pub trait Model {
    fn init(&mut self) -> Option<Command>;
    fn update(&mut self, event: AppEvent) -> Option<Command>;
    fn view(&self) -> String;
}

/// Whether item lists should open in the pager rather than print.
pub fn should_use_pager(no_pager: bool) -> bool {
    let disabled_by_env = env::var_os(NO_PAGER_ENV).is_some_and(|v| !v.is_empty());
    decide(no_pager, io::stdout().is_terminal(), disabled_by_env)
}

fn decide(no_pager: bool, is_tty: bool, disabled_by_env: bool) -> bool {
    !no_pager && is_tty && !disabled_by_env
}

/// Run a pager session over `items` until the user quits.
///
/// Fails before touching the terminal if the renderer cannot be built.
pub fn start(items: &[Item], title: &str, config: &Config) -> Result<()> {
    let (cols, rows) = crossterm::terminal::size()?;
    let wrap = config
        .pager
        .wrap_width
        .min(usize::from(cols).saturating_sub(WRAP_MARGIN));

    let palette = Palette::new(&config.colors, true);
    let renderer = TermRenderer::new(wrap, palette.clone())?;
    let input = InputMode::from_config(config.pager.mouse);

    let mut pager = Pager::new(items, title, Box::new(renderer))
        .with_keybindings(&config.keybindings)
        .with_input(input)
        .with_palette(palette)
        .with_summary_width(config.pager.summary_width)
        .with_images(ImageSupport::detect())
        .with_size(cols, rows);

    tracing::debug!("Starting pager with {} items at {}x{}", items.len(), cols, rows);

    let (mut terminal, guard) = setup_terminal(input == InputMode::KeyboardMouse)?;
    let result = run_session(&mut terminal, &guard, &mut pager);
    drop(guard);
    result
}

fn run_session<M: Model>(terminal: &mut Tui, guard: &TerminalGuard, model: &mut M) -> Result<()> {
    let events = EventHandler::new(TICK_RATE);
    if model.init() == Some(Command::Quit) {
        return Ok(());
    }

    loop {
        let text = ansi::to_text(&model.view());
        terminal.draw(|frame| frame.render_widget(Paragraph::new(text), frame.area()))?;

        if guard.interrupted() {
            tracing::info!("Pager interrupted by signal");
            break;
        }

        let event = events.next()?;
        if let AppEvent::Resize(width, height) = event {
            tracing::trace!("Terminal resized to {}x{}", width, height);
        }
        if model.update(event) == Some(Command::Quit) {
            break;
        }
    }

    Ok(())
}
