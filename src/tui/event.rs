use crossterm::event::{self, Event, KeyEvent, KeyEventKind, MouseEvent};
use std::time::Duration;

use crate::app::Result;

/// One input delivered to the pager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate }
    }

    /// Wait up to one tick for the next terminal event.
    pub fn next(&self) -> Result<AppEvent> {
        if event::poll(self.tick_rate)? {
            return Ok(match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => AppEvent::Key(key),
                Event::Mouse(mouse) => AppEvent::Mouse(mouse),
                Event::Resize(width, height) => AppEvent::Resize(width, height),
                _ => AppEvent::Tick,
            });
        }
        Ok(AppEvent::Tick)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    First,
    Last,
    Open,
    Back,
    ToggleHelp,
    OpenInBrowser,
    None,
}
