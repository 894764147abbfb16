//! Keybinding configuration for the pager.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::Deserialize;

use crate::tui::event::Action;

/// Key bindings for every pager action.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct KeybindingConfig {
    pub quit: Vec<String>,
    pub move_up: Vec<String>,
    pub move_down: Vec<String>,
    pub page_up: Vec<String>,
    pub page_down: Vec<String>,
    pub first: Vec<String>,
    pub last: Vec<String>,
    pub open: Vec<String>,
    pub back: Vec<String>,
    pub toggle_help: Vec<String>,
    pub open_in_browser: Vec<String>,
}

fn keys(bindings: &[&str]) -> Vec<String> {
    bindings.iter().map(|b| b.to_string()).collect()
}

impl Default for KeybindingConfig {
    fn default() -> Self {
        Self {
            quit: keys(&["q", "Ctrl+c"]),
            move_up: keys(&["k", "Up"]),
            move_down: keys(&["j", "Down"]),
            page_up: keys(&["PageUp"]),
            page_down: keys(&["PageDown", "Space"]),
            first: keys(&["g", "Home"]),
            last: keys(&["G", "End"]),
            open: keys(&["Enter"]),
            back: keys(&["Esc", "Backspace"]),
            toggle_help: keys(&["h", "?"]),
            open_in_browser: keys(&["o"]),
        }
    }
}

impl KeybindingConfig {
    fn table(&self) -> [(&[String], Action); 11] {
        [
            (&self.quit, Action::Quit),
            (&self.move_up, Action::MoveUp),
            (&self.move_down, Action::MoveDown),
            (&self.page_up, Action::PageUp),
            (&self.page_down, Action::PageDown),
            (&self.first, Action::First),
            (&self.last, Action::Last),
            (&self.open, Action::Open),
            (&self.back, Action::Back),
            (&self.toggle_help, Action::ToggleHelp),
            (&self.open_in_browser, Action::OpenInBrowser),
        ]
    }

    /// Parse every binding once. Strings that fail to parse are skipped;
    /// [`Self::invalid_bindings`] reports them.
    pub fn keymap(&self) -> Keymap {
        let bindings = self
            .table()
            .into_iter()
            .flat_map(|(strings, action)| {
                strings
                    .iter()
                    .filter_map(|s| parse_key_string(s).ok())
                    .map(move |binding| (binding, action))
            })
            .collect();
        Keymap { bindings }
    }

    /// Every binding string that fails to parse, for startup warnings.
    pub fn invalid_bindings(&self) -> Vec<String> {
        self.table()
            .into_iter()
            .flat_map(|(strings, _)| strings.iter())
            .filter(|binding| parse_key_string(binding).is_err())
            .cloned()
            .collect()
    }
}

/// Parsed bindings, in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Keymap {
    bindings: Vec<(KeyBinding, Action)>,
}

impl Default for Keymap {
    fn default() -> Self {
        KeybindingConfig::default().keymap()
    }
}

impl Keymap {
    /// Get the action for a key event.
    ///
    /// A key bound to two actions resolves to the one declared first.
    pub fn get_action(&self, key: &KeyEvent) -> Action {
        self.bindings
            .iter()
            .find(|(binding, _)| binding.matches(key))
            .map(|(_, action)| *action)
            .unwrap_or(Action::None)
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// A parsed key binding with code and modifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    /// Check if this binding matches a key event.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        self.code == key.code
            && (self.modifiers == key.modifiers
                || self.modifiers == (key.modifiers & !KeyModifiers::SHIFT))
    }
}

/// Parse a binding such as `"j"`, `"PageDown"`, `"F5"` or `"Ctrl+Shift+a"`.
///
/// Modifiers (`Ctrl`, `Shift`, `Alt`) precede the key and are joined with
/// `+`; key names are case-insensitive, single characters are taken as-is.
pub fn parse_key_string(s: &str) -> Result<KeyBinding, String> {
    let s = s.trim();
    let (mods, key) = match s.rsplit_once('+') {
        Some((mods, key)) if !key.is_empty() => (Some(mods), key),
        _ => (None, s),
    };

    let mut modifiers = KeyModifiers::NONE;
    for part in mods.into_iter().flat_map(|m| m.split('+')) {
        modifiers |= match part.trim().to_lowercase().as_str() {
            "ctrl" | "control" => KeyModifiers::CONTROL,
            "shift" => KeyModifiers::SHIFT,
            "alt" => KeyModifiers::ALT,
            _ => return Err(format!("Unknown modifier: {}", part)),
        };
    }

    Ok(KeyBinding {
        code: parse_key_code(key)?,
        modifiers,
    })
}

fn parse_key_code(s: &str) -> Result<KeyCode, String> {
    let mut chars = s.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Ok(KeyCode::Char(c));
    }

    match s.to_lowercase().as_str() {
        "enter" | "return" => Ok(KeyCode::Enter),
        "tab" => Ok(KeyCode::Tab),
        "backtab" => Ok(KeyCode::BackTab),
        "backspace" | "bs" => Ok(KeyCode::Backspace),
        "delete" | "del" => Ok(KeyCode::Delete),
        "home" => Ok(KeyCode::Home),
        "end" => Ok(KeyCode::End),
        "pageup" | "pgup" => Ok(KeyCode::PageUp),
        "pagedown" | "pgdn" => Ok(KeyCode::PageDown),
        "up" => Ok(KeyCode::Up),
        "down" => Ok(KeyCode::Down),
        "left" => Ok(KeyCode::Left),
        "right" => Ok(KeyCode::Right),
        "esc" | "escape" => Ok(KeyCode::Esc),
        "space" => Ok(KeyCode::Char(' ')),
        other => other
            .strip_prefix('f')
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (1..=12).contains(n))
            .map(KeyCode::F)
            .ok_or_else(|| format!("Unknown key: {}", s)),
    }
}
