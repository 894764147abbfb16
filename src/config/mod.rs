//! Configuration management for Broadsheet.
//!
//! Configuration is read from `~/.config/broadsheet/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

pub mod colors;
pub mod keybindings;

pub use colors::ColorConfig;
pub use keybindings::{KeybindingConfig, Keymap};

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetcher::parallel::DEFAULT_WORKERS;
use crate::render::terminal::DEFAULT_WRAP_WIDTH;

/// Main configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub colors: ColorConfig,
    pub keybindings: KeybindingConfig,
    pub pager: PagerConfig,
    pub cache: CacheConfig,
    pub fetch: FetchConfig,
}

/// Interactive pager behaviour.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PagerConfig {
    /// Capture the mouse for wheel scrolling and click-to-open.
    pub mouse: bool,
    /// Maximum column at which article text is wrapped.
    pub wrap_width: usize,
    /// Characters of summary shown under each list entry.
    pub summary_width: usize,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            mouse: true,
            wrap_width: DEFAULT_WRAP_WIDTH,
            summary_width: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cached articles older than this are refreshed before a search.
    pub max_age_minutes: u64,
    /// Database location; defaults to the platform data directory.
    pub path: Option<PathBuf>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age_minutes: 60,
            path: None,
        }
    }
}

impl CacheConfig {
    pub fn max_age(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.max_age_minutes as i64)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub workers: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            workers: DEFAULT_WORKERS,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the default config file path: `~/.config/broadsheet/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("broadsheet").join("config.toml"))
    }

    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        fs::write(path, DEFAULT_CONFIG).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

const DEFAULT_CONFIG: &str = r##"# Broadsheet configuration
#
# Colors can be specified as:
# - Named colors: Black, Red, Green, Yellow, Blue, Magenta, Cyan, Gray,
#   DarkGray, LightRed, LightGreen, LightYellow, LightBlue, LightMagenta,
#   LightCyan, White, Reset
# - 256-color palette indexes: "208"
# - Hex colors: "#RRGGBB" or "#RGB"
#
# Keybindings can be specified as:
# - Single characters: "a", "G", "?"
# - Special keys: Enter, Tab, Backspace, Delete, Home, End, PageUp,
#   PageDown, Up, Down, Left, Right, Esc, Space, F1-F12
# - With modifiers: "Ctrl+c", "Alt+Enter"

[colors]
header_fg = "White"
header_bg = "#5F87D7"
subheader = "#8888AA"
selection = "#FFB6D9"
title = "White"
metadata = "Gray"
summary = "#CCCCCC"
footer = "DarkGray"
status = "Yellow"

# Article text
heading = "LightCyan"
code = "LightYellow"
link = "LightBlue"
quote = "Gray"
rule = "DarkGray"

[keybindings]
quit = ["q", "Ctrl+c"]
move_up = ["k", "Up"]
move_down = ["j", "Down"]
page_up = ["PageUp"]
page_down = ["PageDown", "Space"]
first = ["g", "Home"]
last = ["G", "End"]
open = ["Enter"]
back = ["Esc", "Backspace"]
toggle_help = ["h", "?"]
open_in_browser = ["o"]

[pager]
# Capture the mouse: wheel scrolls, left click opens an article
mouse = true

# Article text is wrapped at this column (or the terminal width if smaller)
wrap_width = 100

# Characters of summary shown under each article in the list
summary_width = 120

[cache]
# Minutes before cached articles are considered stale
max_age_minutes = 60

# Database file (defaults to the platform data directory)
# path = "/home/me/.local/share/broadsheet/cache.db"

[fetch]
# Per-request timeout in seconds
timeout_secs = 30

# Sources fetched concurrently
workers = 10
"##;

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}
