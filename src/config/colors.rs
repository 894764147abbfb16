//! Color configuration for the pager and markdown output.

use ratatui::style::Color;
use serde::{de, Deserialize, Deserializer};

/// Colors for the pager chrome and rendered articles.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    #[serde(deserialize_with = "deserialize_color")]
    pub header_fg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub header_bg: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub subheader: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub selection: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub title: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub metadata: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub summary: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub footer: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub status: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub heading: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub code: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub link: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub quote: Color,
    #[serde(deserialize_with = "deserialize_color")]
    pub rule: Color,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            header_fg: Color::White,
            header_bg: Color::Rgb(0x5F, 0x87, 0xD7),
            subheader: Color::Rgb(0x88, 0x88, 0xAA),
            selection: Color::Rgb(0xFF, 0xB6, 0xD9),
            title: Color::White,
            metadata: Color::Gray,
            summary: Color::Rgb(0xCC, 0xCC, 0xCC),
            footer: Color::DarkGray,
            status: Color::Yellow,
            heading: Color::LightCyan,
            code: Color::LightYellow,
            link: Color::LightBlue,
            quote: Color::Gray,
            rule: Color::DarkGray,
        }
    }
}

fn deserialize_color<'de, D>(deserializer: D) -> Result<Color, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_color_string(&s).map_err(de::Error::custom)
}

/// Parse a configured color.
///
/// Accepts the sixteen terminal color names (case-insensitive, `grey` and
/// `gray` both work), `Reset`, a 256-palette index such as `208`, and
/// `#RRGGBB` / `#RGB` hex codes.
pub fn parse_color_string(s: &str) -> Result<Color, String> {
    let s = s.trim();

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex).ok_or_else(|| format!("Invalid hex color: {}", s));
    }

    if let Ok(index) = s.parse::<u8>() {
        return Ok(Color::Indexed(index));
    }

    let color = match s.to_lowercase().replace(['_', '-', ' '], "").as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        "reset" | "default" => Color::Reset,
        _ => return Err(format!("Unknown color: {}", s)),
    };
    Ok(color)
}

fn parse_hex_color(hex: &str) -> Option<Color> {
    if !hex.is_ascii() {
        return None;
    }
    let channel = |digits: &str| u8::from_str_radix(digits, 16).ok();
    match hex.len() {
        6 => Some(Color::Rgb(
            channel(&hex[0..2])?,
            channel(&hex[2..4])?,
            channel(&hex[4..6])?,
        )),
        3 => Some(Color::Rgb(
            channel(&hex[0..1])? * 17,
            channel(&hex[1..2])? * 17,
            channel(&hex[2..3])? * 17,
        )),
        _ => None,
    }
}
