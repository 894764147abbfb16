//! Converts frame strings carrying terminal escapes into ratatui text.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

const TAB_WIDTH: usize = 8;

/// Parse a whole frame. Each `\n` starts a new line.
pub fn to_text(frame: &str) -> Text<'static> {
    Text::from(frame.split('\n').map(decode_line).collect::<Vec<_>>())
}

/// Each line is fed to its own single-row screen, wide enough that
/// nothing wraps; overlong lines are clipped later by the paragraph.
fn decode_line(line: &str) -> Line<'static> {
    if line.is_empty() {
        return Line::default();
    }
    let tabs = line.matches('\t').count();
    let cols = u16::try_from(line.len() + tabs * TAB_WIDTH + 1).unwrap_or(u16::MAX);
    let mut parser = vt100::Parser::new(1, cols, 0);
    parser.process(line.as_bytes());

    let screen = parser.screen();
    let (_, end) = screen.cursor_position();

    let mut spans = Vec::new();
    let mut current_text = String::new();
    let mut current_style = Style::default();
    for col in 0..end {
        let Some(cell) = screen.cell(0, col) else {
            break;
        };
        if cell.is_wide_continuation() {
            continue;
        }
        let cell_style = cell_style(cell);
        if cell_style != current_style && !current_text.is_empty() {
            spans.push(Span::styled(std::mem::take(&mut current_text), current_style));
        }
        current_style = cell_style;

        let contents = cell.contents();
        if contents.is_empty() {
            current_text.push(' ');
        } else {
            current_text.push_str(&contents);
        }
    }
    if !current_text.is_empty() {
        spans.push(Span::styled(current_text, current_style));
    }
    Line::from(spans)
}

fn cell_style(cell: &vt100::Cell) -> Style {
    let mut style = Style::default();

    let fg = cell.fgcolor();
    if !matches!(fg, vt100::Color::Default) {
        style = style.fg(convert_color(fg));
    }
    let bg = cell.bgcolor();
    if !matches!(bg, vt100::Color::Default) {
        style = style.bg(convert_color(bg));
    }

    if cell.bold() {
        style = style.add_modifier(Modifier::BOLD);
    }
    if cell.italic() {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if cell.underline() {
        style = style.add_modifier(Modifier::UNDERLINED);
    }
    if cell.inverse() {
        style = style.add_modifier(Modifier::REVERSED);
    }
    style
}

/// The sixteen base indexes map back to ratatui's named colors.
fn convert_color(color: vt100::Color) -> Color {
    match color {
        vt100::Color::Default => Color::Reset,
        vt100::Color::Idx(0) => Color::Black,
        vt100::Color::Idx(1) => Color::Red,
        vt100::Color::Idx(2) => Color::Green,
        vt100::Color::Idx(3) => Color::Yellow,
        vt100::Color::Idx(4) => Color::Blue,
        vt100::Color::Idx(5) => Color::Magenta,
        vt100::Color::Idx(6) => Color::Cyan,
        vt100::Color::Idx(7) => Color::Gray,
        vt100::Color::Idx(8) => Color::DarkGray,
        vt100::Color::Idx(9) => Color::LightRed,
        vt100::Color::Idx(10) => Color::LightGreen,
        vt100::Color::Idx(11) => Color::LightYellow,
        vt100::Color::Idx(12) => Color::LightBlue,
        vt100::Color::Idx(13) => Color::LightMagenta,
        vt100::Color::Idx(14) => Color::LightCyan,
        vt100::Color::Idx(15) => Color::White,
        vt100::Color::Idx(i) => Color::Indexed(i),
        vt100::Color::Rgb(r, g, b) => Color::Rgb(r, g, b),
    }
}
