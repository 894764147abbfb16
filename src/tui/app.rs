use chrono::{DateTime, Utc};
use crossterm::event::{KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use crate::config::{KeybindingConfig, Keymap};
use crate::domain::Item;
use crate::render::{Palette, Renderer};
use crate::tui::content::{self, ImageSupport, INVALID_SELECTION};
use crate::tui::event::{Action, AppEvent};
use crate::tui::layout::{self, ListFrame, RowSpan};
use crate::tui::viewport::{body_height, Viewport, CHROME_ROWS};
use crate::tui::{Command, Model};

const DEFAULT_WIDTH: u16 = 80;
const DEFAULT_HEIGHT: u16 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Detail,
}

/// Which kinds of input the pager reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Keyboard,
    KeyboardMouse,
}

impl InputMode {
    pub fn from_config(mouse: bool) -> Self {
        if mouse {
            InputMode::KeyboardMouse
        } else {
            InputMode::Keyboard
        }
    }

    fn mouse(self) -> bool {
        self == InputMode::KeyboardMouse
    }
}

/// State of one pager session over a fixed list of items.
///
/// `selected` is `None` exactly when `items` is empty, and `view` is only
/// ever `Detail` with a valid selection.
pub struct Pager<'a> {
    items: &'a [Item],
    title: String,
    view: View,
    selected: Option<usize>,
    show_help: bool,
    width: u16,
    height: u16,
    viewport: Viewport,
    list_offset: usize,
    input: InputMode,
    keys: Keymap,
    renderer: Box<dyn Renderer + 'a>,
    palette: Palette,
    images: ImageSupport,
    summary_width: usize,
    status: Option<String>,
    clock: fn() -> DateTime<Utc>,
}

impl<'a> Pager<'a> {
    pub fn new(items: &'a [Item], title: impl Into<String>, renderer: Box<dyn Renderer + 'a>) -> Self {
        Self {
            items,
            title: title.into(),
            view: View::List,
            selected: if items.is_empty() { None } else { Some(0) },
            show_help: false,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            viewport: Viewport::for_window(DEFAULT_HEIGHT),
            list_offset: 0,
            input: InputMode::KeyboardMouse,
            keys: Keymap::default(),
            renderer,
            palette: Palette::plain(),
            images: ImageSupport::LinkOnly,
            summary_width: 120,
            status: None,
            clock: Utc::now,
        }
    }

    pub fn with_keybindings(mut self, keys: &KeybindingConfig) -> Self {
        self.keys = keys.keymap();
        self
    }

    pub fn with_input(mut self, input: InputMode) -> Self {
        self.input = input;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_summary_width(mut self, summary_width: usize) -> Self {
        self.summary_width = summary_width;
        self
    }

    pub fn with_images(mut self, images: ImageSupport) -> Self {
        self.images = images;
        self
    }

    pub fn with_size(mut self, width: u16, height: u16) -> Self {
        self.resize(width, height);
        self
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn mode(&self) -> View {
        self.view
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn list_offset(&self) -> usize {
        self.list_offset
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn selected_item(&self) -> Option<&'a Item> {
        self.selected.and_then(|i| self.items.get(i))
    }

    fn handle_key(&mut self, key: KeyEvent) -> Option<Command> {
        self.status = None;
        let action = self.keys.get_action(&key);
        self.handle_action(action)
    }

    fn handle_action(&mut self, action: Action) -> Option<Command> {
        if action == Action::Quit {
            return Some(Command::Quit);
        }
        if self.items.is_empty() {
            return None;
        }

        match (self.view, action) {
            (_, Action::ToggleHelp) => self.show_help = !self.show_help,
            (_, Action::OpenInBrowser) => self.open_in_browser(),

            (View::List, Action::MoveUp) => self.move_selection(-1),
            (View::List, Action::MoveDown) => self.move_selection(1),
            (View::List, Action::PageUp) => self.move_selection(-self.list_page()),
            (View::List, Action::PageDown) => self.move_selection(self.list_page()),
            (View::List, Action::First) => self.select(0),
            (View::List, Action::Last) => self.select(self.items.len() - 1),
            (View::List, Action::Open) => self.open_selected(),

            (View::Detail, Action::MoveUp) => self.viewport.line_up(),
            (View::Detail, Action::MoveDown) => self.viewport.line_down(),
            (View::Detail, Action::PageUp) => self.viewport.page_up(),
            (View::Detail, Action::PageDown) => self.viewport.page_down(),
            (View::Detail, Action::First) => self.viewport.top(),
            (View::Detail, Action::Last) => self.viewport.bottom(),
            (View::Detail, Action::Back) => self.view = View::List,

            _ => {}
        }
        None
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        if !self.input.mouse() || self.items.is_empty() {
            return;
        }

        match (self.view, mouse.kind) {
            (View::List, MouseEventKind::ScrollUp) => self.move_selection(-1),
            (View::List, MouseEventKind::ScrollDown) => self.move_selection(1),
            (View::Detail, MouseEventKind::ScrollUp) => self.viewport.line_up(),
            (View::Detail, MouseEventKind::ScrollDown) => self.viewport.line_down(),
            (View::List, MouseEventKind::Down(MouseButton::Left)) => {
                let table = self.list_table();
                if let Some(index) = layout::hit_test(&table, usize::from(mouse.row)) {
                    self.select(index);
                    self.open_selected();
                }
            }
            _ => {}
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.viewport.set_height(body_height(height));
        self.ensure_visible();
    }

    fn move_selection(&mut self, delta: isize) {
        if let Some(current) = self.selected {
            let last = self.items.len() - 1;
            let target = current.saturating_add_signed(delta).min(last);
            self.select(target);
        }
    }

    fn select(&mut self, index: usize) {
        if index < self.items.len() {
            self.selected = Some(index);
            self.ensure_visible();
        }
    }

    /// Number of whole items on screen, used as the list page size.
    fn list_page(&self) -> isize {
        self.list_table().len().max(1) as isize
    }

    fn list_table(&self) -> Vec<RowSpan> {
        layout::list_hit_table(self.items, self.list_offset, self.height, self.summary_width)
    }

    /// Scroll the list so the selected item is fully on screen.
    fn ensure_visible(&mut self) {
        let Some(selected) = self.selected else {
            return;
        };
        if selected < self.list_offset {
            self.list_offset = selected;
        }
        while self.list_offset < selected
            && !self.list_table().iter().any(|span| span.index == selected)
        {
            self.list_offset += 1;
        }
    }

    fn open_selected(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        let mut text = content::render_item(item, self.renderer.as_ref(), self.images, (self.clock)());
        // Exactly one trailing blank row so the last line can scroll into view.
        text.truncate(text.trim_end_matches('\n').len());
        text.push_str("\n\n");

        self.viewport.set_height(body_height(self.height));
        self.viewport.set_content(text);
        self.view = View::Detail;
    }

    fn open_in_browser(&mut self) {
        let Some(item) = self.selected_item() else {
            return;
        };
        if item.link.is_empty() {
            self.status = Some("This article has no link".to_string());
            return;
        }
        match open::that(&item.link) {
            Ok(()) => tracing::debug!("Opened {} in browser", item.link),
            Err(e) => {
                tracing::debug!("Failed to open {}: {}", item.link, e);
                self.status = Some(format!("Failed to open browser: {}", e));
            }
        }
    }

    fn compose_list(&self, selected: usize) -> String {
        let footer = layout::footer_or_status(
            &self.palette,
            layout::list_footer(self.show_help),
            self.status(),
        );
        layout::list_frame(&ListFrame {
            items: self.items,
            title: &self.title,
            selected,
            offset: self.list_offset,
            width: self.width,
            height: self.height,
            summary_width: self.summary_width,
            footer: &footer,
            now: (self.clock)(),
            palette: &self.palette,
        })
    }

    fn compose_detail(&self, selected: usize) -> String {
        let body_rows = self.viewport.height().saturating_sub(CHROME_ROWS);
        let footer = layout::footer_or_status(
            &self.palette,
            &layout::detail_footer(self.show_help, self.viewport.scroll_percent()),
            self.status(),
        );

        match self.items.get(selected) {
            Some(item) => layout::detail_frame(
                &layout::detail_header(selected + 1, self.items.len(), &item.source),
                &self.viewport.visible_lines(),
                body_rows,
                &footer,
                self.width,
                &self.palette,
            ),
            None => layout::detail_frame(
                "📖 Article",
                &[INVALID_SELECTION],
                body_rows,
                &footer,
                self.width,
                &self.palette,
            ),
        }
    }
}

impl Model for Pager<'_> {
    fn init(&mut self) -> Option<Command> {
        None
    }

    fn update(&mut self, event: AppEvent) -> Option<Command> {
        match event {
            AppEvent::Key(key) => return self.handle_key(key),
            AppEvent::Mouse(mouse) => self.handle_mouse(mouse),
            AppEvent::Resize(width, height) => self.resize(width, height),
            AppEvent::Tick => {}
        }
        None
    }

    fn view(&self) -> String {
        match (self.selected, self.view) {
            (None, _) => layout::empty_frame(&self.palette),
            (Some(selected), View::List) => self.compose_list(selected),
            (Some(selected), View::Detail) => self.compose_detail(selected),
        }
    }
}
