//! Scroll arithmetic over one article's rendered text.

/// Rows reserved out of the terminal height for header and footer.
///
/// Used for the viewport height, the page step and the visible slice.
pub const CHROME_ROWS: usize = 2;

/// A scrollable window over line-delimited text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    content: String,
    total: usize,
    offset: usize,
    height: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self {
            height,
            ..Self::default()
        }
    }

    /// Viewport sized for a terminal of `window_height` rows.
    pub fn for_window(window_height: u16) -> Self {
        Self::new(body_height(window_height))
    }

    /// Replace the text and scroll back to the top.
    pub fn set_content(&mut self, content: String) {
        self.total = content.lines().count();
        self.content = content;
        self.offset = 0;
    }

    pub fn set_height(&mut self, height: usize) {
        self.height = height;
        self.offset = self.offset.min(self.max_scroll());
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn total_lines(&self) -> usize {
        self.total
    }

    /// `max(0, L - H + 1)`
    pub fn max_scroll(&self) -> usize {
        (self.total + 1).saturating_sub(self.height)
    }

    pub fn page_step(&self) -> usize {
        self.height.saturating_sub(CHROME_ROWS).max(1)
    }

    pub fn line_up(&mut self) {
        self.offset = self.offset.saturating_sub(1);
    }

    pub fn line_down(&mut self) {
        self.scroll_to(self.offset.saturating_add(1));
    }

    pub fn page_up(&mut self) {
        self.offset = self.offset.saturating_sub(self.page_step());
    }

    pub fn page_down(&mut self) {
        self.scroll_to(self.offset.saturating_add(self.page_step()));
    }

    pub fn top(&mut self) {
        self.offset = 0;
    }

    pub fn bottom(&mut self) {
        self.offset = self.max_scroll();
    }

    fn scroll_to(&mut self, offset: usize) {
        self.offset = offset.min(self.max_scroll());
    }

    /// Lines `[offset, offset + H - CHROME_ROWS)`, never empty while there is
    /// content to show.
    pub fn visible_lines(&self) -> Vec<&str> {
        if self.total == 0 {
            return Vec::new();
        }
        let start = self.offset.min(self.total - 1);
        let count = self.height.saturating_sub(CHROME_ROWS).max(1);
        self.content.lines().skip(start).take(count).collect()
    }

    /// Scroll position as a percentage, 0 when everything fits.
    pub fn scroll_percent(&self) -> u16 {
        if self.total <= self.height {
            return 0;
        }
        let range = (self.total - self.height) as f64;
        let percent = (self.offset as f64 / range * 100.0).round();
        percent.min(100.0) as u16
    }
}

/// Body rows available in a terminal of `window_height` rows.
pub fn body_height(window_height: u16) -> usize {
    usize::from(window_height).saturating_sub(CHROME_ROWS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn numbered(lines: usize) -> String {
        (0..lines).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n")
    }

    fn viewport(lines: usize, height: usize) -> Viewport {
        let mut vp = Viewport::new(height);
        vp.set_content(numbered(lines));
        vp
    }

    #[test]
    fn test_max_scroll() {
        assert_eq!(viewport(100, 20).max_scroll(), 81);
        assert_eq!(viewport(20, 20).max_scroll(), 1);
        assert_eq!(viewport(5, 20).max_scroll(), 0);
        assert_eq!(viewport(0, 20).max_scroll(), 0);
    }

    #[test]
    fn test_page_down_clamps_at_max_scroll() {
        let mut vp = viewport(100, 20);
        assert_eq!(vp.page_step(), 18);

        let mut seen = Vec::new();
        for _ in 0..10 {
            vp.page_down();
            seen.push(vp.offset());
        }
        assert_eq!(&seen[..5], &[18, 36, 54, 72, 81]);
        assert!(seen.iter().all(|&o| o <= 81));
        assert_eq!(vp.offset(), 81);
    }

    #[test]
    fn test_line_steps_and_jumps() {
        let mut vp = viewport(30, 10);
        vp.line_up();
        assert_eq!(vp.offset(), 0);
        vp.line_down();
        vp.line_down();
        assert_eq!(vp.offset(), 2);
        vp.bottom();
        assert_eq!(vp.offset(), 21);
        vp.line_down();
        assert_eq!(vp.offset(), 21);
        vp.top();
        assert_eq!(vp.offset(), 0);
    }

    #[test]
    fn test_page_step_never_zero() {
        let mut vp = viewport(50, 2);
        assert_eq!(vp.page_step(), 1);
        vp.page_down();
        assert_eq!(vp.offset(), 1);
    }

    #[test]
    fn test_visible_lines_slice() {
        let mut vp = viewport(100, 20);
        vp.page_down();
        let visible = vp.visible_lines();
        assert_eq!(visible.len(), 18);
        assert_eq!(visible[0], "line 18");
        assert_eq!(visible[17], "line 35");
    }

    #[test]
    fn test_visible_lines_at_bottom_still_shows_text() {
        let mut vp = viewport(3, 10);
        vp.bottom();
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.visible_lines(), vec!["line 0", "line 1", "line 2"]);

        let mut vp = viewport(100, 20);
        vp.bottom();
        assert_eq!(vp.visible_lines(), vec!["line 81", "line 82", "line 83", "line 84", "line 85",
            "line 86", "line 87", "line 88", "line 89", "line 90", "line 91", "line 92", "line 93",
            "line 94", "line 95", "line 96", "line 97", "line 98"]);
    }

    #[test]
    fn test_visible_lines_tiny_window_shows_one_line() {
        let mut vp = viewport(10, 1);
        vp.bottom();
        assert_eq!(vp.visible_lines().len(), 1);
    }

    #[test]
    fn test_scroll_percent() {
        let mut vp = viewport(100, 20);
        assert_eq!(vp.scroll_percent(), 0);
        vp.set_offset_for_test(40);
        assert_eq!(vp.scroll_percent(), 50);
        vp.bottom();
        assert_eq!(vp.scroll_percent(), 100);

        let vp = viewport(10, 20);
        assert_eq!(vp.scroll_percent(), 0);
        let vp = viewport(20, 20);
        assert_eq!(vp.scroll_percent(), 0);
    }

    #[test]
    fn test_set_content_resets_offset() {
        let mut vp = viewport(100, 20);
        vp.bottom();
        vp.set_content(numbered(50));
        assert_eq!(vp.offset(), 0);
        assert_eq!(vp.total_lines(), 50);
    }

    #[test]
    fn test_shrinking_content_window_clamps_offset() {
        let mut vp = viewport(100, 20);
        vp.bottom();
        vp.set_height(60);
        assert_eq!(vp.offset(), 41);
    }

    impl Viewport {
        fn set_offset_for_test(&mut self, offset: usize) {
            self.offset = offset;
        }
    }

    #[derive(Debug, Clone, Copy)]
    enum Step {
        LineUp,
        LineDown,
        PageUp,
        PageDown,
        Top,
        Bottom,
        Resize(usize),
    }

    fn step() -> impl Strategy<Value = Step> {
        prop_oneof![
            Just(Step::LineUp),
            Just(Step::LineDown),
            Just(Step::PageUp),
            Just(Step::PageDown),
            Just(Step::Top),
            Just(Step::Bottom),
            (0usize..60).prop_map(Step::Resize),
        ]
    }

    proptest! {
        #[test]
        fn offset_stays_within_bounds(
            lines in 0usize..300,
            height in 0usize..60,
            steps in proptest::collection::vec(step(), 0..80),
        ) {
            let mut vp = viewport(lines, height);
            for step in steps {
                match step {
                    Step::LineUp => vp.line_up(),
                    Step::LineDown => vp.line_down(),
                    Step::PageUp => vp.page_up(),
                    Step::PageDown => vp.page_down(),
                    Step::Top => vp.top(),
                    Step::Bottom => vp.bottom(),
                    Step::Resize(h) => vp.set_height(h),
                }
                prop_assert!(vp.offset() <= vp.max_scroll());
                prop_assert!(vp.scroll_percent() <= 100);
                if lines > 0 {
                    prop_assert!(!vp.visible_lines().is_empty());
                }
            }
        }
    }
}
