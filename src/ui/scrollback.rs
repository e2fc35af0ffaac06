//! The on-screen log history the drain timer appends to.
use crate::logging::DisplaySurface;
use crossterm::style::Color;
use std::collections::VecDeque;

pub const DEFAULT_MAX_LINES: usize = 5000;

pub struct Scrollback {
    lines: VecDeque<(Color, String)>,
    max_lines: usize,
    /// Lines scrolled up from the bottom; 0 follows new output.
    offset: usize,
    /// Bumped on every change so the UI knows when to redraw.
    revision: u64,
}

impl Scrollback {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::with_capacity(max_lines.min(1024)),
            max_lines: max_lines.max(1),
            offset: 0,
            revision: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn scroll_up(&mut self, lines: usize, page: usize) {
        let max = self.lines.len().saturating_sub(page);
        self.offset = self.offset.saturating_add(lines).min(max);
        self.revision += 1;
    }

    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
        self.revision += 1;
    }

    pub fn jump_to_bottom(&mut self) {
        self.offset = 0;
        self.revision += 1;
    }

    /// The lines that fit in a view `height` rows tall at the current offset.
    pub fn visible(&self, height: usize) -> impl Iterator<Item = &(Color, String)> {
        let end = self.lines.len().saturating_sub(self.offset);
        let start = end.saturating_sub(height);
        self.lines.range(start..end)
    }
}

impl Default for Scrollback {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl DisplaySurface for Scrollback {
    fn append_styled(&mut self, color: Color, text: &str) {
        if self.lines.len() >= self.max_lines {
            self.lines.pop_front();
        }
        self.lines.push_back((color, text.to_string()));
        // Keep a scrolled view pinned to the same lines.
        if self.offset > 0 {
            self.offset = (self.offset + 1).min(self.lines.len());
        }
        self.revision += 1;
    }

    fn clear(&mut self) {
        self.lines.clear();
        self.offset = 0;
        self.revision += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(it: impl Iterator<Item = &'a (Color, String)>) -> Vec<&'a str> {
        it.map(|(_, t)| t.as_str()).collect()
    }

    #[test]
    fn test_visible_follows_the_tail() {
        let mut scrollback = Scrollback::new(10);
        for i in 0..5 {
            scrollback.append_styled(Color::White, &format!("line {}", i));
        }
        assert_eq!(texts(scrollback.visible(2)), vec!["line 3", "line 4"]);
    }

    #[test]
    fn test_oldest_lines_are_discarded() {
        let mut scrollback = Scrollback::new(3);
        for i in 0..5 {
            scrollback.append_styled(Color::White, &i.to_string());
        }
        assert_eq!(scrollback.len(), 3);
        assert_eq!(texts(scrollback.visible(10)), vec!["2", "3", "4"]);
    }

    #[test]
    fn test_scrolled_view_stays_put() {
        let mut scrollback = Scrollback::new(100);
        for i in 0..10 {
            scrollback.append_styled(Color::White, &i.to_string());
        }
        scrollback.scroll_up(3, 2);
        assert_eq!(texts(scrollback.visible(2)), vec!["5", "6"]);

        scrollback.append_styled(Color::White, "10");
        assert_eq!(texts(scrollback.visible(2)), vec!["5", "6"]);

        scrollback.jump_to_bottom();
        assert_eq!(texts(scrollback.visible(2)), vec!["9", "10"]);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut scrollback = Scrollback::new(100);
        scrollback.append_styled(Color::Red, "x");
        let before = scrollback.revision();
        scrollback.clear();
        assert!(scrollback.is_empty());
        assert_eq!(scrollback.offset(), 0);
        assert!(scrollback.revision() > before);
    }
}
