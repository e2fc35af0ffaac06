//! The command line at the bottom of the window, with history.
#[derive(Debug, Default)]
pub struct InputLine {
    buffer: String,
    /// Cursor position in characters.
    cursor: usize,
    history: Vec<String>,
    history_index: Option<usize>,
}

impl InputLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn byte_pos(&self, char_pos: usize) -> usize {
        self.buffer
            .char_indices()
            .nth(char_pos)
            .map_or(self.buffer.len(), |(i, _)| i)
    }

    pub fn insert(&mut self, c: char) {
        let pos = self.byte_pos(self.cursor);
        self.buffer.insert(pos, c);
        self.cursor += 1;
        self.history_index = None;
    }

    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        let pos = self.byte_pos(self.cursor);
        self.buffer.remove(pos);
        self.history_index = None;
        true
    }

    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.buffer.chars().count() {
            return false;
        }
        let pos = self.byte_pos(self.cursor);
        self.buffer.remove(pos);
        true
    }

    pub fn left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn right(&mut self) {
        if self.cursor < self.buffer.chars().count() {
            self.cursor += 1;
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.buffer.chars().count();
    }

    /// Takes the current line, recording it in history if it is not blank.
    pub fn take(&mut self) -> String {
        let line = std::mem::take(&mut self.buffer);
        self.cursor = 0;
        self.history_index = None;
        if !line.trim().is_empty() && self.history.last() != Some(&line) {
            self.history.push(line.clone());
        }
        line
    }

    /// Walks the history; `up` goes towards older entries.
    pub fn navigate_history(&mut self, up: bool) {
        if self.history.is_empty() {
            return;
        }

        self.history_index = if up {
            match self.history_index {
                None => Some(self.history.len() - 1),
                Some(i) => Some(i.saturating_sub(1)),
            }
        } else {
            match self.history_index {
                Some(i) if i + 1 < self.history.len() => Some(i + 1),
                _ => None,
            }
        };

        self.buffer = self
            .history_index
            .map(|i| self.history[i].clone())
            .unwrap_or_default();
        self.end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn typed(text: &str) -> InputLine {
        let mut input = InputLine::new();
        text.chars().for_each(|c| input.insert(c));
        input
    }

    #[test]
    fn test_editing_handles_multibyte_chars() {
        let mut input = typed("héllo");
        input.left();
        input.left();
        input.backspace();
        assert_eq!(input.as_str(), "hélo");
        input.home();
        input.delete();
        assert_eq!(input.as_str(), "élo");
        input.end();
        input.insert('!');
        assert_eq!(input.as_str(), "élo!");
    }

    #[test]
    fn test_history_navigation() {
        let mut input = typed("level 1");
        input.take();
        "list".chars().for_each(|c| input.insert(c));
        input.take();

        input.navigate_history(true);
        assert_eq!(input.as_str(), "list");
        input.navigate_history(true);
        assert_eq!(input.as_str(), "level 1");
        input.navigate_history(true);
        assert_eq!(input.as_str(), "level 1");
        input.navigate_history(false);
        assert_eq!(input.as_str(), "list");
        input.navigate_history(false);
        assert_eq!(input.as_str(), "");
    }

    #[test]
    fn test_blank_lines_stay_out_of_history() {
        let mut input = typed("   ");
        assert_eq!(input.take(), "   ");
        input.navigate_history(true);
        assert_eq!(input.as_str(), "");
    }
}
