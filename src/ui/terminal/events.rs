use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::cli::Outcome;
use crate::settings::Geometry;
use crate::ui::UIEvent;

use super::TerminalUI;

impl TerminalUI {
    pub(super) fn handle_event(&mut self, event: UIEvent) -> Result<Outcome> {
        match event {
            UIEvent::KeyPress(key_event) => return self.handle_key_event(key_event),
            UIEvent::Resize(width, height) => {
                self.terminal_size = (width, height);
                let previous = self.window.settings().geometry;
                self.window.set_geometry(Geometry {
                    w: i64::from(width),
                    h: i64::from(height),
                    ..previous
                });
                self.dirty = true;
            }
            UIEvent::Tick => {}
        }
        Ok(Outcome::Continue)
    }

    fn log_page(&self) -> usize {
        usize::from(self.terminal_size.1.saturating_sub(3)).max(1)
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Outcome> {
        if key.kind == KeyEventKind::Release {
            return Ok(Outcome::Continue);
        }
        self.dirty = true;

        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => {
                return Ok(Outcome::Quit);
            }
            (KeyCode::Char('l'), KeyModifiers::CONTROL) => {
                self.window.clear();
                return Ok(Outcome::Continue);
            }
            (KeyCode::Char('t'), KeyModifiers::CONTROL) => {
                self.window.toggle_all();
                return Ok(Outcome::Continue);
            }
            _ => {}
        }

        let page = self.log_page();
        match key.code {
            KeyCode::Enter => {
                let line = self.input.take();
                if !line.trim().is_empty() {
                    self.window.surface().lock().jump_to_bottom();
                    return Ok(self.window.submit(&line));
                }
            }
            KeyCode::Char(c) => self.input.insert(c),
            KeyCode::Backspace => {
                self.input.backspace();
            }
            KeyCode::Delete => {
                self.input.delete();
            }
            KeyCode::Left => self.input.left(),
            KeyCode::Right => self.input.right(),
            KeyCode::Home => self.input.home(),
            KeyCode::End => self.input.end(),
            KeyCode::Up if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.window.surface().lock().scroll_up(1, page);
            }
            KeyCode::Down if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.window.surface().lock().scroll_down(1);
            }
            KeyCode::Up => self.input.navigate_history(true),
            KeyCode::Down => self.input.navigate_history(false),
            KeyCode::PageUp => self.window.surface().lock().scroll_up(page, page),
            KeyCode::PageDown => self.window.surface().lock().scroll_down(page),
            _ => {}
        }

        Ok(Outcome::Continue)
    }
}
