use anyhow::Result;
use crossterm::{
    cursor, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use std::io::{stdout, Write};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::TerminalUI;

const SIDE_PANEL_WIDTH: u16 = 22;
const PROMPT: &str = "log> ";

/// Cuts `text` to at most `width` display columns.
fn fit(text: &str, width: usize) -> String {
    if UnicodeWidthStr::width(text) <= width {
        return text.to_string();
    }
    let mut used = 0;
    let mut out = String::new();
    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width.saturating_sub(1) {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push('…');
    out
}

impl TerminalUI {
    pub(super) fn render(&mut self) -> Result<()> {
        let mut stdout = stdout();

        queue!(stdout, Clear(ClearType::All), cursor::MoveTo(0, 0))?;

        let (width, height) = self.terminal_size;
        let body_height = height.saturating_sub(2);
        let side_width = SIDE_PANEL_WIDTH.min(width / 3);
        let log_x = side_width + 1;
        let log_width = width.saturating_sub(log_x);

        self.render_side_panel(&mut stdout, side_width, body_height)?;
        self.render_log(&mut stdout, log_x, log_width, body_height)?;
        self.render_status_line(&mut stdout, body_height, width)?;
        self.render_input_area(&mut stdout, body_height + 1, width)?;

        stdout.flush()?;

        self.drawn_revision = Some(self.window.surface().lock().revision());
        self.dirty = false;
        Ok(())
    }

    fn render_side_panel(&self, stdout: &mut impl Write, width: u16, height: u16) -> Result<()> {
        let settings = self.window.settings();
        let on_off = |flag: bool| if flag { "on" } else { "off" };
        let mut lines: Vec<(Color, String)> = vec![
            (Color::Cyan, "Options".to_string()),
            (Color::White, format!("Verbosity {}", settings.verbosity)),
            (Color::White, format!("File      {}", on_off(settings.write_to_file))),
            (Color::White, format!("Console   {}", on_off(settings.write_to_console))),
            (Color::Cyan, "Logs".to_string()),
        ];
        for row in self.window.category_rows() {
            let (color, mark) = if row.checked {
                (Color::White, "[x]")
            } else {
                (Color::DarkGrey, "[ ]")
            };
            lines.push((color, format!("{} {}", mark, row.category.short_name())));
        }

        for (row, (color, text)) in lines.iter().take(height as usize).enumerate() {
            queue!(
                stdout,
                cursor::MoveTo(0, row as u16),
                SetForegroundColor(*color),
                Print(fit(text, width as usize)),
                ResetColor
            )?;
        }

        for row in 0..height {
            queue!(
                stdout,
                cursor::MoveTo(width, row),
                SetForegroundColor(Color::DarkGrey),
                Print("│"),
                ResetColor
            )?;
        }
        Ok(())
    }

    fn render_log(&self, stdout: &mut impl Write, x: u16, width: u16, height: u16) -> Result<()> {
        let scrollback = self.window.surface().lock();

        for (line_idx, (color, text)) in scrollback.visible(height as usize).enumerate() {
            queue!(
                stdout,
                cursor::MoveTo(x, line_idx as u16),
                SetForegroundColor(*color),
                Print(fit(text, width as usize)),
                ResetColor
            )?;
        }

        if scrollback.offset() > 0 && width > 16 {
            queue!(
                stdout,
                cursor::MoveTo(x + width - 16, 0),
                SetForegroundColor(Color::Yellow),
                Print(format!("↓ +{} newer", scrollback.offset())),
                ResetColor
            )?;
        }

        Ok(())
    }

    fn render_status_line(&self, stdout: &mut impl Write, row: u16, width: u16) -> Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, row),
            SetBackgroundColor(Color::DarkGrey),
            SetForegroundColor(Color::White)
        )?;

        let stats = self.window.stats();
        let status_text = format!(
            " Queue {}/{} | Dropped {} | Failures {} | Ctrl+L clear | Ctrl+T toggle | Esc quit",
            stats.queued, stats.capacity, stats.dropped, stats.delivery_failures
        );
        let display_text = fit(&status_text, width as usize);
        queue!(stdout, Print(&display_text))?;

        let padding = (width as usize).saturating_sub(UnicodeWidthStr::width(display_text.as_str()));
        if padding > 0 {
            queue!(stdout, Print(" ".repeat(padding)))?;
        }

        queue!(stdout, ResetColor)?;
        Ok(())
    }

    fn render_input_area(&self, stdout: &mut impl Write, row: u16, width: u16) -> Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, row),
            SetForegroundColor(Color::Cyan),
            Print(PROMPT),
            ResetColor
        )?;

        queue!(stdout, Print(self.input.as_str()))?;

        let input_display_width: usize = self
            .input
            .as_str()
            .chars()
            .take(self.input.cursor())
            .map(|c| UnicodeWidthChar::width(c).unwrap_or(0))
            .sum();

        let cursor_x = UnicodeWidthStr::width(PROMPT) + input_display_width;
        if cursor_x < width as usize {
            queue!(stdout, cursor::MoveTo(cursor_x as u16, row), cursor::Show)?;
        }

        Ok(())
    }
}
