//! Writes coloured log lines to a terminal stream (stderr by default).
use crate::logging::format::timestamp;
use crate::logging::sink::{Sink, SinkError};
use crate::logging::{LogCategory, Severity};
use chrono::Local;
use colored::{ColoredString, Colorize};
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use parking_lot::Mutex;
use std::io::{self, Write};

pub struct ConsoleSink {
    out: Mutex<Box<dyn Write + Send>>,
    colored: bool,
}

impl ConsoleSink {
    pub fn stderr() -> Self {
        Self {
            out: Mutex::new(Box::new(io::stderr())),
            colored: true,
        }
    }

    /// Writes plain, uncoloured lines to `out`.
    pub fn with_writer(out: impl Write + Send + 'static) -> Self {
        Self {
            out: Mutex::new(Box::new(out)),
            colored: false,
        }
    }

    fn code(&self, severity: Severity) -> ColoredString {
        let code = severity.code().to_string();
        if !self.colored {
            return code.normal();
        }
        match severity {
            Severity::Error => code.red().bold(),
            Severity::Warning => code.yellow().bold(),
            Severity::Notice => code.green(),
            Severity::Info => code.cyan(),
            Severity::Debug => code.white().dimmed(),
        }
    }

    /// Clears the terminal behind this sink.
    pub fn clear_screen(&self) -> Result<(), SinkError> {
        let mut out = self.out.lock();
        execute!(out, Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        Ok(())
    }
}

impl Sink for ConsoleSink {
    fn name(&self) -> &str {
        "Console"
    }

    fn receive(
        &self,
        category: LogCategory,
        severity: Severity,
        text: &str,
    ) -> Result<(), SinkError> {
        let line = format!(
            "{} {}[{}]: {}",
            timestamp(&Local::now()),
            self.code(severity),
            category.short_name(),
            text.trim_end_matches(&['\r', '\n'][..])
        );
        let mut out = self.out.lock();
        writeln!(out, "{}", line)?;
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_plain_writer_output() {
        let buffer = SharedBuffer::default();
        let sink = ConsoleSink::with_writer(buffer.clone());

        sink.receive(LogCategory::Console, Severity::Warning, "low battery")
            .unwrap();

        let written = String::from_utf8(buffer.0.lock().clone()).unwrap();
        assert!(written.ends_with(" W[CONSOLE]: low battery\n"));
    }

    #[test]
    fn test_clear_screen_emits_escape_sequence() {
        let buffer = SharedBuffer::default();
        let sink = ConsoleSink::with_writer(buffer.clone());
        sink.clear_screen().unwrap();
        assert!(buffer.0.lock().starts_with(b"\x1b["));
    }
}
