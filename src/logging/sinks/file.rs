//! Appends formatted log lines to a file on disk.
use crate::logging::format::format_line;
use crate::logging::sink::{Sink, SinkError};
use crate::logging::{LogCategory, Severity};
use chrono::Local;
use parking_lot::Mutex;
use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// File-backed sink. The file is opened lazily on the first message, so a
/// bad path shows up as delivery failures rather than a startup error.
pub struct FileSink {
    path: PathBuf,
    writer: Mutex<Option<BufWriter<File>>>,
}

impl FileSink {
    /// Creates a new `FileSink`. Nothing is opened until the first message.
    ///
    /// # Arguments
    ///
    /// * `path` - The log file, created if missing and appended to otherwise.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            writer: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&self) -> Result<BufWriter<File>, SinkError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        Ok(BufWriter::new(file))
    }
}

impl Sink for FileSink {
    fn name(&self) -> &str {
        "FileLog"
    }

    fn receive(
        &self,
        category: LogCategory,
        severity: Severity,
        text: &str,
    ) -> Result<(), SinkError> {
        let line = format_line(category, severity, text, &Local::now());
        let mut writer = self.writer.lock();
        if writer.is_none() {
            *writer = Some(self.open()?);
        }
        if let Some(out) = writer.as_mut() {
            let written = writeln!(out, "{}", line).and_then(|_| out.flush());
            if let Err(e) = written {
                // Reopen on the next message.
                *writer = None;
                return Err(e.into());
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_writes_formatted_lines() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logs").join("emu.log");
        let sink = FileSink::new(&path);

        sink.receive(LogCategory::Boot, Severity::Error, "no disc")
            .unwrap();
        sink.receive(LogCategory::Boot, Severity::Info, "retrying\n")
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with("E[BOOT]: no disc"));
        assert!(lines[1].ends_with("I[BOOT]: retrying"));
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("emu.log");
        std::fs::write(&path, "previous run\n").unwrap();

        let sink = FileSink::new(&path);
        sink.receive(LogCategory::Pad, Severity::Notice, "pad 1 connected")
            .unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.starts_with("previous run\n"));
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = tempdir().unwrap();
        // A directory cannot be opened for appending.
        let sink = FileSink::new(dir.path());
        let result = sink.receive(LogCategory::Boot, Severity::Error, "x");
        assert!(matches!(result, Err(SinkError::Io(_))));
    }
}
