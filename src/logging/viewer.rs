//! The interactive viewer's sink: formats messages and buffers them in a
//! [`BoundedLogQueue`] until the drain timer picks them up.
use super::format::format_line;
use super::queue::{BoundedLogQueue, LogMessage};
use super::sink::{Sink, SinkError};
use super::{LogCategory, Severity};
use chrono::Local;
use std::sync::Arc;

pub struct ViewerSink {
    queue: Arc<BoundedLogQueue>,
    min_severity: Severity,
}

impl ViewerSink {
    /// Least severe level the viewer accepts, independent of category thresholds.
    pub const MIN_SEVERITY: Severity = Severity::Notice;

    pub fn new(queue: Arc<BoundedLogQueue>) -> Self {
        Self {
            queue,
            min_severity: Self::MIN_SEVERITY,
        }
    }

    pub fn queue(&self) -> &Arc<BoundedLogQueue> {
        &self.queue
    }
}

impl Sink for ViewerSink {
    fn name(&self) -> &str {
        "LogWindow"
    }

    fn receive(
        &self,
        category: LogCategory,
        severity: Severity,
        text: &str,
    ) -> Result<(), SinkError> {
        if !severity.is_at_least(self.min_severity) {
            return Ok(());
        }
        let line = format_line(category, severity, text, &Local::now());
        self.queue.enqueue(LogMessage::new(severity, line));
        Ok(())
    }
}
