//! The destination capability shared by the viewer, file and console outputs.
use super::{LogCategory, Severity};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("sink '{0}' is closed")]
    Closed(String),
}

/// Something that can receive a routed log message.
///
/// `receive` is called synchronously on the producer's thread, so
/// implementations must not block for long. Each sink decides independently
/// whether to buffer, write or drop the message.
pub trait Sink: Send + Sync {
    /// Short identifier used in diagnostics.
    fn name(&self) -> &str;

    fn receive(&self, category: LogCategory, severity: Severity, text: &str)
        -> Result<(), SinkError>;
}

pub type SharedSink = Arc<dyn Sink>;

/// Identity comparison for subscribed sinks.
pub(crate) fn same_sink(a: &SharedSink, b: &SharedSink) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use parking_lot::Mutex;

    /// Records every delivery; optionally fails every call.
    pub struct RecordingSink {
        name: String,
        fail: bool,
        pub received: Mutex<Vec<(LogCategory, Severity, String)>>,
    }

    impl RecordingSink {
        pub fn new(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                fail: false,
                received: Mutex::new(Vec::new()),
            })
        }

        pub fn failing(name: &str) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                fail: true,
                received: Mutex::new(Vec::new()),
            })
        }

        pub fn count(&self) -> usize {
            self.received.lock().len()
        }
    }

    impl Sink for RecordingSink {
        fn name(&self) -> &str {
            &self.name
        }

        fn receive(
            &self,
            category: LogCategory,
            severity: Severity,
            text: &str,
        ) -> Result<(), SinkError> {
            if self.fail {
                return Err(SinkError::Closed(self.name.clone()));
            }
            self.received
                .lock()
                .push((category, severity, text.to_string()));
            Ok(())
        }
    }
}
