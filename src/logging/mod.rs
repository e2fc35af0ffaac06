//! This module contains the logging core of the application.
//!
//! Producers on any thread publish through a shared [`LogRouter`], which
//! hands each message to the sinks subscribed to its category. The viewer's
//! sink buffers into a [`BoundedLogQueue`] that a [`DrainTimer`] empties onto
//! the screen; the file and console sinks write through immediately.
pub mod category;
pub mod collector;
pub mod format;
pub mod queue;
pub mod router;
pub mod severity;
pub mod sink;
pub mod sinks;
pub mod timer;
pub mod viewer;

pub use category::LogCategory;
pub use collector::RouterLayer;
pub use queue::BoundedLogQueue;
pub use router::LogRouter;
pub use severity::Severity;
pub use sink::SharedSink;
pub use sinks::{ConsoleSink, FileSink};
pub use timer::{DisplaySurface, DrainTimer, TimerError};
pub use viewer::ViewerSink;
