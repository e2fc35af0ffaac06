//! Periodically empties the viewer queue onto a display surface.
//!
//! Modelled as a tokio task driven by an interval. The task drains, forwards
//! each message with its severity colour, and only then waits for the next
//! tick, so a slow surface delays the next drain instead of overlapping it.
use super::queue::BoundedLogQueue;
use super::severity::color_for;
use crossterm::style::Color;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::debug;

/// Default time between drains.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// Somewhere styled text can be appended, such as the terminal scrollback.
pub trait DisplaySurface: Send + 'static {
    fn append_styled(&mut self, color: Color, text: &str);

    fn clear(&mut self);
}

#[derive(Debug, Error)]
pub enum TimerError {
    #[error("the drain timer must be started from within a tokio runtime")]
    NoRuntime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerState {
    Stopped,
    Running,
}

pub struct DrainTimer<S: DisplaySurface> {
    queue: Arc<BoundedLogQueue>,
    surface: Arc<Mutex<S>>,
    period: Duration,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<S: DisplaySurface> DrainTimer<S> {
    /// Creates a stopped `DrainTimer`.
    ///
    /// # Arguments
    ///
    /// * `queue` - The queue the viewer sink fills.
    /// * `surface` - Where drained lines are appended.
    /// * `period` - Time between scheduled drains.
    pub fn new(queue: Arc<BoundedLogQueue>, surface: Arc<Mutex<S>>, period: Duration) -> Self {
        Self {
            queue,
            surface,
            period,
            task: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn state(&self) -> TimerState {
        match self.task.lock().as_ref() {
            Some(handle) if !handle.is_finished() => TimerState::Running,
            _ => TimerState::Stopped,
        }
    }

    /// Starts ticking. Starting a running timer is a no-op and returns `Ok(false)`.
    pub fn start(&self) -> Result<bool, TimerError> {
        let mut task = self.task.lock();
        if matches!(task.as_ref(), Some(handle) if !handle.is_finished()) {
            return Ok(false);
        }

        let runtime = tokio::runtime::Handle::try_current().map_err(|_| TimerError::NoRuntime)?;
        let queue = self.queue.clone();
        let surface = self.surface.clone();
        let period = self.period;

        *task = Some(runtime.spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker.tick().await; // Skip the immediate first tick.

            loop {
                ticker.tick().await;
                pump(&queue, &surface);
            }
        }));

        debug!("Drain timer started ({:?} period)", period);
        Ok(true)
    }

    /// Stops ticking. Stopping a stopped timer is a no-op.
    pub fn stop(&self) {
        if let Some(handle) = self.task.lock().take() {
            handle.abort();
            debug!("Drain timer stopped");
        }
    }

    /// Drains immediately, outside the regular schedule.
    pub fn flush(&self) -> usize {
        pump(&self.queue, &self.surface)
    }
}

impl<S: DisplaySurface> Drop for DrainTimer<S> {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Moves every queued message onto the surface.
///
/// The surface lock is held across the drain, which serializes scheduled and
/// manual drains.
fn pump<S: DisplaySurface>(queue: &BoundedLogQueue, surface: &Mutex<S>) -> usize {
    let mut surface = surface.lock();
    let messages = queue.drain();
    for message in &messages {
        surface.append_styled(color_for(Some(message.severity)), &message.text);
    }
    messages.len()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Collects appended lines in memory.
    #[derive(Default)]
    pub struct MemorySurface {
        pub lines: Vec<(Color, String)>,
        pub clears: usize,
    }

    impl DisplaySurface for MemorySurface {
        fn append_styled(&mut self, color: Color, text: &str) {
            self.lines.push((color, text.to_string()));
        }

        fn clear(&mut self) {
            self.lines.clear();
            self.clears += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::MemorySurface;
    use super::*;
    use crate::logging::queue::LogMessage;
    use crate::logging::Severity;

    fn fixture() -> (Arc<BoundedLogQueue>, Arc<Mutex<MemorySurface>>, DrainTimer<MemorySurface>) {
        let queue = Arc::new(BoundedLogQueue::new(100));
        let surface = Arc::new(Mutex::new(MemorySurface::default()));
        let timer = DrainTimer::new(queue.clone(), surface.clone(), DEFAULT_INTERVAL);
        (queue, surface, timer)
    }

    #[test]
    fn test_flush_forwards_with_colors_in_order() {
        let (queue, surface, timer) = fixture();
        queue.enqueue(LogMessage::new(Severity::Error, "first"));
        queue.enqueue(LogMessage::new(Severity::Notice, "second"));

        assert_eq!(timer.flush(), 2);
        let surface = surface.lock();
        assert_eq!(
            surface.lines,
            vec![
                (Severity::Error.color(), "first".to_string()),
                (Severity::Notice.color(), "second".to_string()),
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn test_start_outside_runtime_fails() {
        let (_queue, _surface, timer) = fixture();
        assert!(matches!(timer.start(), Err(TimerError::NoRuntime)));
        assert_eq!(timer.state(), TimerState::Stopped);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_drain_the_queue() {
        let (queue, surface, timer) = fixture();
        assert!(timer.start().unwrap());
        assert_eq!(timer.state(), TimerState::Running);

        queue.enqueue(LogMessage::new(Severity::Warning, "tick me"));
        tokio::time::sleep(DEFAULT_INTERVAL + Duration::from_millis(10)).await;

        assert_eq!(surface.lock().lines.len(), 1);
        assert!(queue.is_empty());
        timer.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_is_idempotent() {
        let (_queue, _surface, timer) = fixture();
        assert!(timer.start().unwrap());
        assert!(!timer.start().unwrap());
        assert_eq!(timer.state(), TimerState::Running);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stopped_timer_leaves_queue_alone() {
        let (queue, surface, timer) = fixture();
        timer.start().unwrap();
        timer.stop();
        assert_eq!(timer.state(), TimerState::Stopped);

        queue.enqueue(LogMessage::new(Severity::Error, "waiting"));
        tokio::time::sleep(DEFAULT_INTERVAL * 5).await;

        assert!(surface.lock().lines.is_empty());
        assert_eq!(queue.len(), 1);

        // Restart picks the backlog up.
        timer.start().unwrap();
        tokio::time::sleep(DEFAULT_INTERVAL * 2).await;
        assert_eq!(surface.lock().lines.len(), 1);
    }
}
