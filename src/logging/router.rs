//! Routes log messages from producers to the sinks subscribed to each category.
//!
//! The router is an explicitly owned value shared through an `Arc`; there is
//! no process-wide instance. Subscription state lives behind its own lock,
//! separate from any sink's internal buffering.
use super::sink::{same_sink, SharedSink};
use super::{LogCategory, Severity};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Target used for diagnostics about the router itself. The tracing bridge
/// ignores this target so a failing sink cannot feed back into `publish`.
pub const INTERNAL_TARGET: &str = "emu_logview::router";

struct CategoryState {
    enabled: bool,
    level: Severity,
    /// Copy-on-write so `publish` only clones an `Arc` under the lock.
    sinks: Arc<Vec<SharedSink>>,
}

impl CategoryState {
    fn new(level: Severity) -> Self {
        Self {
            enabled: true,
            level,
            sinks: Arc::new(Vec::new()),
        }
    }
}

/// Per-category enable flag, severity threshold and subscriber set.
pub struct LogRouter {
    categories: RwLock<Vec<CategoryState>>,
    failures: AtomicU64,
    last_failure: RwLock<Option<String>>,
}

impl LogRouter {
    /// Creates a router with every category enabled at the default level.
    pub fn new() -> Self {
        Self::with_level(Severity::DEFAULT)
    }

    pub fn with_level(level: Severity) -> Self {
        Self {
            categories: RwLock::new(LogCategory::all().map(|_| CategoryState::new(level)).collect()),
            failures: AtomicU64::new(0),
            last_failure: RwLock::new(None),
        }
    }

    /// Sets the least severe level that is still delivered for `category`.
    /// Affects subsequent `publish` calls only.
    pub fn set_level(&self, category: LogCategory, level: Severity) {
        self.categories.write()[category.index()].level = level;
    }

    pub fn set_level_all(&self, level: Severity) {
        for state in self.categories.write().iter_mut() {
            state.level = level;
        }
    }

    pub fn level(&self, category: LogCategory) -> Severity {
        self.categories.read()[category.index()].level
    }

    pub fn set_enable(&self, category: LogCategory, enabled: bool) {
        self.categories.write()[category.index()].enabled = enabled;
    }

    pub fn is_enabled(&self, category: LogCategory) -> bool {
        self.categories.read()[category.index()].enabled
    }

    /// Adds `sink` to `category`. Returns `false` if it was already subscribed.
    pub fn subscribe(&self, category: LogCategory, sink: &SharedSink) -> bool {
        let mut categories = self.categories.write();
        let state = &mut categories[category.index()];
        if state.sinks.iter().any(|s| same_sink(s, sink)) {
            return false;
        }
        Arc::make_mut(&mut state.sinks).push(sink.clone());
        true
    }

    /// Removes `sink` from `category`. Returns `false` if it was not subscribed.
    pub fn unsubscribe(&self, category: LogCategory, sink: &SharedSink) -> bool {
        let mut categories = self.categories.write();
        let state = &mut categories[category.index()];
        if !state.sinks.iter().any(|s| same_sink(s, sink)) {
            return false;
        }
        Arc::make_mut(&mut state.sinks).retain(|s| !same_sink(s, sink));
        true
    }

    /// Removes `sink` from every category.
    pub fn unsubscribe_all(&self, sink: &SharedSink) {
        for category in LogCategory::all() {
            self.unsubscribe(category, sink);
        }
    }

    pub fn is_subscribed(&self, category: LogCategory, sink: &SharedSink) -> bool {
        self.categories.read()[category.index()]
            .sinks
            .iter()
            .any(|s| same_sink(s, sink))
    }

    pub fn subscriber_count(&self, category: LogCategory) -> usize {
        self.categories.read()[category.index()].sinks.len()
    }

    /// Whether a message would reach at least one sink.
    ///
    /// Lets callers skip formatting work for filtered messages.
    pub fn is_active(&self, category: LogCategory, severity: Severity) -> bool {
        let categories = self.categories.read();
        let state = &categories[category.index()];
        state.enabled && severity.is_at_least(state.level) && !state.sinks.is_empty()
    }

    /// Delivers a message to every sink subscribed to `category`, provided the
    /// category is enabled and `severity` meets its threshold.
    ///
    /// Sinks are called after the subscription lock is released. A failing
    /// sink is counted and skipped; the others still receive the message.
    /// Returns the number of successful deliveries.
    pub fn publish(&self, category: LogCategory, severity: Severity, text: &str) -> usize {
        let sinks = {
            let categories = self.categories.read();
            let state = &categories[category.index()];
            if !state.enabled || !severity.is_at_least(state.level) {
                return 0;
            }
            state.sinks.clone()
        };

        self.deliver(&sinks, category, severity, text)
    }

    /// Delivers to the sinks subscribed to `category` regardless of the enable
    /// flag and threshold. Used for replies to the user's own commands, which
    /// must show up whatever the verbosity is.
    pub fn publish_unfiltered(
        &self,
        category: LogCategory,
        severity: Severity,
        text: &str,
    ) -> usize {
        let sinks = self.categories.read()[category.index()].sinks.clone();
        self.deliver(&sinks, category, severity, text)
    }

    fn deliver(
        &self,
        sinks: &[SharedSink],
        category: LogCategory,
        severity: Severity,
        text: &str,
    ) -> usize {
        let mut delivered = 0;
        for sink in sinks {
            match sink.receive(category, severity, text) {
                Ok(()) => delivered += 1,
                Err(e) => {
                    self.failures.fetch_add(1, Ordering::Relaxed);
                    let report = format!("{}: {}", sink.name(), e);
                    warn!(target: INTERNAL_TARGET, "log delivery failed: {}", report);
                    *self.last_failure.write() = Some(report);
                }
            }
        }
        delivered
    }

    /// Total number of failed deliveries since creation.
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }

    pub fn last_failure(&self) -> Option<String> {
        self.last_failure.read().clone()
    }
}

impl Default for LogRouter {
    fn default() -> Self {
        Self::new()
    }
}

/// Publishes a formatted message, skipping the formatting when nothing would
/// receive it.
///
/// ```ignore
/// emu_log!(router, Notice, Netplay, "connected to {}", peer);
/// ```
#[macro_export]
macro_rules! emu_log {
    ($router:expr, $severity:ident, $category:ident, $($arg:tt)+) => {{
        let router: &$crate::logging::LogRouter = &$router;
        let category = $crate::logging::LogCategory::$category;
        let severity = $crate::logging::Severity::$severity;
        if router.is_active(category, severity) {
            router.publish(category, severity, &format!($($arg)+));
        }
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::sink::testing::RecordingSink;

    fn shared(sink: &Arc<RecordingSink>) -> SharedSink {
        sink.clone()
    }

    #[test]
    fn test_subscribe_is_idempotent() {
        let router = LogRouter::new();
        let recorder = RecordingSink::new("rec");
        let sink = shared(&recorder);

        assert!(router.subscribe(LogCategory::Netplay, &sink));
        assert!(!router.subscribe(LogCategory::Netplay, &sink));
        assert_eq!(router.subscriber_count(LogCategory::Netplay), 1);

        router.publish(LogCategory::Netplay, Severity::Error, "once");
        assert_eq!(recorder.count(), 1);
    }

    #[test]
    fn test_unsubscribe_absent_sink_is_noop() {
        let router = LogRouter::new();
        let present = RecordingSink::new("present");
        let absent = RecordingSink::new("absent");
        router.subscribe(LogCategory::Console, &shared(&present));

        assert!(!router.unsubscribe(LogCategory::Console, &shared(&absent)));
        assert_eq!(
            router.publish(LogCategory::Console, Severity::Notice, "still here"),
            1
        );
        assert_eq!(present.count(), 1);
        assert_eq!(absent.count(), 0);
    }

    #[test]
    fn test_threshold_filters_per_category() {
        let router = LogRouter::new();
        let a = RecordingSink::new("a");
        let b = RecordingSink::new("b");
        router.subscribe(LogCategory::Netplay, &shared(&a));
        router.subscribe(LogCategory::Netplay, &shared(&b));
        router.set_level(LogCategory::Netplay, Severity::Warning);

        router.publish(LogCategory::Netplay, Severity::Info, "too quiet");
        assert_eq!(a.count(), 0);
        assert_eq!(b.count(), 0);

        router.publish(LogCategory::Netplay, Severity::Error, "loud");
        assert_eq!(a.count(), 1);
        assert_eq!(b.count(), 1);
    }

    #[test]
    fn test_delivery_requires_subscription_to_that_category() {
        let router = LogRouter::with_level(Severity::Debug);
        let sink = RecordingSink::new("rec");
        router.subscribe(LogCategory::Video, &shared(&sink));

        router.publish(LogCategory::Audio, Severity::Error, "other category");
        assert_eq!(sink.count(), 0);

        router.publish(LogCategory::Video, Severity::Debug, "mine");
        let received = sink.received.lock();
        assert_eq!(
            received.as_slice(),
            &[(LogCategory::Video, Severity::Debug, "mine".to_string())]
        );
    }

    #[test]
    fn test_disabled_category_delivers_nothing() {
        let router = LogRouter::new();
        let sink = RecordingSink::new("rec");
        router.subscribe(LogCategory::Pad, &shared(&sink));
        router.set_enable(LogCategory::Pad, false);

        assert!(!router.is_active(LogCategory::Pad, Severity::Error));
        assert_eq!(router.publish(LogCategory::Pad, Severity::Error, "x"), 0);
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_failing_sink_does_not_block_others() {
        let router = LogRouter::new();
        let broken = RecordingSink::failing("broken");
        let healthy = RecordingSink::new("healthy");
        router.subscribe(LogCategory::Boot, &shared(&broken));
        router.subscribe(LogCategory::Boot, &shared(&healthy));

        let delivered = router.publish(LogCategory::Boot, Severity::Error, "boot failed");
        assert_eq!(delivered, 1);
        assert_eq!(healthy.count(), 1);
        assert_eq!(router.failure_count(), 1);
        assert!(router.last_failure().unwrap().starts_with("broken"));
    }

    #[test]
    fn test_unsubscribe_all_removes_every_category() {
        let router = LogRouter::new();
        let sink = RecordingSink::new("rec");
        let sink = shared(&sink);
        for category in LogCategory::all() {
            router.subscribe(category, &sink);
        }
        router.unsubscribe_all(&sink);
        assert!(LogCategory::all().all(|c| !router.is_subscribed(c, &sink)));
    }

    #[test]
    fn test_concurrent_publish_and_subscribe() {
        let router = Arc::new(LogRouter::with_level(Severity::Debug));
        let sink = RecordingSink::new("rec");
        router.subscribe(LogCategory::Netplay, &shared(&sink));

        let producers: Vec<_> = (0..4)
            .map(|_| {
                let router = router.clone();
                std::thread::spawn(move || {
                    for i in 0..250 {
                        router.publish(LogCategory::Netplay, Severity::Info, &i.to_string());
                    }
                })
            })
            .collect();

        let extra = RecordingSink::new("extra");
        let extra_shared = shared(&extra);
        for _ in 0..100 {
            router.subscribe(LogCategory::Audio, &extra_shared);
            router.unsubscribe(LogCategory::Audio, &extra_shared);
        }

        for producer in producers {
            producer.join().unwrap();
        }
        assert_eq!(sink.count(), 1000);
    }

    #[test]
    fn test_emu_log_macro_skips_inactive() {
        let router = LogRouter::new();
        let sink = RecordingSink::new("rec");
        router.subscribe(LogCategory::Console, &shared(&sink));

        crate::emu_log!(router, Debug, Console, "hidden {}", 1);
        crate::emu_log!(router, Notice, Console, "shown {}", 2);

        let received = sink.received.lock();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].2, "shown 2");
    }

    #[test]
    fn test_publish_unfiltered_ignores_threshold_and_enable_flag() {
        let router = LogRouter::with_level(Severity::Error);
        let sink = RecordingSink::new("rec");
        router.subscribe(LogCategory::Console, &shared(&sink));
        router.set_enable(LogCategory::Console, false);

        assert_eq!(router.publish(LogCategory::Console, Severity::Notice, "dropped"), 0);
        assert_eq!(
            router.publish_unfiltered(LogCategory::Console, Severity::Notice, "reply"),
            1
        );
        assert_eq!(
            router.publish_unfiltered(LogCategory::Audio, Severity::Notice, "nobody"),
            0
        );

        let received = sink.received.lock();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].2, "reply");
    }
}
