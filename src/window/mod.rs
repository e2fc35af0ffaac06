//! The log window: owns the viewer's wiring into the router and keeps it in
//! step with the persisted options.
//!
//! Each category has one checkbox. A checked category has the viewer
//! subscribed, plus the file and console sinks when their options are on.
//! An unchecked category has none of the three.
use crate::cli::{self, Outcome};
use crate::logging::timer::TimerState;
use crate::logging::{
    BoundedLogQueue, ConsoleSink, DisplaySurface, DrainTimer, LogCategory, LogRouter, Severity,
    SharedSink, TimerError, ViewerSink,
};
use crate::settings::{
    Geometry, LogWindowSettings, NetplaySettings, PlaybackSettings, SettingsError, SettingsStore,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Queue capacity and drain period for a window.
#[derive(Debug, Clone, Copy)]
pub struct WindowOptions {
    pub capacity: usize,
    pub interval: Duration,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            capacity: crate::logging::queue::DEFAULT_CAPACITY,
            interval: crate::logging::timer::DEFAULT_INTERVAL,
        }
    }
}

/// The write-through outputs the window manages alongside its own viewer.
pub struct Outputs {
    pub file: SharedSink,
    pub console: Arc<ConsoleSink>,
}

/// One line of the category checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    pub category: LogCategory,
    pub checked: bool,
    pub level: Severity,
    pub viewer: bool,
    pub file: bool,
    pub console: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WindowStats {
    pub queued: usize,
    pub capacity: usize,
    pub dropped: u64,
    pub delivery_failures: u64,
    pub last_failure: Option<String>,
    pub refresh: Duration,
    pub timer: TimerState,
}

pub struct LogWindow<S: DisplaySurface> {
    router: Arc<LogRouter>,
    queue: Arc<BoundedLogQueue>,
    viewer: SharedSink,
    file: SharedSink,
    console: Arc<ConsoleSink>,
    console_shared: SharedSink,
    surface: Arc<Mutex<S>>,
    timer: DrainTimer<S>,
    store: SettingsStore,
    settings: LogWindowSettings,
    netplay: NetplaySettings,
    playback: PlaybackSettings,
    /// Value the next `toggle_all` applies to every category.
    toggle_next: bool,
    closed: bool,
}

impl<S: DisplaySurface> LogWindow<S> {
    /// Opens the window: subscribes the viewer everywhere, applies the stored
    /// settings and starts the drain timer.
    ///
    /// # Arguments
    ///
    /// * `router` - The router producers publish through.
    /// * `store` - Persisted settings, read now and written back on changes.
    /// * `surface` - Where the drain timer appends formatted lines.
    /// * `outputs` - The file and console sinks wired alongside the viewer.
    /// * `options` - Queue capacity and drain period.
    ///
    /// # Errors
    ///
    /// Returns an error if called outside a tokio runtime, since the drain
    /// timer cannot be started.
    pub fn open(
        router: Arc<LogRouter>,
        store: SettingsStore,
        surface: Arc<Mutex<S>>,
        outputs: Outputs,
        options: WindowOptions,
    ) -> Result<Self, TimerError> {
        let queue = Arc::new(BoundedLogQueue::new(options.capacity));
        let viewer: SharedSink = Arc::new(ViewerSink::new(queue.clone()));
        let timer = DrainTimer::new(queue.clone(), surface.clone(), options.interval);
        let console_shared: SharedSink = outputs.console.clone();

        for category in LogCategory::all() {
            router.subscribe(category, &viewer);
        }

        let settings = LogWindowSettings::load(&store);
        let netplay = NetplaySettings::load(&store);
        let playback = PlaybackSettings::load(&store);

        let mut window = Self {
            router,
            queue,
            viewer,
            file: outputs.file,
            console: outputs.console,
            console_shared,
            surface,
            timer,
            store,
            settings,
            netplay,
            playback,
            toggle_next: false,
            closed: false,
        };
        window.apply_settings();
        window.timer.start()?;

        info!(
            "Log window opened ({} categories, verbosity {})",
            LogCategory::count(),
            window.settings.verbosity
        );
        Ok(window)
    }

    /// Pushes the in-memory settings onto the router.
    pub fn apply_settings(&mut self) {
        self.router.set_level_all(self.settings.verbosity);
        for category in LogCategory::all() {
            let enabled = self.settings.is_enabled(category);
            self.router.set_enable(category, enabled);
            self.wire(category, enabled);
        }
    }

    fn wire(&self, category: LogCategory, enabled: bool) {
        wire_sink(&self.router, category, &self.viewer, enabled);
        wire_sink(
            &self.router,
            category,
            &self.file,
            enabled && self.settings.write_to_file,
        );
        wire_sink(
            &self.router,
            category,
            &self.console_shared,
            enabled && self.settings.write_to_console,
        );
    }

    /// Checks or unchecks a single category.
    pub fn set_category_enabled(&mut self, category: LogCategory, enabled: bool) {
        self.settings.set_enabled(category, enabled);
        self.router.set_enable(category, enabled);
        self.wire(category, enabled);
        debug!(
            "{} {}",
            category.short_name(),
            if enabled { "enabled" } else { "disabled" }
        );
        self.persist_or_warn();
    }

    /// Checks or unchecks every category, alternating on each call. The first
    /// call unchecks everything. Returns the state that was applied.
    pub fn toggle_all(&mut self) -> bool {
        let enabled = self.toggle_next;
        for category in LogCategory::all() {
            self.settings.set_enabled(category, enabled);
            self.router.set_enable(category, enabled);
            self.wire(category, enabled);
        }
        self.toggle_next = !enabled;
        self.persist_or_warn();
        enabled
    }

    pub fn set_verbosity(&mut self, level: Severity) {
        self.settings.verbosity = level;
        self.router.set_level_all(level);
        self.persist_or_warn();
    }

    pub fn set_write_to_file(&mut self, enabled: bool) {
        self.settings.write_to_file = enabled;
        for category in LogCategory::all().filter(|c| self.settings.is_enabled(*c)) {
            wire_sink(&self.router, category, &self.file, enabled);
        }
        self.persist_or_warn();
    }

    pub fn set_write_to_console(&mut self, enabled: bool) {
        self.settings.write_to_console = enabled;
        for category in LogCategory::all().filter(|c| self.settings.is_enabled(*c)) {
            wire_sink(&self.router, category, &self.console_shared, enabled);
        }
        self.persist_or_warn();
    }

    /// Empties the queue, the scrollback and the console screen, then says so.
    pub fn clear(&mut self) {
        self.queue.clear();
        self.surface.lock().clear();
        if let Err(e) = self.console.clear_screen() {
            warn!("Failed to clear console: {}", e);
        }
        self.reply(Severity::Notice, "Console cleared");
        self.flush();
    }

    /// Publishes a line on CONSOLE in answer to the user. Bypasses the
    /// verbosity and the category checkbox, and reaches the viewer even when
    /// CONSOLE is unchecked.
    pub fn reply(&self, severity: Severity, text: &str) {
        let viewer_subscribed = self.router.is_subscribed(LogCategory::Console, &self.viewer);
        self.router.publish_unfiltered(LogCategory::Console, severity, text);
        if !viewer_subscribed {
            if let Err(e) = self.viewer.receive(LogCategory::Console, severity, text) {
                warn!("Failed to show reply: {}", e);
            }
        }
    }

    /// Drains the queue now instead of waiting for the next tick.
    pub fn flush(&self) -> usize {
        self.timer.flush()
    }

    /// Runs a command line typed into the window.
    pub fn submit(&mut self, line: &str) -> Outcome {
        let outcome = cli::submit(self, line);
        self.flush();
        outcome
    }

    /// Records the window geometry; written out on the next save.
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.settings.geometry = geometry;
    }

    /// Stops the timer, detaches the viewer and saves settings. Runs once;
    /// later calls do nothing.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.timer.stop();

        for category in LogCategory::all() {
            let checked = self.router.is_subscribed(category, &self.viewer);
            self.settings.set_enabled(category, checked);
        }
        self.router.unsubscribe_all(&self.viewer);

        self.persist_or_warn();
        info!("Log window closed");
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Writes every settings view back to the store and saves it.
    pub fn persist(&mut self) -> Result<(), SettingsError> {
        self.settings.save(&mut self.store);
        self.netplay.save(&mut self.store);
        self.playback.save(&mut self.store);
        self.store.save()
    }

    fn persist_or_warn(&mut self) {
        if let Err(e) = self.persist() {
            warn!("Failed to save settings: {}", e);
        }
    }

    pub fn router(&self) -> &Arc<LogRouter> {
        &self.router
    }

    pub fn queue(&self) -> &Arc<BoundedLogQueue> {
        &self.queue
    }

    pub fn surface(&self) -> &Arc<Mutex<S>> {
        &self.surface
    }

    pub fn settings(&self) -> &LogWindowSettings {
        &self.settings
    }

    pub fn netplay(&self) -> &NetplaySettings {
        &self.netplay
    }

    pub fn netplay_mut(&mut self) -> &mut NetplaySettings {
        &mut self.netplay
    }

    pub fn playback(&self) -> &PlaybackSettings {
        &self.playback
    }

    pub fn playback_mut(&mut self) -> &mut PlaybackSettings {
        &mut self.playback
    }

    pub fn category_rows(&self) -> Vec<CategoryRow> {
        LogCategory::all()
            .map(|category| CategoryRow {
                category,
                checked: self.settings.is_enabled(category),
                level: self.router.level(category),
                viewer: self.router.is_subscribed(category, &self.viewer),
                file: self.router.is_subscribed(category, &self.file),
                console: self.router.is_subscribed(category, &self.console_shared),
            })
            .collect()
    }

    pub fn stats(&self) -> WindowStats {
        WindowStats {
            queued: self.queue.len(),
            capacity: self.queue.capacity(),
            dropped: self.queue.dropped(),
            delivery_failures: self.router.failure_count(),
            last_failure: self.router.last_failure(),
            refresh: self.timer.period(),
            timer: self.timer.state(),
        }
    }
}

impl<S: DisplaySurface> Drop for LogWindow<S> {
    fn drop(&mut self) {
        self.close();
    }
}

fn wire_sink(router: &LogRouter, category: LogCategory, sink: &SharedSink, subscribed: bool) {
    if subscribed {
        router.subscribe(category, sink);
    } else {
        router.unsubscribe(category, sink);
    }
}
