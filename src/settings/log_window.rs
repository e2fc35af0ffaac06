//! Persisted state of the log window: geometry, output options and the
//! per-category enable flags.
use super::SettingsStore;
use crate::logging::{LogCategory, Severity};
use serde::Serialize;

const WINDOW_SECTION: &str = "LogWindow";
const OPTIONS_SECTION: &str = "Options";
const LOGS_SECTION: &str = "Logs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Geometry {
    pub x: i64,
    pub y: i64,
    pub w: i64,
    pub h: i64,
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            x: 100,
            y: 700,
            w: 800,
            h: 270,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogWindowSettings {
    pub geometry: Geometry,
    pub verbosity: Severity,
    pub write_to_file: bool,
    pub write_to_console: bool,
    /// Indexed by [`LogCategory::index`].
    enabled: Vec<bool>,
}

impl Default for LogWindowSettings {
    fn default() -> Self {
        Self {
            geometry: Geometry::default(),
            verbosity: Severity::DEFAULT,
            write_to_file: true,
            write_to_console: true,
            enabled: vec![true; LogCategory::count()],
        }
    }
}

impl LogWindowSettings {
    pub fn load(store: &SettingsStore) -> Self {
        let defaults = Self::default();
        let g = defaults.geometry;
        Self {
            geometry: Geometry {
                x: store.get_int(WINDOW_SECTION, "x", g.x),
                y: store.get_int(WINDOW_SECTION, "y", g.y),
                w: store.get_int(WINDOW_SECTION, "w", g.w),
                h: store.get_int(WINDOW_SECTION, "h", g.h),
            },
            verbosity: Severity::clamp_index(store.get_int(
                OPTIONS_SECTION,
                "Verbosity",
                defaults.verbosity.index() as i64,
            )),
            write_to_file: store.get_bool(OPTIONS_SECTION, "WriteToFile", defaults.write_to_file),
            write_to_console: store.get_bool(
                OPTIONS_SECTION,
                "WriteToConsole",
                defaults.write_to_console,
            ),
            enabled: LogCategory::all()
                .map(|c| store.get_bool(LOGS_SECTION, c.short_name(), true))
                .collect(),
        }
    }

    pub fn save(&self, store: &mut SettingsStore) {
        store.set(WINDOW_SECTION, "x", self.geometry.x);
        store.set(WINDOW_SECTION, "y", self.geometry.y);
        store.set(WINDOW_SECTION, "w", self.geometry.w);
        store.set(WINDOW_SECTION, "h", self.geometry.h);
        store.set(OPTIONS_SECTION, "Verbosity", i64::from(self.verbosity.index()));
        store.set(OPTIONS_SECTION, "WriteToFile", self.write_to_file);
        store.set(OPTIONS_SECTION, "WriteToConsole", self.write_to_console);
        for category in LogCategory::all() {
            store.set(LOGS_SECTION, category.short_name(), self.is_enabled(category));
        }
    }

    pub fn is_enabled(&self, category: LogCategory) -> bool {
        self.enabled[category.index()]
    }

    pub fn set_enabled(&mut self, category: LogCategory, enabled: bool) {
        self.enabled[category.index()] = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_store_is_empty() {
        let settings = LogWindowSettings::load(&SettingsStore::in_memory());
        assert_eq!(settings, LogWindowSettings::default());
        assert_eq!(settings.verbosity, Severity::Notice);
        assert!(settings.write_to_file);
        assert!(settings.write_to_console);
        assert!(LogCategory::all().all(|c| settings.is_enabled(c)));
    }

    #[test]
    fn test_round_trip_through_store() {
        let mut settings = LogWindowSettings::default();
        settings.geometry.w = 1024;
        settings.verbosity = Severity::Debug;
        settings.write_to_console = false;
        settings.set_enabled(LogCategory::Video, false);

        let mut store = SettingsStore::in_memory();
        settings.save(&mut store);
        assert!(!store.get_bool("Logs", "VIDEO", true));

        assert_eq!(LogWindowSettings::load(&store), settings);
    }

    #[test]
    fn test_out_of_range_verbosity_is_clamped() {
        let mut store = SettingsStore::in_memory();
        store.set("Options", "Verbosity", 42);
        assert_eq!(
            LogWindowSettings::load(&store).verbosity,
            Severity::Debug
        );
    }
}
