//! Section/key/value settings persisted as a TOML document.
//!
//! Each top-level table is a section. Lookups take a default, so a missing
//! file, a missing key or a value of the wrong type all fall back to it.
use super::SettingsError;
use std::fs;
use std::path::{Path, PathBuf};
use toml::{Table, Value};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    table: Table,
}

impl SettingsStore {
    /// A store that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads `path`, falling back to an empty store if it is missing or invalid.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        match Self::try_load(&path) {
            Ok(store) => store,
            Err(e) => {
                warn!("Failed to load settings from {}: {}", path.display(), e);
                info!("Using default settings");
                Self {
                    path: Some(path),
                    table: Table::new(),
                }
            }
        }
    }

    pub fn try_load(path: &Path) -> Result<Self, SettingsError> {
        let table = if path.exists() {
            let contents = fs::read_to_string(path)?;
            let table: Table = toml::from_str(&contents)?;
            info!("Loaded settings from: {}", path.display());
            table
        } else {
            debug!("No settings file at {}", path.display());
            Table::new()
        };
        Ok(Self {
            path: Some(path.to_path_buf()),
            table,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Writes the store back to its file. In-memory stores are left alone.
    pub fn save(&self) -> Result<(), SettingsError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let contents = toml::to_string_pretty(&self.table)?;
        fs::write(path, contents)?;
        debug!("Saved settings to: {}", path.display());
        Ok(())
    }

    fn value(&self, section: &str, key: &str) -> Option<&Value> {
        self.table
            .get(section)
            .and_then(Value::as_table)
            .and_then(|s| s.get(key))
    }

    pub fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        match self.value(section, key) {
            Some(Value::Boolean(b)) => *b,
            Some(Value::Integer(i)) => *i != 0,
            Some(other) => {
                debug!("{}.{} is not a boolean: {}", section, key, other);
                default
            }
            None => default,
        }
    }

    pub fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        match self.value(section, key) {
            Some(Value::Integer(i)) => *i,
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            Some(other) => {
                debug!("{}.{} is not an integer: {}", section, key, other);
                default
            }
            None => default,
        }
    }

    pub fn get_str(&self, section: &str, key: &str, default: &str) -> String {
        match self.value(section, key) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Integer(i)) => i.to_string(),
            Some(Value::Boolean(b)) => b.to_string(),
            _ => default.to_string(),
        }
    }

    /// Sets `section.key`, creating the section if needed.
    pub fn set(&mut self, section: &str, key: &str, value: impl Into<Value>) {
        let entry = self
            .table
            .entry(section.to_string())
            .or_insert_with(|| Value::Table(Table::new()));
        if !entry.is_table() {
            *entry = Value::Table(Table::new());
        }
        if let Value::Table(table) = entry {
            table.insert(key.to_string(), value.into());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_keys_return_defaults() {
        let store = SettingsStore::in_memory();
        assert!(store.get_bool("Options", "WriteToFile", true));
        assert_eq!(store.get_int("Options", "Verbosity", 2), 2);
        assert_eq!(store.get_str("Netplay", "LanIp", "0.0.0.0"), "0.0.0.0");
    }

    #[test]
    fn test_set_and_get() {
        let mut store = SettingsStore::in_memory();
        store.set("LogWindow", "x", 120);
        store.set("Options", "WriteToConsole", false);
        store.set("Netplay", "ReplayDir", "/tmp/replays");

        assert_eq!(store.get_int("LogWindow", "x", 0), 120);
        assert!(!store.get_bool("Options", "WriteToConsole", true));
        assert_eq!(store.get_str("Netplay", "ReplayDir", ""), "/tmp/replays");
    }

    #[test]
    fn test_type_mismatch_falls_back() {
        let mut store = SettingsStore::in_memory();
        store.set("Options", "Verbosity", "loud");
        store.set("Options", "WriteToFile", "yes");
        assert_eq!(store.get_int("Options", "Verbosity", 2), 2);
        assert!(store.get_bool("Options", "WriteToFile", true));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("logview.toml");

        let mut store = SettingsStore::load(&path);
        store.set("Logs", "NETPLAY", false);
        store.set("Options", "Verbosity", 4);
        store.save().unwrap();

        let reloaded = SettingsStore::try_load(&path).unwrap();
        assert!(!reloaded.get_bool("Logs", "NETPLAY", true));
        assert_eq!(reloaded.get_int("Options", "Verbosity", 2), 4);
    }

    #[test]
    fn test_corrupt_file_loads_as_empty() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("logview.toml");
        std::fs::write(&path, "this is [not valid toml").unwrap();

        assert!(SettingsStore::try_load(&path).is_err());
        let store = SettingsStore::load(&path);
        assert_eq!(store.get_int("Options", "Verbosity", 2), 2);
        assert_eq!(store.path(), Some(path.as_path()));
    }
}
