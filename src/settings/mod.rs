//! Settings persistence and the typed views over it.
pub mod log_window;
pub mod netplay;
pub mod store;

pub use log_window::{Geometry, LogWindowSettings};
pub use netplay::{NetplaySettings, PlaybackSettings};
pub use store::SettingsStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("unknown setting '{0}'")]
    UnknownKey(String),
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: String, reason: String },
}

impl SettingsError {
    pub(crate) fn invalid(key: &str, reason: impl Into<String>) -> Self {
        SettingsError::InvalidValue {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}
