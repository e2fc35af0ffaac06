//! Message severity levels.
//!
//! Severities are ordered from most to least severe, so `Error < Debug`.
//! A message passes a threshold when its severity is less than or equal to
//! the threshold.
use crossterm::style::Color;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The urgency ranking of a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u8)]
pub enum Severity {
    Error = 0,
    Warning = 1,
    Notice = 2,
    Info = 3,
    Debug = 4,
}

/// Returned when a severity name or index cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown severity '{0}' (use 0-4 or error/warning/notice/info/debug)")]
pub struct ParseSeverityError(pub String);

impl Severity {
    /// All severities, most severe first.
    pub const ALL: [Severity; 5] = [
        Severity::Error,
        Severity::Warning,
        Severity::Notice,
        Severity::Info,
        Severity::Debug,
    ];

    /// The level used when no configuration is available.
    pub const DEFAULT: Severity = Severity::Notice;

    /// Returns the numeric index of this severity (0 = error).
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Looks up a severity by numeric index.
    pub fn from_index(index: i64) -> Option<Self> {
        usize::try_from(index)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
    }

    /// Like [`Severity::from_index`], but clamps out-of-range values to the
    /// nearest valid level.
    pub fn clamp_index(index: i64) -> Self {
        let last = Self::ALL.len() as i64 - 1;
        Self::ALL[index.clamp(0, last) as usize]
    }

    /// Whether a message of this severity satisfies `threshold`.
    pub fn is_at_least(self, threshold: Severity) -> bool {
        self <= threshold
    }

    /// One-letter code used in formatted log lines.
    pub fn code(self) -> char {
        match self {
            Severity::Error => 'E',
            Severity::Warning => 'W',
            Severity::Notice => 'N',
            Severity::Info => 'I',
            Severity::Debug => 'D',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
            Severity::Info => "info",
            Severity::Debug => "debug",
        }
    }

    /// Display colour in the log viewer.
    pub fn color(self) -> Color {
        match self {
            Severity::Error => Color::Rgb { r: 255, g: 0, b: 0 },
            Severity::Warning => Color::Rgb { r: 255, g: 255, b: 0 },
            Severity::Notice => Color::Rgb { r: 0, g: 255, b: 0 },
            Severity::Info => Color::Rgb { r: 0, g: 255, b: 255 },
            Severity::Debug => Color::Rgb { r: 211, g: 211, b: 211 },
        }
    }
}

/// Colour for a viewer line; lines that carry no severity are white.
pub fn color_for(severity: Option<Severity>) -> Color {
    severity.map_or(
        Color::Rgb {
            r: 255,
            g: 255,
            b: 255,
        },
        Severity::color,
    )
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(index) = trimmed.parse::<i64>() {
            return Self::from_index(index).ok_or_else(|| ParseSeverityError(s.to_string()));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "error" | "e" => Ok(Severity::Error),
            "warning" | "warn" | "w" => Ok(Severity::Warning),
            "notice" | "n" => Ok(Severity::Notice),
            "info" | "i" => Ok(Severity::Info),
            "debug" | "d" => Ok(Severity::Debug),
            _ => Err(ParseSeverityError(s.to_string())),
        }
    }
}

impl From<tracing::Level> for Severity {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::ERROR => Severity::Error,
            tracing::Level::WARN => Severity::Warning,
            tracing::Level::INFO => Severity::Info,
            tracing::Level::DEBUG | tracing::Level::TRACE => Severity::Debug,
        }
    }
}
