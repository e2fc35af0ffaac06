//! Line formatting shared by the sinks.
use super::{LogCategory, Severity};
use chrono::{DateTime, Local};

/// Wall-clock stamp in `MM:SS:mmm` form.
pub fn timestamp(at: &DateTime<Local>) -> String {
    at.format("%M:%S:%3f").to_string()
}

/// Formats a message as `MM:SS:mmm L[CAT]: text`, without a trailing newline.
pub fn format_line(
    category: LogCategory,
    severity: Severity,
    text: &str,
    at: &DateTime<Local>,
) -> String {
    format!(
        "{} {}[{}]: {}",
        timestamp(at),
        severity.code(),
        category.short_name(),
        text.trim_end_matches(&['\r', '\n'][..])
    )
}
