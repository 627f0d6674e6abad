//! Timestamp formatting utilities
//!
//! Turns the configured time layout into a formatter for record timestamps
//! and time-typed fields. A handful of well-known names select numeric or
//! ISO formats; anything else is treated as a strftime pattern.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Utc};
use std::fmt::Write;

/// Default time layout: `2025-01-08 10:30:45.123`
pub const DEFAULT_TIME_LAYOUT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Timestamp format selected by a time layout string
///
/// # Examples
///
/// ```
/// use rust_logger_factory::core::TimestampFormat;
///
/// assert_eq!(TimestampFormat::from_layout("unix_millis"), TimestampFormat::UnixMillis);
/// assert!(matches!(TimestampFormat::from_layout("%H:%M"), TimestampFormat::Custom(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    Iso8601,

    /// RFC 3339 format: `2025-01-08T10:30:45+00:00`
    Rfc3339,

    /// Unix timestamp in seconds: `1736332245`
    Unix,

    /// Unix timestamp in milliseconds: `1736332245123`
    UnixMillis,

    /// Unix timestamp in microseconds: `1736332245123456`
    UnixMicros,

    /// Custom strftime format
    Custom(String),
}

impl Default for TimestampFormat {
    fn default() -> Self {
        TimestampFormat::Custom(DEFAULT_TIME_LAYOUT.to_string())
    }
}

impl TimestampFormat {
    /// Select a format from a configured layout string
    pub fn from_layout(layout: &str) -> Self {
        match layout.trim() {
            "iso8601" => TimestampFormat::Iso8601,
            "rfc3339" => TimestampFormat::Rfc3339,
            "unix" => TimestampFormat::Unix,
            "unix_millis" => TimestampFormat::UnixMillis,
            "unix_micros" => TimestampFormat::UnixMicros,
            other => TimestampFormat::Custom(other.to_string()),
        }
    }

    /// Reject strftime patterns chrono cannot render
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(pattern) = self {
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(LoggerError::config(
                    "time_layout",
                    format!("invalid strftime pattern '{}'", pattern),
                ));
            }
        }
        Ok(())
    }

    /// Format a `DateTime<Utc>` according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Rfc3339 => datetime.to_rfc3339(),
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().to_string(),
            TimestampFormat::Custom(pattern) => {
                // chrono reports bad patterns through fmt::Error; never panic here
                let mut out = String::with_capacity(pattern.len() + 8);
                let _ = write!(out, "{}", datetime.format(pattern));
                out
            }
        }
    }

    /// Render as a JSON value: numeric formats stay numbers
    pub fn to_json_value(&self, datetime: &DateTime<Utc>) -> serde_json::Value {
        match self {
            TimestampFormat::Unix => datetime.timestamp().into(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().into(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().into(),
            _ => serde_json::Value::String(self.format(datetime)),
        }
    }

    /// Check if this is a Unix-based numeric format
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            TimestampFormat::Unix | TimestampFormat::UnixMillis | TimestampFormat::UnixMicros
        )
    }
}
