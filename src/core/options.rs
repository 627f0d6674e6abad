//! Factory configuration and its defaulting rules
//!
//! [`Options`] doubles as the partial configuration handed in by callers
//! (or deserialized by an external loader) and as the immutable snapshot a
//! factory publishes once [`Options::defaulted`] has filled every blank.

use super::field::Field;
use super::log_level::LogLevel;
use super::resolver::resolve_level;
use super::timestamp::DEFAULT_TIME_LAYOUT;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Names of the fixed record keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldKeys {
    /// Record time key, `"ts"` by default
    pub time: String,
    /// Level key, `"level"` by default
    pub level: String,
    /// Logger name key, `"logger"` by default
    pub logger: String,
    /// Call site key, `"caller"` by default
    pub caller: String,
    /// Message key, `"msg"` by default
    pub message: String,
    /// Stack trace key, `"stacktrace"` by default
    pub stacktrace: String,
}

impl FieldKeys {
    /// Return a copy with every blank key replaced by its default
    pub fn defaulted(&self) -> FieldKeys {
        FieldKeys {
            time: non_blank(&self.time, "ts"),
            level: non_blank(&self.level, "level"),
            logger: non_blank(&self.logger, "logger"),
            caller: non_blank(&self.caller, "caller"),
            message: non_blank(&self.message, "msg"),
            stacktrace: non_blank(&self.stacktrace, "stacktrace"),
        }
    }

    /// Whether `key` names one of the fixed record keys
    pub fn contains(&self, key: &str) -> bool {
        [
            &self.time,
            &self.level,
            &self.logger,
            &self.caller,
            &self.message,
            &self.stacktrace,
        ]
        .iter()
        .any(|fixed| fixed.as_str() == key)
    }
}

/// Logger factory options
///
/// All fields are optional on input; blank strings and empty lists count as
/// absent. Booleans and caller-skip adjustments are taken as given.
///
/// # Example
///
/// ```
/// use rust_logger_factory::prelude::*;
///
/// let options = Options::new()
///     .level("", LogLevel::Warn)
///     .level("db", LogLevel::Debug)
///     .development(true)
///     .message_field_key("message");
///
/// assert_eq!(options.resolve_level("db.pool"), LogLevel::Debug);
/// assert_eq!(options.resolve_level("http"), LogLevel::Warn);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Minimum enabled levels keyed by logger name
    pub levels: HashMap<String, LogLevel>,
    /// Extra frames to skip for specific logger names
    ///
    /// Lets logging wrappers report their own caller. Positive values move
    /// the caller annotation and the start of error stack traces up the
    /// call chain; values below zero count as zero.
    pub add_caller_skip_adjusts: HashMap<String, i32>,
    /// Extra frames to skip for every logger, added to the per-name value
    pub global_add_caller_skip_adjust: i32,
    pub field_keys: FieldKeys,
    /// strftime pattern or one of `iso8601`, `rfc3339`, `unix`,
    /// `unix_millis`, `unix_micros`
    pub time_layout: String,
    /// Record outputs: `stdout`, `stderr` or a file path
    pub output_paths: Vec<String>,
    /// Outputs for the sink's own write errors
    pub error_output_paths: Vec<String>,
    /// Console encoding with colored levels instead of JSON lines
    pub development: bool,
    pub disable_caller: bool,
    /// Drop the stack trace attached to error records
    pub disable_stacktrace: bool,
    /// Drop the logger name key from records
    pub disable_logger: bool,
    /// Fields preset on every logger created by the factory
    #[serde(skip)]
    pub global_fields: Vec<Field>,
}

impl Options {
    /// Fully defaulted options
    #[must_use]
    pub fn new() -> Self {
        Options::default().defaulted()
    }

    /// Return a copy with every blank item filled with its default
    #[must_use]
    pub fn defaulted(&self) -> Options {
        let mut levels = HashMap::with_capacity(self.levels.len() + 1);
        levels.insert(String::new(), LogLevel::Info);
        levels.extend(self.levels.iter().map(|(k, v)| (k.clone(), *v)));

        Options {
            levels,
            add_caller_skip_adjusts: self.add_caller_skip_adjusts.clone(),
            global_add_caller_skip_adjust: self.global_add_caller_skip_adjust,
            field_keys: self.field_keys.defaulted(),
            time_layout: non_blank(&self.time_layout, DEFAULT_TIME_LAYOUT),
            output_paths: non_blank_paths(&self.output_paths, "stdout"),
            error_output_paths: non_blank_paths(&self.error_output_paths, "stderr"),
            development: self.development,
            disable_caller: self.disable_caller,
            disable_stacktrace: self.disable_stacktrace,
            disable_logger: self.disable_logger,
            global_fields: self.global_fields.clone(),
        }
    }

    /// Effective minimum level for a logger name
    pub fn resolve_level(&self, name: &str) -> LogLevel {
        resolve_level(name, &self.levels)
    }

    /// Caller skip adjustment configured for a logger name
    pub fn caller_skip_adjust(&self, name: &str) -> i32 {
        self.add_caller_skip_adjusts.get(name).copied().unwrap_or(0)
    }

    /// Replace the whole level map
    #[must_use = "builder methods return a new value"]
    pub fn levels(mut self, levels: HashMap<String, LogLevel>) -> Self {
        self.levels = levels;
        self
    }

    /// Set the minimum level of one logger name
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, name: impl Into<String>, level: LogLevel) -> Self {
        self.levels.insert(name.into(), level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn development(mut self, development: bool) -> Self {
        self.development = development;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_layout(mut self, layout: impl Into<String>) -> Self {
        self.time_layout = layout.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_field_key(mut self, key: impl Into<String>) -> Self {
        self.field_keys.time = key.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level_field_key(mut self, key: impl Into<String>) -> Self {
        self.field_keys.level = key.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn logger_field_key(mut self, key: impl Into<String>) -> Self {
        self.field_keys.logger = key.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn caller_field_key(mut self, key: impl Into<String>) -> Self {
        self.field_keys.caller = key.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn message_field_key(mut self, key: impl Into<String>) -> Self {
        self.field_keys.message = key.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn stacktrace_field_key(mut self, key: impl Into<String>) -> Self {
        self.field_keys.stacktrace = key.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn disable_caller(mut self, disable: bool) -> Self {
        self.disable_caller = disable;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn disable_stacktrace(mut self, disable: bool) -> Self {
        self.disable_stacktrace = disable;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn disable_logger(mut self, disable: bool) -> Self {
        self.disable_logger = disable;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn output_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.output_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_output_paths<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.error_output_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn global_add_caller_skip_adjust(mut self, adjustment: i32) -> Self {
        self.global_add_caller_skip_adjust = adjustment;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn add_caller_skip_adjust(mut self, name: impl Into<String>, adjustment: i32) -> Self {
        self.add_caller_skip_adjusts.insert(name.into(), adjustment);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn global_fields(mut self, fields: Vec<Field>) -> Self {
        self.global_fields = fields;
        self
    }
}

fn non_blank(value: &str, default: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

fn non_blank_paths(paths: &[String], default: &str) -> Vec<String> {
    let kept: Vec<String> = paths
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();
    if kept.is_empty() {
        vec![default.to_string()]
    } else {
        kept
    }
}
