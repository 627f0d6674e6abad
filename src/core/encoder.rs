//! Record encoders
//!
//! - Json: one JSON object per record, keys named by [`FieldKeys`]
//! - Console: tab-separated human-readable line, fields as trailing JSON

use super::field::Field;
use super::log_level::LogLevel;
use super::options::FieldKeys;
use super::timestamp::TimestampFormat;
use chrono::{DateTime, Utc};
use std::panic::Location;

/// Encoding selected for a backend
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Encoding {
    /// Human-readable text, used in development
    Console,
    /// Machine-readable JSON lines
    #[default]
    Json,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::Console => "console",
            Encoding::Json => "json",
        }
    }
}

/// Everything one record carries into the encoder
#[derive(Debug)]
pub struct Record<'a> {
    pub time: DateTime<Utc>,
    pub level: LogLevel,
    pub logger: Option<&'a str>,
    /// Shortened `dir/file.rs:line` of the call site
    pub caller: Option<String>,
    pub message: &'a str,
    pub fields: &'a [Field],
    pub stacktrace: Option<String>,
}

/// Stateless encoder bound to one backend configuration
#[derive(Debug, Clone)]
pub struct RecordEncoder {
    pub encoding: Encoding,
    pub keys: FieldKeys,
    pub time_format: TimestampFormat,
    pub line_ending: String,
    pub colored_levels: bool,
}

impl RecordEncoder {
    pub fn encode(&self, record: &Record<'_>) -> String {
        let mut out = match self.encoding {
            Encoding::Json => self.encode_json(record),
            Encoding::Console => self.encode_console(record),
        };
        out.push_str(&self.line_ending);
        out
    }

    fn encode_json(&self, record: &Record<'_>) -> String {
        use serde_json::Value;

        let mut obj = serde_json::Map::new();
        obj.insert(
            self.keys.time.clone(),
            self.time_format.to_json_value(&record.time),
        );
        obj.insert(
            self.keys.level.clone(),
            Value::String(record.level.to_str().to_string()),
        );
        if let Some(logger) = record.logger {
            obj.insert(self.keys.logger.clone(), Value::String(logger.to_string()));
        }
        if let Some(ref caller) = record.caller {
            obj.insert(self.keys.caller.clone(), Value::String(caller.clone()));
        }
        obj.insert(
            self.keys.message.clone(),
            Value::String(record.message.to_string()),
        );
        for field in record.fields {
            obj.insert(
                self.field_key(field.key()),
                field.to_sink_value(&self.time_format),
            );
        }
        if let Some(ref stack) = record.stacktrace {
            obj.insert(self.keys.stacktrace.clone(), Value::String(stack.clone()));
        }

        serde_json::to_string(&Value::Object(obj)).unwrap_or_default()
    }

    /// Fields named like a fixed record key move under `fields.`
    fn field_key(&self, key: &str) -> String {
        if self.keys.contains(key) {
            format!("fields.{}", key)
        } else {
            key.to_string()
        }
    }

    fn encode_console(&self, record: &Record<'_>) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(6);
        parts.push(self.time_format.format(&record.time));
        parts.push(self.level_text(record.level));
        if let Some(logger) = record.logger {
            parts.push(logger.to_string());
        }
        if let Some(ref caller) = record.caller {
            parts.push(caller.clone());
        }
        parts.push(sanitize_message(record.message));

        if !record.fields.is_empty() {
            let fields: serde_json::Map<String, serde_json::Value> = record
                .fields
                .iter()
                .map(|f| (f.key().to_string(), f.to_sink_value(&self.time_format)))
                .collect();
            parts.push(serde_json::Value::Object(fields).to_string());
        }

        let mut line = parts.join("\t");
        if let Some(ref stack) = record.stacktrace {
            line.push('\n');
            line.push_str(stack);
        }
        line
    }

    #[cfg(feature = "console")]
    fn level_text(&self, level: LogLevel) -> String {
        use colored::Colorize;

        if self.colored_levels {
            level.to_str().color(level.color_code()).to_string()
        } else {
            level.to_str().to_string()
        }
    }

    #[cfg(not(feature = "console"))]
    fn level_text(&self, level: LogLevel) -> String {
        level.to_str().to_string()
    }
}

/// `dir/file.rs:line` of a tracked call site
pub fn short_caller(location: &Location<'_>) -> String {
    short_path(location.file(), location.line())
}

/// `dir/file.rs:line`, the last path component plus its parent
pub fn short_path(file: &str, line: u32) -> String {
    let mut cut = file.rsplitn(3, &['/', '\\'][..]);
    let base = cut.next().unwrap_or(file);
    match cut.next() {
        Some(dir) => format!("{}/{}:{}", dir, base, line),
        None => format!("{}:{}", base, line),
    }
}

/// Keep a console record on one line: control characters become escapes
fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}
