//! Named logger handles

use super::factory::LoggerFactory;
use super::field::Field;
use super::log_level::LogLevel;
use std::fmt::{self, Display, Write as _};
use std::panic::Location;

/// Immutable handle for one logger name
///
/// Every call consults the factory's current options, so a handle created
/// before [`LoggerFactory::switch_options`] follows the new configuration.
/// Handles are cheap to clone; [`Logger::with_field`] returns a new handle
/// and leaves the original untouched.
#[derive(Debug, Clone)]
pub struct Logger {
    factory: LoggerFactory,
    name: String,
    fields: Vec<Field>,
}

macro_rules! level_methods {
    ($level:expr, $plain:ident, $ln:ident, $f:ident, $w:ident) => {
        #[doc = concat!("Log the concatenated arguments at ", stringify!($level))]
        #[track_caller]
        pub fn $plain(&self, args: &[&dyn Display]) {
            self.log($level, args)
        }

        #[doc = concat!("Log the space-separated arguments at ", stringify!($level))]
        #[track_caller]
        pub fn $ln(&self, args: &[&dyn Display]) {
            self.logln($level, args)
        }

        #[doc = concat!("Log a `format_args!` message at ", stringify!($level))]
        #[track_caller]
        pub fn $f(&self, args: fmt::Arguments<'_>) {
            self.logf($level, args)
        }

        #[doc = concat!("Log a message with structured fields at ", stringify!($level))]
        #[track_caller]
        pub fn $w(&self, message: &str, fields: &[Field]) {
            self.logw($level, message, fields)
        }
    };
}

impl Logger {
    pub(crate) fn new(factory: LoggerFactory, name: String, fields: Vec<Field>) -> Self {
        Self {
            factory,
            name,
            fields,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Fields attached to every record of this handle
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn factory(&self) -> &LoggerFactory {
        &self.factory
    }

    /// A new handle with `fields` appended after the current ones
    #[must_use]
    pub fn with_field(&self, fields: impl IntoIterator<Item = Field>) -> Logger {
        let mut combined = self.fields.clone();
        combined.extend(fields);
        Logger::new(self.factory.clone(), self.name.clone(), combined)
    }

    /// Whether a record at `level` would be written under the current options
    pub fn enabled(&self, level: LogLevel) -> bool {
        self.factory.level(&self.name).enabled(level)
    }

    level_methods!(LogLevel::Debug, debug, debugln, debugf, debugw);
    level_methods!(LogLevel::Info, info, infoln, infof, infow);
    level_methods!(LogLevel::Warn, warn, warnln, warnf, warnw);
    level_methods!(LogLevel::Error, error, errorln, errorf, errorw);

    /// Log the concatenated arguments
    #[track_caller]
    pub fn log(&self, level: LogLevel, args: &[&dyn Display]) {
        self.emit(level, &[], || {
            let mut message = String::new();
            for arg in args {
                let _ = write!(message, "{}", arg);
            }
            message
        })
    }

    /// Log the arguments separated by single spaces
    #[track_caller]
    pub fn logln(&self, level: LogLevel, args: &[&dyn Display]) {
        self.emit(level, &[], || {
            let mut message = String::new();
            for (i, arg) in args.iter().enumerate() {
                if i > 0 {
                    message.push(' ');
                }
                let _ = write!(message, "{}", arg);
            }
            message
        })
    }

    /// Log a lazily formatted message
    #[track_caller]
    pub fn logf(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.emit(level, &[], || fmt::format(args))
    }

    /// Log a message with structured fields
    #[track_caller]
    pub fn logw(&self, level: LogLevel, message: &str, fields: &[Field]) {
        self.emit(level, fields, || message.to_string())
    }

    #[track_caller]
    fn emit(&self, level: LogLevel, fields: &[Field], message: impl FnOnce() -> String) {
        let caller = Location::caller();
        let generation = self.factory.generation();
        if !generation.level(&self.name).enabled(level) {
            return;
        }

        let metrics = self.factory.metrics();
        let backend = match generation.backend(&self.name, metrics) {
            Ok(backend) => backend,
            Err(e) => {
                eprintln!(
                    "[LOGGER ERROR] Failed to build backend for logger '{}': {}",
                    self.name, e
                );
                return;
            }
        };

        let message = message();
        let combined;
        let fields = if fields.is_empty() {
            &self.fields[..]
        } else if self.fields.is_empty() {
            fields
        } else {
            combined = self
                .fields
                .iter()
                .chain(fields)
                .cloned()
                .collect::<Vec<_>>();
            &combined[..]
        };

        match backend.write(level, caller, &message, fields) {
            Ok(true) => {
                metrics.record_written();
            }
            Ok(false) => {}
            Err(e) => {
                metrics.record_write_failure();
                eprintln!(
                    "[LOGGER ERROR] Failed to write record for logger '{}': {}",
                    self.name, e
                );
            }
        }
    }
}
