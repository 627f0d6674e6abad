//! Record sink backing one logger name
//!
//! A [`Backend`] is built from a [`BackendConfig`], which captures everything
//! the factory's options decide for one logger name. Once built, a backend
//! is immutable apart from its output streams and is shared by every handle
//! with that name until the next configuration switch.

use super::appender::Appender;
use super::encoder::{short_caller, short_path, Encoding, Record, RecordEncoder};
use super::error::Result;
use super::field::Field;
use super::log_level::LogLevel;
use super::options::{FieldKeys, Options};
use super::sampling::{Sampler, SamplingConfig};
use super::stack::{caller_at, capture_stack};
use super::timestamp::TimestampFormat;
use crate::appenders::open_output;
use parking_lot::Mutex;
use std::panic::Location;

/// Baseline caller skip: the handle method the user called.
///
/// Adjustments beyond it move the reported caller and the start of error
/// stack traces that many frames further up the user's own call chain.
pub const BASE_CALLER_SKIP: i32 = 1;

/// Construction parameters for one backend
#[derive(Debug, Clone, PartialEq)]
pub struct BackendConfig {
    pub encoding: Encoding,
    pub field_keys: FieldKeys,
    pub line_ending: String,
    pub time_layout: String,
    /// Colored capital levels in console mode, plain capitals otherwise
    pub colored_levels: bool,
    /// Filtering happens in the factory, so this stays at `Debug`
    pub min_level: LogLevel,
    pub sampling: SamplingConfig,
    pub output_paths: Vec<String>,
    pub error_output_paths: Vec<String>,
    pub development: bool,
    pub disable_caller: bool,
    pub disable_stacktrace: bool,
    /// Records at or above this level carry a stack trace
    pub stacktrace_level: LogLevel,
    /// `BASE_CALLER_SKIP` plus the global and per-name adjustments
    pub caller_skip: i32,
    /// Trimmed logger name; `None` when disabled or empty
    pub name: Option<String>,
}

impl BackendConfig {
    /// Derive the backend parameters for `name` under `options`
    pub fn from_options(options: &Options, name: &str) -> Self {
        let encoding = if options.development {
            Encoding::Console
        } else {
            Encoding::Json
        };

        let trimmed = name.trim();
        let name = if options.disable_logger || trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };

        Self {
            encoding,
            field_keys: options.field_keys.clone(),
            line_ending: "\n".to_string(),
            time_layout: options.time_layout.clone(),
            colored_levels: options.development,
            min_level: LogLevel::Debug,
            sampling: SamplingConfig::default(),
            output_paths: options.output_paths.clone(),
            error_output_paths: options.error_output_paths.clone(),
            development: options.development,
            disable_caller: options.disable_caller,
            disable_stacktrace: options.disable_stacktrace,
            stacktrace_level: LogLevel::Error,
            caller_skip: BASE_CALLER_SKIP
                + options.global_add_caller_skip_adjust
                + options.caller_skip_adjust(trimmed),
            name,
        }
    }
}

/// Call site reported for a record: the tracked location itself, or the
/// frame `extra_skip` levels above it when the adjustments ask for one.
fn resolve_caller(location: &'static Location<'static>, extra_skip: usize) -> String {
    if extra_skip == 0 {
        return short_caller(location);
    }
    match caller_at(extra_skip) {
        Some((file, line)) => short_path(&file, line),
        None => short_caller(location),
    }
}

/// A constructed, configuration-bound record sink
pub struct Backend {
    config: BackendConfig,
    encoder: RecordEncoder,
    sampler: Sampler,
    outputs: Mutex<Vec<Box<dyn Appender>>>,
    error_outputs: Mutex<Vec<Box<dyn Appender>>>,
}

impl std::fmt::Debug for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backend")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Backend {
    /// Open every output target and assemble the encoder.
    ///
    /// Fails on the first target that cannot be opened or on a time layout
    /// chrono cannot render.
    pub fn build(config: BackendConfig) -> Result<Self> {
        let time_format = TimestampFormat::from_layout(&config.time_layout);
        time_format.validate()?;

        let outputs = config
            .output_paths
            .iter()
            .map(|target| open_output(target))
            .collect::<Result<Vec<_>>>()?;
        let error_outputs = config
            .error_output_paths
            .iter()
            .map(|target| open_output(target))
            .collect::<Result<Vec<_>>>()?;

        let encoder = RecordEncoder {
            encoding: config.encoding,
            keys: config.field_keys.clone(),
            time_format,
            line_ending: config.line_ending.clone(),
            colored_levels: config.colored_levels,
        };

        Ok(Self {
            sampler: Sampler::new(config.sampling),
            encoder,
            outputs: Mutex::new(outputs),
            error_outputs: Mutex::new(error_outputs),
            config,
        })
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Logger name tagged on records, if any
    pub fn name(&self) -> Option<&str> {
        self.config.name.as_deref()
    }

    /// Records dropped by sampling
    pub fn sampled_out(&self) -> u64 {
        self.sampler.dropped_count()
    }

    /// Encode and write one record to every output.
    ///
    /// Returns `Ok(false)` when the record was filtered or sampled out.
    /// Output failures are reported to the error outputs; the first one is
    /// also returned.
    pub fn write(
        &self,
        level: LogLevel,
        caller: &'static Location<'static>,
        message: &str,
        fields: &[Field],
    ) -> Result<bool> {
        if !self.config.min_level.enabled(level) || !self.sampler.check(level, message) {
            return Ok(false);
        }

        let extra_skip = self.extra_caller_skip();
        let stacktrace = if !self.config.disable_stacktrace && level >= self.config.stacktrace_level
        {
            Some(capture_stack(extra_skip))
        } else {
            None
        };

        let record = Record {
            time: chrono::Utc::now(),
            level,
            logger: self.config.name.as_deref(),
            caller: if self.config.disable_caller {
                None
            } else {
                Some(resolve_caller(caller, extra_skip))
            },
            message,
            fields,
            stacktrace,
        };
        let line = self.encoder.encode(&record);

        let mut first_error = None;
        {
            let mut outputs = self.outputs.lock();
            for output in outputs.iter_mut() {
                if let Err(e) = output.append(&line) {
                    self.report_error(&format!("write to {} failed: {}", output.name(), e));
                    first_error.get_or_insert(e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(true),
        }
    }

    /// Flush every output
    pub fn sync(&self) -> Result<()> {
        let mut outputs = self.outputs.lock();
        for output in outputs.iter_mut() {
            output.flush()?;
        }
        Ok(())
    }

    /// Frames above the logging call named by the caller-skip adjustments
    fn extra_caller_skip(&self) -> usize {
        (self.config.caller_skip - BASE_CALLER_SKIP).max(0) as usize
    }

    fn report_error(&self, message: &str) {
        let line = format!(
            "{} [LOGGER ERROR] {}{}",
            chrono::Utc::now().to_rfc3339(),
            message,
            self.config.line_ending
        );
        let mut error_outputs = self.error_outputs.lock();
        for output in error_outputs.iter_mut() {
            // Nowhere left to report a failing error output
            let _ = output.append(&line);
        }
    }
}
