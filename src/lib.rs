//! # Rust Logger Factory
//!
//! Hierarchical named loggers whose configuration can be replaced at runtime.
//!
//! ## Features
//!
//! - **Hierarchical Levels**: `db.pool` inherits from `db`, then the root
//! - **Hot Swapping**: switch options without recreating logger handles
//! - **Structured Fields**: typed key/value pairs rendered as JSON
//! - **Lock-free Reads**: log calls never take the configuration lock
//!
//! ```no_run
//! use rust_logger_factory::prelude::*;
//! use rust_logger_factory::info;
//!
//! let factory = LoggerFactory::new(Some(Options::default().development(true)));
//! let logger = factory.logger("http.server");
//!
//! info!(logger, "listening on port {}", 8080);
//! logger.infow("request", &[Field::string("path", "/"), Field::uint16("status", 200)]);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender};
    pub use crate::core::{
        Appender, FactoryMetrics, Field, FieldKeys, FieldValue, LogLevel, Logger, LoggerError,
        LoggerFactory, Options, Result, TimestampFormat,
    };
}

pub use appenders::{ConsoleAppender, FileAppender};
pub use core::{
    resolve_level, Appender, Backend, BackendConfig, Encoding, FactoryMetrics, Field, FieldKeys,
    FieldValue, LogLevel, Logger, LoggerError, LoggerFactory, Options, Result, SamplingConfig,
    TimestampFormat,
};
