//! Logging macros for ergonomic log message formatting.
//!
//! These macros take a [`Logger`](crate::Logger) handle and `format!`-style
//! arguments. Arguments are only formatted when the level is enabled for
//! the handle's name, and the call site is recorded as the caller.
//!
//! # Examples
//!
//! ```no_run
//! use rust_logger_factory::prelude::*;
//! use rust_logger_factory::info;
//!
//! let factory = LoggerFactory::new(None);
//! let logger = factory.logger("server");
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```no_run
/// # use rust_logger_factory::prelude::*;
/// # let logger = LoggerFactory::new(None).logger("app");
/// use rust_logger_factory::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.logf($level, ::std::format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```no_run
/// # use rust_logger_factory::prelude::*;
/// # let factory = LoggerFactory::new(Some(Options::default().level("", LogLevel::Debug)));
/// # let logger = factory.logger("app");
/// use rust_logger_factory::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```no_run
/// # use rust_logger_factory::prelude::*;
/// # let logger = LoggerFactory::new(None).logger("app");
/// use rust_logger_factory::warn;
/// warn!(logger, "Memory usage at {}%", 85);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}
