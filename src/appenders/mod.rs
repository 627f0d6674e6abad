//! Appender implementations

pub mod console;
pub mod file;

pub use console::ConsoleAppender;
pub use file::FileAppender;

pub use crate::core::Appender;

use crate::core::Result;

/// Open the appender named by an output target.
///
/// `stdout` and `stderr` select the process streams; anything else is a
/// file path opened for appending.
pub fn open_output(target: &str) -> Result<Box<dyn Appender>> {
    match target {
        "stdout" => Ok(Box::new(ConsoleAppender::stdout())),
        "stderr" => Ok(Box::new(ConsoleAppender::stderr())),
        path => Ok(Box::new(FileAppender::new(path)?)),
    }
}
