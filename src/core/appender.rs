//! Appender trait for log output destinations

use super::error::Result;

/// One output target of a backend.
///
/// Receives fully encoded records, line ending included, and writes them
/// verbatim.
pub trait Appender: Send + Sync {
    fn append(&mut self, record: &str) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
