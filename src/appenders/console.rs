//! Console appender implementation

use crate::core::{Appender, Result};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Writes records to the process stdout or stderr
pub struct ConsoleAppender {
    stream: Stream,
}

impl ConsoleAppender {
    pub fn stdout() -> Self {
        Self {
            stream: Stream::Stdout,
        }
    }

    pub fn stderr() -> Self {
        Self {
            stream: Stream::Stderr,
        }
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &str) -> Result<()> {
        match self.stream {
            Stream::Stdout => std::io::stdout().lock().write_all(record.as_bytes())?,
            Stream::Stderr => std::io::stderr().lock().write_all(record.as_bytes())?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.stream {
            Stream::Stdout => std::io::stdout().flush()?,
            Stream::Stderr => std::io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.stream {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}
