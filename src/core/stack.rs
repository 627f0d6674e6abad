//! Stack trace capture for stack fields, error records and caller lookup
//!
//! Captured traces start at the code that called into the logger: frames of
//! the std backtrace machinery and of the logging path itself (handle,
//! backend, encoder, field adapter) are recognized by symbol and dropped
//! before any caller-requested skip is applied.

use std::backtrace::Backtrace;

/// Symbol prefixes of the frames between a user call site and the capture
const INTERNAL_FRAME_PREFIXES: [&str; 8] = [
    "std::backtrace",
    concat!(env!("CARGO_CRATE_NAME"), "::core::stack::capture_stack"),
    concat!(env!("CARGO_CRATE_NAME"), "::core::stack::caller_at"),
    concat!(env!("CARGO_CRATE_NAME"), "::core::field::Field"),
    concat!(env!("CARGO_CRATE_NAME"), "::core::encoder::RecordEncoder"),
    concat!(env!("CARGO_CRATE_NAME"), "::core::backend::Backend"),
    concat!(env!("CARGO_CRATE_NAME"), "::core::backend::resolve_caller"),
    concat!(env!("CARGO_CRATE_NAME"), "::core::logger::Logger"),
];

/// One rendered frame: its `N: symbol` header and any `at file:line:col` lines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame<'a> {
    header: &'a str,
    locations: Vec<&'a str>,
}

impl<'a> Frame<'a> {
    /// Symbol name without the frame index
    pub fn symbol(&self) -> &'a str {
        match self.header.split_once(':') {
            Some((_, symbol)) => symbol.trim(),
            None => self.header,
        }
    }

    /// Source file and line of the frame, when debug info has them
    pub fn file_line(&self) -> Option<(&'a str, u32)> {
        let location = self.locations.first()?.strip_prefix("at ")?;
        let mut parts = location.rsplitn(3, ':');
        let _column = parts.next()?;
        let line = parts.next()?.parse().ok()?;
        let file = parts.next()?;
        Some((file, line))
    }

    fn is_internal(&self) -> bool {
        let symbol = self.symbol().trim_start_matches('<');
        INTERNAL_FRAME_PREFIXES
            .iter()
            .any(|prefix| symbol.starts_with(prefix))
    }

    fn render(&self) -> String {
        let mut out = self.header.to_string();
        for location in &self.locations {
            out.push_str("\n\t");
            out.push_str(location);
        }
        out
    }
}

/// Split a rendered backtrace into frames
pub fn parse_frames(rendered: &str) -> Vec<Frame<'_>> {
    let mut frames: Vec<Frame<'_>> = Vec::new();
    for line in rendered.lines() {
        let line = line.trim();
        if is_frame_header(line) {
            frames.push(Frame {
                header: line,
                locations: Vec::new(),
            });
        } else if let Some(frame) = frames.last_mut() {
            frame.locations.push(line);
        }
    }
    frames
}

/// Frames above the outermost logging-path frame, minus `skip` more
///
/// Iterator adapters and closures between internal frames stay dropped
/// because the cut follows the last internal frame, not the first other one.
pub fn user_frames<'a>(frames: &'a [Frame<'a>], skip: usize) -> &'a [Frame<'a>] {
    let first_user = frames
        .iter()
        .rposition(Frame::is_internal)
        .map_or(0, |last| last + 1);
    frames.get(first_user.saturating_add(skip)..).unwrap_or(&[])
}

/// Capture the stack of the code calling the logger, minus `skip` frames.
pub fn capture_stack(skip: usize) -> String {
    let rendered = Backtrace::force_capture().to_string();
    let frames = parse_frames(&rendered);
    let kept = user_frames(&frames, skip);

    if kept.is_empty() {
        // Unsupported or disabled backtraces render as a single message line
        return rendered.trim().to_string();
    }

    kept.iter()
        .map(Frame::render)
        .collect::<Vec<_>>()
        .join("\n")
}

/// File and line of the frame `skip` levels above the logger's caller
pub fn caller_at(skip: usize) -> Option<(String, u32)> {
    let rendered = Backtrace::force_capture().to_string();
    let frames = parse_frames(&rendered);
    user_frames(&frames, skip)
        .first()?
        .file_line()
        .map(|(file, line)| (file.to_string(), line))
}

fn is_frame_header(line: &str) -> bool {
    let trimmed = line.trim_start();
    let digits = trimmed.chars().take_while(|c| c.is_ascii_digit()).count();
    digits > 0 && trimmed[digits..].starts_with(':')
}
