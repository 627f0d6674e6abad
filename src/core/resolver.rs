//! Hierarchical level resolution for logger names

use super::log_level::LogLevel;
use std::collections::HashMap;

/// Separators between logger name segments
pub const NAME_DELIMITERS: [char; 3] = ['.', '/', ':'];

/// Resolve the minimum level for `name` against a level map.
///
/// Walks from the most specific name to its ancestors, cutting at the
/// rightmost delimiter each step, and returns the first exact hit. Once no
/// delimiter is left the root applies: `""`, then `"root"`, then `Info`.
///
/// # Example
///
/// ```
/// use rust_logger_factory::core::{resolve_level, LogLevel};
/// use std::collections::HashMap;
///
/// let levels = HashMap::from([("foo".to_string(), LogLevel::Debug)]);
/// assert_eq!(resolve_level("foo.bar/baz", &levels), LogLevel::Debug);
/// assert_eq!(resolve_level("other", &levels), LogLevel::Info);
/// ```
pub fn resolve_level(name: &str, levels: &HashMap<String, LogLevel>) -> LogLevel {
    let mut name = name.trim();
    loop {
        if let Some(level) = levels.get(name) {
            return *level;
        }
        match name.rfind(&NAME_DELIMITERS[..]) {
            Some(idx) => name = name[..idx].trim(),
            None => return root_level(levels),
        }
    }
}

fn root_level(levels: &HashMap<String, LogLevel>) -> LogLevel {
    levels
        .get("")
        .or_else(|| levels.get("root"))
        .copied()
        .unwrap_or(LogLevel::Info)
}
