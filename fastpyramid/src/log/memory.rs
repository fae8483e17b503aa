//! Logger that buffers messages in memory.

use crate::log::{LogLevel, Logger};
use std::fmt::Arguments;
use std::sync::Mutex;

/// Collects formatted messages so tests can assert on progress output.
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded `(level, message)` pairs in arrival order.
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    /// Messages at [`LogLevel::Info`] and above.
    pub fn messages(&self) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(level, _)| *level >= LogLevel::Info)
            .map(|(_, message)| message)
            .collect()
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, args: Arguments<'_>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push((level, args.to_string()));
        }
    }
}
